//! Stable identifiers for result tree nodes.

use std::fmt;
use std::fmt::Write as _;

use super::resource::ResourceId;
use super::span::Span;

/// The kind tag of a tree node.
///
/// `Loading` and `NoResults` are reserved for sentinel nodes; every other kind
/// is derived from hit data.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum NodeKind {
    Folder,
    File,
    Member,
    Uncategorized,
    Result,
    NoResults,
    Loading,
}

impl NodeKind {
    /// The tag used in the canonical identity string.
    pub const fn as_str(self) -> &'static str {
        match self {
            NodeKind::Folder => "folder",
            NodeKind::File => "file",
            NodeKind::Member => "member",
            NodeKind::Uncategorized => "uncategorized",
            NodeKind::Result => "result",
            NodeKind::NoResults => "no-results",
            NodeKind::Loading => "loading",
        }
    }

    /// Whether this kind is a placeholder not derived from hit data.
    pub const fn is_sentinel(self) -> bool {
        matches!(self, NodeKind::NoResults | NodeKind::Loading)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical identity of a tree node, stable across tree rebuilds.
///
/// Two identities are equal iff kind, resource and span all match. The
/// canonical string produced by [`NodeId::key`] preserves that equality, so it
/// can be used as a map key in caches and state registries that outlive any
/// particular tree.
///
/// # Format
///
/// ```text
/// <kind>|<resource byte length>:<resource>|<sl>,<sc>,<el>,<ec>
/// ```
///
/// Absent fields are written as `-`. The length prefix keeps resource contents
/// from being confused with the following fields.
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct NodeId {
    kind: NodeKind,
    resource: Option<ResourceId>,
    span: Option<Span>,
}

impl NodeId {
    /// Create a new identity.
    pub fn new(kind: NodeKind, resource: Option<ResourceId>, span: Option<Span>) -> Self {
        Self {
            kind,
            resource,
            span,
        }
    }

    pub fn folder(resource: ResourceId) -> Self {
        Self::new(NodeKind::Folder, Some(resource), None)
    }

    pub fn file(resource: ResourceId) -> Self {
        Self::new(NodeKind::File, Some(resource), None)
    }

    pub fn member(resource: ResourceId, symbol_span: Span) -> Self {
        Self::new(NodeKind::Member, Some(resource), Some(symbol_span))
    }

    pub fn uncategorized(resource: ResourceId) -> Self {
        Self::new(NodeKind::Uncategorized, Some(resource), None)
    }

    pub fn result(resource: ResourceId, span: Span) -> Self {
        Self::new(NodeKind::Result, Some(resource), Some(span))
    }

    pub fn no_results() -> Self {
        Self::new(NodeKind::NoResults, None, None)
    }

    pub fn loading() -> Self {
        Self::new(NodeKind::Loading, None, None)
    }

    #[inline]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    #[inline]
    pub fn resource(&self) -> Option<&ResourceId> {
        self.resource.as_ref()
    }

    #[inline]
    pub fn span(&self) -> Option<Span> {
        self.span
    }

    /// The canonical string form of this identity.
    pub fn key(&self) -> String {
        let mut key = String::with_capacity(32);
        key.push_str(self.kind.as_str());
        key.push('|');
        match &self.resource {
            Some(resource) => {
                let _ = write!(key, "{}:{}", resource.as_str().len(), resource.as_str());
            }
            None => key.push('-'),
        }
        key.push('|');
        match self.span {
            Some(span) => {
                let [sl, sc, el, ec] = span.coords();
                let _ = write!(key, "{sl},{sc},{el},{ec}");
            }
            None => key.push('-'),
        }
        key
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.key())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}
