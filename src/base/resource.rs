//! Resource identifiers and search hits.

use std::fmt;
use std::sync::Arc;

use super::span::Span;

/// Identifier of a searchable unit, typically a file path or URI.
///
/// `ResourceId` is a cheaply cloned handle around a shared string. It is
/// usually path-like (slash-separated), but the engine only relies on that for
/// display names and best-effort path reconstruction.
#[derive(Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ResourceId(Arc<str>);

impl ResourceId {
    /// Create a new resource identifier.
    #[inline]
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    /// The raw identifier string.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The last `/`-separated segment, e.g. `main.rs` for `/src/main.rs`.
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Whether this identifier is a path prefix of `other`.
    ///
    /// The prefix must end on a segment boundary: `/src` is a prefix of
    /// `/src/lib.rs` and of `/src` itself, but not of `/srcs/lib.rs`.
    pub fn is_path_prefix_of(&self, other: &ResourceId) -> bool {
        let (this, other) = (self.as_str(), other.as_str());
        match other.strip_prefix(this) {
            Some(rest) => rest.is_empty() || rest.starts_with('/') || this.ends_with('/'),
            None => false,
        }
    }
}

impl fmt::Debug for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResourceId({:?})", self.as_str())
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for ResourceId {
    #[inline]
    fn from(id: &str) -> Self {
        Self(Arc::from(id))
    }
}

impl From<String> for ResourceId {
    #[inline]
    fn from(id: String) -> Self {
        Self(Arc::from(id))
    }
}

impl AsRef<str> for ResourceId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// One occurrence returned by a search provider.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Hit {
    pub resource: ResourceId,
    pub span: Span,
}

impl Hit {
    pub fn new(resource: impl Into<ResourceId>, span: Span) -> Self {
        Self {
            resource: resource.into(),
            span,
        }
    }
}

/// A navigable location: a span inside a resource.
pub type Location = Hit;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_id_equality() {
        let a = ResourceId::from("/ws/a.rs");
        let b = ResourceId::new(String::from("/ws/a.rs"));
        let c = ResourceId::from("/ws/b.rs");

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_resource_id_hash() {
        use rustc_hash::FxHashSet;

        let mut set = FxHashSet::default();
        set.insert(ResourceId::from("/a"));
        set.insert(ResourceId::from("/b"));
        set.insert(ResourceId::from("/a")); // duplicate

        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_file_name() {
        assert_eq!(ResourceId::from("file:///ws/src/lib.rs").file_name(), "lib.rs");
        assert_eq!(ResourceId::from("lib.rs").file_name(), "lib.rs");
    }

    #[test]
    fn test_path_prefix_respects_segments() {
        let folder = ResourceId::from("/ws/src");

        assert!(folder.is_path_prefix_of(&ResourceId::from("/ws/src/lib.rs")));
        assert!(folder.is_path_prefix_of(&ResourceId::from("/ws/src")));
        assert!(!folder.is_path_prefix_of(&ResourceId::from("/ws/srcs/lib.rs")));
        assert!(!folder.is_path_prefix_of(&ResourceId::from("/ws")));
        assert!(ResourceId::from("/ws/").is_path_prefix_of(&ResourceId::from("/ws/a")));
    }
}
