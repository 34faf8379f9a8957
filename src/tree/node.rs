//! Tree node variants.
//!
//! Nodes are immutable once built and cheap to clone (each variant payload is
//! behind an `Arc`). Children of folders, members and uncategorized groups are
//! built together with the node; children of files are materialized lazily by
//! [`ResultTree::get_children`](super::ResultTree::get_children).

use std::sync::Arc;

use smol_str::SmolStr;

use crate::base::{Label, Location, NodeId, NodeKind, ResourceId, Span, match_description};
use crate::grouping::MemberSymbol;

pub const FOLDER_ICON: &str = "folder";
pub const FILE_ICON: &str = "file";
pub const UNCATEGORIZED_ICON: &str = "symbol-misc";
pub const NO_RESULTS_ICON: &str = "search-stop";
pub const LOADING_ICON: &str = "loading~spin";

pub const UNCATEGORIZED_LABEL: &str = "(uncategorized)";
pub const NO_RESULTS_LABEL: &str = "No results found";
pub const LOADING_LABEL: &str = "Loading results...";

/// A folder produced by directory grouping.
#[derive(Debug)]
pub struct FolderNode {
    pub(crate) id: NodeId,
    pub(crate) resource: ResourceId,
    pub(crate) name: SmolStr,
    pub(crate) children: Arc<[TreeNode]>,
    pub(crate) match_count: usize,
}

impl FolderNode {
    pub fn new(resource: ResourceId, name: impl Into<SmolStr>, children: Vec<TreeNode>) -> Self {
        let match_count = children.iter().map(TreeNode::match_count).sum();
        Self {
            id: NodeId::folder(resource.clone()),
            resource,
            name: name.into(),
            children: children.into(),
            match_count,
        }
    }

    /// The folder label: one segment, or several joined by `/` after merging.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn resource(&self) -> &ResourceId {
        &self.resource
    }

    pub fn children(&self) -> &Arc<[TreeNode]> {
        &self.children
    }
}

/// A file holding one or more hits.
#[derive(Debug)]
pub struct FileNode {
    pub(crate) id: NodeId,
    pub(crate) resource: ResourceId,
    pub(crate) label: SmolStr,
    pub(crate) ranges: Arc<[Span]>,
}

impl FileNode {
    /// `ranges` must already be sorted by start position.
    pub fn new(resource: ResourceId, label: impl Into<SmolStr>, ranges: Arc<[Span]>) -> Self {
        Self {
            id: NodeId::file(resource.clone()),
            resource,
            label: label.into(),
            ranges,
        }
    }

    pub fn resource(&self) -> &ResourceId {
        &self.resource
    }

    pub fn ranges(&self) -> &[Span] {
        &self.ranges
    }
}

/// The hits of one file that fall inside a symbol.
#[derive(Debug)]
pub struct MemberNode {
    pub(crate) id: NodeId,
    pub(crate) resource: ResourceId,
    pub(crate) symbol: MemberSymbol,
    pub(crate) children: Arc<[TreeNode]>,
}

impl MemberNode {
    pub fn new(resource: ResourceId, symbol: MemberSymbol, children: Vec<TreeNode>) -> Self {
        Self {
            id: NodeId::member(resource.clone(), symbol.span),
            resource,
            symbol,
            children: children.into(),
        }
    }

    pub fn symbol(&self) -> &MemberSymbol {
        &self.symbol
    }

    pub fn children(&self) -> &Arc<[TreeNode]> {
        &self.children
    }
}

/// The hits of one file outside every eligible symbol.
#[derive(Debug)]
pub struct UncategorizedNode {
    pub(crate) id: NodeId,
    pub(crate) resource: ResourceId,
    pub(crate) children: Arc<[TreeNode]>,
}

impl UncategorizedNode {
    pub fn new(resource: ResourceId, children: Vec<TreeNode>) -> Self {
        Self {
            id: NodeId::uncategorized(resource.clone()),
            resource,
            children: children.into(),
        }
    }

    pub fn children(&self) -> &Arc<[TreeNode]> {
        &self.children
    }
}

/// A single hit.
#[derive(Debug)]
pub struct ResultNode {
    pub(crate) id: NodeId,
    pub(crate) location: Location,
    pub(crate) label: Label,
    pub(crate) icon: Option<&'static str>,
}

impl ResultNode {
    pub fn new(location: Location, label: Label, icon: Option<&'static str>) -> Self {
        Self {
            id: NodeId::result(location.resource.clone(), location.span),
            location,
            label,
            icon,
        }
    }

    pub fn location(&self) -> &Location {
        &self.location
    }
}

/// A node of the result tree.
#[derive(Clone, Debug)]
pub enum TreeNode {
    Folder(Arc<FolderNode>),
    File(Arc<FileNode>),
    Member(Arc<MemberNode>),
    Uncategorized(Arc<UncategorizedNode>),
    Result(Arc<ResultNode>),
    /// Sole root of a search without hits.
    NoResults,
    /// Placeholder root while a search is still resolving.
    Loading,
}

impl TreeNode {
    pub fn kind(&self) -> NodeKind {
        match self {
            TreeNode::Folder(_) => NodeKind::Folder,
            TreeNode::File(_) => NodeKind::File,
            TreeNode::Member(_) => NodeKind::Member,
            TreeNode::Uncategorized(_) => NodeKind::Uncategorized,
            TreeNode::Result(_) => NodeKind::Result,
            TreeNode::NoResults => NodeKind::NoResults,
            TreeNode::Loading => NodeKind::Loading,
        }
    }

    /// The stable identity of this node.
    pub fn node_id(&self) -> NodeId {
        match self {
            TreeNode::Folder(n) => n.id.clone(),
            TreeNode::File(n) => n.id.clone(),
            TreeNode::Member(n) => n.id.clone(),
            TreeNode::Uncategorized(n) => n.id.clone(),
            TreeNode::Result(n) => n.id.clone(),
            TreeNode::NoResults => NodeId::no_results(),
            TreeNode::Loading => NodeId::loading(),
        }
    }

    /// Whether this node's identity equals `id`, without cloning it.
    pub fn has_id(&self, id: &NodeId) -> bool {
        match self {
            TreeNode::Folder(n) => &n.id == id,
            TreeNode::File(n) => &n.id == id,
            TreeNode::Member(n) => &n.id == id,
            TreeNode::Uncategorized(n) => &n.id == id,
            TreeNode::Result(n) => &n.id == id,
            TreeNode::NoResults | TreeNode::Loading => self.node_id() == *id,
        }
    }

    /// The resource this node belongs to, if it is derived from hit data.
    pub fn resource(&self) -> Option<&ResourceId> {
        match self {
            TreeNode::Folder(n) => Some(&n.resource),
            TreeNode::File(n) => Some(&n.resource),
            TreeNode::Member(n) => Some(&n.resource),
            TreeNode::Uncategorized(n) => Some(&n.resource),
            TreeNode::Result(n) => Some(&n.location.resource),
            TreeNode::NoResults | TreeNode::Loading => None,
        }
    }

    pub fn label(&self) -> Label {
        match self {
            TreeNode::Folder(n) => Label::plain(n.name.clone()),
            TreeNode::File(n) => Label::plain(n.label.clone()),
            TreeNode::Member(n) => Label::plain(n.symbol.name.clone()),
            TreeNode::Uncategorized(_) => Label::plain(UNCATEGORIZED_LABEL),
            TreeNode::Result(n) => n.label.clone(),
            TreeNode::NoResults => Label::plain(NO_RESULTS_LABEL),
            TreeNode::Loading => Label::plain(LOADING_LABEL),
        }
    }

    /// Secondary text: the match count for groups, `line:col` for results
    /// labelled with a preview. Results whose label already is the position
    /// have none.
    pub fn description(&self) -> Option<String> {
        match self {
            TreeNode::Folder(_)
            | TreeNode::File(_)
            | TreeNode::Member(_)
            | TreeNode::Uncategorized(_) => Some(match_description(self.match_count())),
            TreeNode::Result(n) => n
                .label
                .highlight
                .is_some()
                .then(|| n.location.span.start.to_string()),
            TreeNode::NoResults | TreeNode::Loading => None,
        }
    }

    /// Number of hits below (or at) this node.
    pub fn match_count(&self) -> usize {
        match self {
            TreeNode::Folder(n) => n.match_count,
            TreeNode::File(n) => n.ranges.len(),
            TreeNode::Member(n) => n.children.len(),
            TreeNode::Uncategorized(n) => n.children.len(),
            TreeNode::Result(_) => 1,
            TreeNode::NoResults | TreeNode::Loading => 0,
        }
    }

    pub fn has_children(&self) -> bool {
        match self {
            TreeNode::Folder(_)
            | TreeNode::File(_)
            | TreeNode::Member(_)
            | TreeNode::Uncategorized(_) => true,
            TreeNode::Result(_) | TreeNode::NoResults | TreeNode::Loading => false,
        }
    }

    /// Where activating this node navigates to.
    pub fn location(&self) -> Option<Location> {
        match self {
            TreeNode::Result(n) => Some(n.location.clone()),
            TreeNode::Member(n) => Some(Location::new(n.resource.clone(), n.symbol.span)),
            TreeNode::File(n) => Some(Location::new(n.resource.clone(), Span::default())),
            TreeNode::Folder(_)
            | TreeNode::Uncategorized(_)
            | TreeNode::NoResults
            | TreeNode::Loading => None,
        }
    }

    /// Theme icon id.
    pub fn icon(&self) -> Option<&'static str> {
        match self {
            TreeNode::Folder(_) => Some(FOLDER_ICON),
            TreeNode::File(_) => Some(FILE_ICON),
            TreeNode::Member(n) => Some(n.symbol.kind.icon_id()),
            TreeNode::Uncategorized(_) => Some(UNCATEGORIZED_ICON),
            TreeNode::Result(n) => n.icon,
            TreeNode::NoResults => Some(NO_RESULTS_ICON),
            TreeNode::Loading => Some(LOADING_ICON),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouping::SymbolKind;

    fn result(resource: &str, line: u32) -> TreeNode {
        let location = Location::new(resource, Span::from_coords(line, 0, line, 3));
        let label = Label {
            text: "let foo = 1;".into(),
            highlight: Some(4..7),
        };
        TreeNode::Result(Arc::new(ResultNode::new(location, label, None)))
    }

    fn file(resource: &str, lines: &[u32]) -> TreeNode {
        let ranges: Vec<Span> = lines.iter().map(|&l| Span::from_coords(l, 0, l, 3)).collect();
        TreeNode::File(Arc::new(FileNode::new(resource.into(), "f.rs", ranges.into())))
    }

    #[test]
    fn test_folder_match_count_sums_children() {
        let inner = TreeNode::Folder(Arc::new(FolderNode::new(
            "/ws/a/b".into(),
            "b",
            vec![file("/ws/a/b/x.rs", &[1, 2, 3])],
        )));
        let outer = FolderNode::new("/ws/a".into(), "a", vec![inner, file("/ws/a/y.rs", &[4])]);

        assert_eq!(outer.match_count, 4);
        assert_eq!(
            TreeNode::Folder(Arc::new(outer)).description().as_deref(),
            Some("4 matches")
        );
    }

    #[test]
    fn test_sentinels() {
        assert!(!TreeNode::NoResults.has_children());
        assert_eq!(TreeNode::NoResults.match_count(), 0);
        assert_eq!(TreeNode::NoResults.label().text, NO_RESULTS_LABEL);
        assert_eq!(TreeNode::Loading.node_id(), NodeId::loading());
        assert!(TreeNode::Loading.has_id(&NodeId::loading()));
        assert!(TreeNode::NoResults.resource().is_none());
    }

    #[test]
    fn test_result_node_accessors() {
        let node = result("/ws/a.rs", 4);

        assert_eq!(node.kind(), NodeKind::Result);
        assert!(!node.has_children());
        assert_eq!(node.description().as_deref(), Some("5:1"));
        assert_eq!(node.match_count(), 1);
        assert_eq!(
            node.node_id(),
            NodeId::result("/ws/a.rs".into(), Span::from_coords(4, 0, 4, 3))
        );
    }

    #[test]
    fn test_position_labelled_result_has_no_description() {
        let location = Location::new("/ws/a.rs", Span::from_coords(4, 0, 4, 3));
        let node = TreeNode::Result(Arc::new(ResultNode::new(location, Label::plain("5:1"), None)));

        assert_eq!(node.label().text, "5:1");
        assert_eq!(node.description(), None);
    }

    #[test]
    fn test_member_node_uses_symbol() {
        let symbol = MemberSymbol {
            name: "render".into(),
            kind: SymbolKind::Method,
            span: Span::from_coords(10, 0, 50, 0),
        };
        let node = TreeNode::Member(Arc::new(MemberNode::new(
            "/ws/a.rs".into(),
            symbol,
            vec![result("/ws/a.rs", 20), result("/ws/a.rs", 30)],
        )));

        assert_eq!(node.label().text, "render");
        assert_eq!(node.icon(), Some("symbol-method"));
        assert_eq!(node.description().as_deref(), Some("2 matches"));
        assert_eq!(
            node.location().map(|l| l.span),
            Some(Span::from_coords(10, 0, 50, 0))
        );
    }
}
