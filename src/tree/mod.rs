//! The stateful result tree and the operations that walk it.
//!
//! - [`ResultTree`] - node construction, lazy children, view state
//! - [`TreeNode`] - the closed set of node variants
//! - [`advance`] - previous/next leaf navigation
//! - [`path_from_root`] - reveal a node by identity, tolerating stale ids

mod navigation;
mod node;
mod path;
mod result_tree;

pub use navigation::{Direction, NodePath, advance, first_leaf, last_leaf};
pub use node::{
    FILE_ICON, FOLDER_ICON, FileNode, FolderNode, LOADING_ICON, LOADING_LABEL, MemberNode,
    NO_RESULTS_ICON, NO_RESULTS_LABEL, ResultNode, TreeNode, UNCATEGORIZED_ICON,
    UNCATEGORIZED_LABEL, UncategorizedNode,
};
pub use path::path_from_root;
pub use result_tree::{ResultTree, TreeServices};
