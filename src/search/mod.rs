//! Searches and the collaborators they run against.
//!
//! - [`providers`] - host-implemented traits (search, symbols, documents, workspace)
//! - [`SearchController`] - registry of executed searches and the active one
//! - [`AutoNavigator`] - jump to a lone result instead of opening a tree
//! - [`TypeHierarchySearch`] - supertypes/subtypes as a search

mod auto_navigate;
mod controller;
mod hierarchy;
pub mod providers;

pub use auto_navigate::{AutoNavigation, AutoNavigator};
pub use controller::{ActiveSearch, SearchController, SearchId, SearchInstance, SearchOutcome};
pub use hierarchy::{HierarchyDirection, TYPE_ICON, TypeHierarchySearch};
pub use providers::{
    DocumentSource, NoWorkspace, SearchProvider, SymbolProvider, TypeHierarchyItem,
    TypeHierarchyProvider, Workspace, WorkspaceRoot,
};
