//! Collaborator traits implemented by the host.
//!
//! The engine never talks to an editor or a language server directly. Every
//! piece of outside knowledge comes through one of these traits, all of them
//! object-safe so they can be held as `Arc<dyn ...>`.

use std::sync::Arc;

use async_trait::async_trait;

use crate::base::{Hit, Location, ResourceId};
use crate::error::ProviderError;
use crate::grouping::DocumentSymbol;

/// A search that turns an anchor location into hits.
///
/// The `#[async_trait]` macro keeps the trait usable as `dyn SearchProvider`.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Human-readable title, e.g. `"References"`.
    fn title(&self) -> &str;

    /// Icon for the result nodes of this search.
    fn items_icon(&self) -> Option<&'static str> {
        None
    }

    /// Resolve the hits for `anchor`.
    async fn resolve(&self, anchor: &Location) -> Result<Vec<Hit>, ProviderError>;
}

/// Source of a document's symbol outline.
#[async_trait]
pub trait SymbolProvider: Send + Sync {
    async fn document_symbols(
        &self,
        resource: &ResourceId,
    ) -> Result<Vec<DocumentSymbol>, ProviderError>;
}

/// Source of document text, used for preview labels and search terms.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn text(&self, resource: &ResourceId) -> Result<Arc<str>, ProviderError>;
}

/// Maps resources to workspace-relative display paths.
pub trait Workspace: Send + Sync {
    /// A deterministic, `/`-separated path relative to the workspace root.
    fn relative_path(&self, resource: &ResourceId) -> String;
}

/// A [`Workspace`] rooted at a single path prefix.
///
/// Resources under the root are shown relative to it; anything else is shown
/// as-is.
#[derive(Clone, Debug)]
pub struct WorkspaceRoot {
    root: String,
}

impl WorkspaceRoot {
    pub fn new(root: impl Into<String>) -> Self {
        let mut root = root.into();
        while root.len() > 1 && root.ends_with('/') {
            root.pop();
        }
        Self { root }
    }
}

impl Workspace for WorkspaceRoot {
    fn relative_path(&self, resource: &ResourceId) -> String {
        let path = resource.as_str();
        match path.strip_prefix(self.root.as_str()) {
            Some(rest) if rest.starts_with('/') => rest.trim_start_matches('/').to_string(),
            _ => path.to_string(),
        }
    }
}

/// A workspace with no root: every resource is its own display path.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoWorkspace;

impl Workspace for NoWorkspace {
    fn relative_path(&self, resource: &ResourceId) -> String {
        resource.as_str().to_string()
    }
}

/// One item of a type hierarchy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeHierarchyItem {
    pub name: String,
    pub location: Location,
}

/// Source of type hierarchy items (supertypes and subtypes).
#[async_trait]
pub trait TypeHierarchyProvider: Send + Sync {
    /// The items at `anchor` the hierarchy starts from.
    async fn prepare(&self, anchor: &Location) -> Result<Vec<TypeHierarchyItem>, ProviderError>;

    async fn supertypes(
        &self,
        item: &TypeHierarchyItem,
    ) -> Result<Vec<TypeHierarchyItem>, ProviderError>;

    async fn subtypes(
        &self,
        item: &TypeHierarchyItem,
    ) -> Result<Vec<TypeHierarchyItem>, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_providers_are_object_safe() {
        fn _search(_: Arc<dyn SearchProvider>) {}
        fn _symbols(_: Arc<dyn SymbolProvider>) {}
        fn _documents(_: Arc<dyn DocumentSource>) {}
        fn _workspace(_: Arc<dyn Workspace>) {}
        fn _hierarchy(_: Arc<dyn TypeHierarchyProvider>) {}
    }

    #[rstest]
    #[case("/ws", "/ws/src/a.rs", "src/a.rs")]
    #[case("/ws/", "/ws/src/a.rs", "src/a.rs")]
    #[case("/ws", "/wsx/a.rs", "/wsx/a.rs")]
    #[case("/ws", "/other/a.rs", "/other/a.rs")]
    fn test_workspace_root_relative_path(
        #[case] root: &str,
        #[case] resource: &str,
        #[case] expected: &str,
    ) {
        let workspace = WorkspaceRoot::new(root);
        assert_eq!(workspace.relative_path(&resource.into()), expected);
    }

    #[test]
    fn test_no_workspace_keeps_resource() {
        assert_eq!(NoWorkspace.relative_path(&"/a/b.rs".into()), "/a/b.rs");
    }
}
