//! The stateful result tree of one search.
//!
//! A [`ResultTree`] owns the hits of a search and turns them into nodes on
//! demand. Top-level nodes are built synchronously and cached until
//! [`ResultTree::clear_tree_cache`]. Children of files are computed lazily,
//! because they may need the symbol outline or the text of the file, and are
//! memoized per node identity so that concurrent requests for the same node
//! share a single computation.
//!
//! Expansion and selection state is keyed by [`NodeId`] strings and survives
//! cache invalidation, which is what lets a rebuilt tree restore its view.

use std::cmp::Ordering;
use std::sync::{Arc, OnceLock};

use indexmap::IndexMap;
use parking_lot::{Mutex, RwLock};
use rustc_hash::{FxHashMap, FxHashSet};
use tokio::sync::OnceCell;
use tracing::{debug, trace};

use super::node::{
    FileNode, FolderNode, MemberNode, ResultNode, TreeNode, UncategorizedNode,
};
use crate::base::{DocumentText, Hit, Label, Location, NodeId, NodeKind, ResourceId, Span};
use crate::config::TreeConfig;
use crate::grouping::{GroupNode, assign_members, group_paths};
use crate::search::{DocumentSource, SymbolProvider, Workspace};

type Children = Arc<[TreeNode]>;

/// The collaborators a [`ResultTree`] reads from.
#[derive(Clone)]
pub struct TreeServices {
    pub workspace: Arc<dyn Workspace>,
    /// Symbol outlines for member grouping. Without one, member grouping
    /// puts every hit in the uncategorized bucket.
    pub symbols: Option<Arc<dyn SymbolProvider>>,
    /// Document text for preview labels.
    pub documents: Option<Arc<dyn DocumentSource>>,
}

impl TreeServices {
    pub fn new(workspace: Arc<dyn Workspace>) -> Self {
        Self {
            workspace,
            symbols: None,
            documents: None,
        }
    }

    pub fn with_symbols(mut self, symbols: Arc<dyn SymbolProvider>) -> Self {
        self.symbols = Some(symbols);
        self
    }

    pub fn with_documents(mut self, documents: Arc<dyn DocumentSource>) -> Self {
        self.documents = Some(documents);
        self
    }
}

impl std::fmt::Debug for TreeServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeServices")
            .field("symbols", &self.symbols.is_some())
            .field("documents", &self.documents.is_some())
            .finish_non_exhaustive()
    }
}

#[derive(Default)]
struct TreeCache {
    roots: Option<Children>,
    /// One cell per node key. A cell is shared by every caller asking for the
    /// same node until the cache is cleared.
    children: FxHashMap<String, Arc<OnceCell<Children>>>,
}

#[derive(Default)]
struct ViewState {
    expanded: FxHashSet<String>,
    last_selected: Option<NodeId>,
}

/// Hits of one search, grouped into a navigable tree.
pub struct ResultTree {
    hits: Arc<[Hit]>,
    items_icon: Option<&'static str>,
    services: TreeServices,
    config: RwLock<TreeConfig>,
    by_file: OnceLock<IndexMap<ResourceId, Arc<[Span]>>>,
    cache: RwLock<TreeCache>,
    view: Mutex<ViewState>,
}

impl ResultTree {
    pub fn new(hits: Vec<Hit>, services: TreeServices, config: TreeConfig) -> Self {
        Self {
            hits: hits.into(),
            items_icon: None,
            services,
            config: RwLock::new(config),
            by_file: OnceLock::new(),
            cache: RwLock::new(TreeCache::default()),
            view: Mutex::new(ViewState::default()),
        }
    }

    /// Icon shown on result nodes.
    pub fn with_items_icon(mut self, icon: Option<&'static str>) -> Self {
        self.items_icon = icon;
        self
    }

    pub fn hits(&self) -> &[Hit] {
        &self.hits
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn config(&self) -> TreeConfig {
        self.config.read().clone()
    }

    /// Replace the configuration, clearing the caches when the new settings
    /// change the tree's shape. Returns whether the caches were cleared.
    pub fn set_config(&self, config: TreeConfig) -> bool {
        let rebuild = {
            let mut current = self.config.write();
            let rebuild = current.affects_grouping(&config);
            *current = config;
            rebuild
        };
        if rebuild {
            self.clear_tree_cache();
        }
        rebuild
    }

    /// Hits grouped by resource, in first-occurrence order, each file's ranges
    /// sorted by start.
    ///
    /// Identical ranges in one file are kept once and counted once. Two results
    /// with the same resource and range would share one [`NodeId`], and sibling
    /// lookup by id could not tell them apart.
    pub fn results_by_file(&self) -> &IndexMap<ResourceId, Arc<[Span]>> {
        self.by_file.get_or_init(|| {
            let mut grouped: IndexMap<ResourceId, Vec<Span>> = IndexMap::new();
            for hit in self.hits.iter() {
                grouped.entry(hit.resource.clone()).or_default().push(hit.span);
            }
            grouped
                .into_iter()
                .map(|(resource, mut ranges)| {
                    ranges.sort_by_key(|span| (span.start, span.end));
                    ranges.dedup();
                    (resource, Arc::from(ranges))
                })
                .collect()
        })
    }

    /// The top-level nodes, built on first use after each cache clear.
    pub fn tree(&self) -> Children {
        if let Some(roots) = &self.cache.read().roots {
            return roots.clone();
        }

        let mut cache = self.cache.write();
        if let Some(roots) = &cache.roots {
            return roots.clone();
        }
        let roots = self.build_tree();
        cache.roots = Some(roots.clone());
        roots
    }

    fn build_tree(&self) -> Children {
        let by_file = self.results_by_file();
        if by_file.is_empty() {
            debug!("search has no hits");
            return Arc::from([TreeNode::NoResults]);
        }

        let group_by_directory = self.config.read().group_by_directory;
        let roots = if group_by_directory {
            self.build_grouped(by_file)
        } else {
            self.build_flat(by_file)
        };
        debug!(
            files = by_file.len(),
            roots = roots.len(),
            grouped = group_by_directory,
            "built result tree"
        );
        roots.into()
    }

    fn build_flat(&self, by_file: &IndexMap<ResourceId, Arc<[Span]>>) -> Vec<TreeNode> {
        let mut files: Vec<(&ResourceId, &Arc<[Span]>)> = by_file.iter().collect();
        files.sort_by(|(a, _), (b, _)| compare_names(a.as_str(), b.as_str()));
        files
            .into_iter()
            .map(|(resource, ranges)| {
                let label = self.services.workspace.relative_path(resource);
                TreeNode::File(Arc::new(FileNode::new(resource.clone(), label, ranges.clone())))
            })
            .collect()
    }

    fn build_grouped(&self, by_file: &IndexMap<ResourceId, Arc<[Span]>>) -> Vec<TreeNode> {
        let mut lookup: FxHashMap<String, &ResourceId> = FxHashMap::default();
        let mut paths = Vec::with_capacity(by_file.len());
        for resource in by_file.keys() {
            let mut relative = self.services.workspace.relative_path(resource);
            if lookup.contains_key(&relative) {
                // two resources with one display path: keep both apart
                relative = resource.as_str().to_string();
            }
            lookup.insert(relative.clone(), resource);
            paths.push(relative);
        }

        let root = group_paths(&paths);
        let builder = GroupBuilder { by_file, lookup };
        builder.convert(&root, "")
    }

    /// Children of `node`, computed on first request.
    ///
    /// Folder, member and uncategorized nodes carry their children. A file's
    /// children are computed once per cache generation, even when requested
    /// concurrently; collaborator failures degrade instead of failing.
    pub async fn get_children(&self, node: &TreeNode) -> Children {
        match node {
            TreeNode::Folder(folder) => folder.children.clone(),
            TreeNode::Member(member) => member.children.clone(),
            TreeNode::Uncategorized(group) => group.children.clone(),
            TreeNode::File(file) => {
                let cell = self.children_cell(file.id.key());
                cell.get_or_init(|| self.load_file_children(file.clone()))
                    .await
                    .clone()
            }
            TreeNode::Result(_) | TreeNode::NoResults | TreeNode::Loading => Arc::from([]),
        }
    }

    fn children_cell(&self, key: String) -> Arc<OnceCell<Children>> {
        if let Some(cell) = self.cache.read().children.get(&key) {
            return cell.clone();
        }
        self.cache
            .write()
            .children
            .entry(key)
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .clone()
    }

    async fn load_file_children(&self, file: Arc<FileNode>) -> Children {
        trace!(resource = %file.resource, "materializing file children");
        let config = self.config();
        let text = self.load_text(&file.resource).await;
        let results = ResultFactory {
            resource: &file.resource,
            document: text.as_deref().map(DocumentText::new),
            icon: self.items_icon,
        };

        if !config.group_by_member {
            return results.build(&file.ranges).into();
        }

        let symbols = match &self.services.symbols {
            Some(provider) => match provider.document_symbols(&file.resource).await {
                Ok(symbols) => symbols,
                Err(err) => {
                    debug!(resource = %file.resource, %err, "symbol outline unavailable");
                    let all = UncategorizedNode::new(
                        file.resource.clone(),
                        results.build(&file.ranges),
                    );
                    return Arc::from([TreeNode::Uncategorized(Arc::new(all))]);
                }
            },
            None => Vec::new(),
        };

        let assignment = assign_members(&file.ranges, &symbols, &config.excluded_member_kinds);
        let mut children: Vec<TreeNode> = assignment
            .members
            .into_iter()
            .map(|bucket| {
                TreeNode::Member(Arc::new(MemberNode::new(
                    file.resource.clone(),
                    bucket.symbol,
                    results.build(&bucket.ranges),
                )))
            })
            .collect();
        if !assignment.uncategorized.is_empty() {
            children.push(TreeNode::Uncategorized(Arc::new(UncategorizedNode::new(
                file.resource.clone(),
                results.build(&assignment.uncategorized),
            ))));
        }
        children.into()
    }

    async fn load_text(&self, resource: &ResourceId) -> Option<Arc<str>> {
        let documents = self.services.documents.as_ref()?;
        match documents.text(resource).await {
            Ok(text) => Some(text),
            Err(err) => {
                debug!(resource = %resource, %err, "document text unavailable");
                None
            }
        }
    }

    /// Discard the top-level nodes and every memoized child list.
    ///
    /// Computations already in flight finish, but their results are no longer
    /// reachable. Expansion and selection state is kept.
    pub fn clear_tree_cache(&self) {
        let mut cache = self.cache.write();
        cache.roots = None;
        cache.children.clear();
        debug!("cleared result tree cache");
    }

    /// Materialize the whole tree and mark every node expanded.
    pub async fn expand_all(&self) {
        let mut stack: Vec<TreeNode> = self.tree().iter().rev().cloned().collect();
        while let Some(node) = stack.pop() {
            self.set_node_expanded(&node.node_id(), true);
            if node.has_children() {
                let children = self.get_children(&node).await;
                stack.extend(children.iter().rev().cloned());
            }
        }
    }

    pub fn set_node_expanded(&self, id: &NodeId, expanded: bool) {
        let mut view = self.view.lock();
        if expanded {
            view.expanded.insert(id.key());
        } else {
            view.expanded.remove(&id.key());
        }
    }

    pub fn is_node_expanded(&self, id: &NodeId) -> bool {
        self.view.lock().expanded.contains(&id.key())
    }

    /// Remember the selected node. The loading placeholder is never
    /// remembered.
    pub fn set_last_selected_node(&self, id: NodeId) {
        if id.kind() == NodeKind::Loading {
            return;
        }
        self.view.lock().last_selected = Some(id);
    }

    pub fn last_selected_node(&self) -> Option<NodeId> {
        self.view.lock().last_selected.clone()
    }
}

impl std::fmt::Debug for ResultTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultTree")
            .field("hits", &self.hits.len())
            .field("config", &*self.config.read())
            .field("services", &self.services)
            .finish_non_exhaustive()
    }
}

/// Converts a compressed [`GroupNode`] into folder and file nodes.
struct GroupBuilder<'a> {
    by_file: &'a IndexMap<ResourceId, Arc<[Span]>>,
    lookup: FxHashMap<String, &'a ResourceId>,
}

impl GroupBuilder<'_> {
    fn convert(&self, group: &GroupNode, path: &str) -> Vec<TreeNode> {
        let mut folders: Vec<&GroupNode> = group.children.values().collect();
        folders.sort_by(|a, b| compare_names(&a.name, &b.name));

        let mut nodes = Vec::with_capacity(folders.len() + group.files.len());
        for folder in folders {
            let folder_path = if path.is_empty() {
                folder.name.to_string()
            } else {
                format!("{path}/{}", folder.name)
            };
            let children = self.convert(folder, &folder_path);
            let resource = self.folder_resource(folder, &folder_path);
            nodes.push(TreeNode::Folder(Arc::new(FolderNode::new(
                resource,
                folder.name.clone(),
                children,
            ))));
        }

        let mut files: Vec<(&ResourceId, &Arc<[Span]>)> = group
            .files
            .iter()
            .filter_map(|relative| self.lookup.get(relative))
            .filter_map(|resource| self.by_file.get_key_value(*resource))
            .collect();
        files.sort_by(|(a, _), (b, _)| {
            compare_names(a.file_name(), b.file_name()).then_with(|| a.cmp(b))
        });
        nodes.extend(files.into_iter().map(|(resource, ranges)| {
            TreeNode::File(Arc::new(FileNode::new(
                resource.clone(),
                resource.file_name(),
                ranges.clone(),
            )))
        }));
        nodes
    }

    /// The resource of a folder: its first file's resource with the part
    /// below the folder cut off. Falls back to the relative folder path when
    /// the file's resource does not end with its relative path.
    fn folder_resource(&self, folder: &GroupNode, folder_path: &str) -> ResourceId {
        let derived = folder.first_file().and_then(|relative| {
            let resource = self.lookup.get(relative)?;
            let below = relative.strip_prefix(folder_path)?;
            let prefix = resource.as_str().strip_suffix(below)?;
            Some(ResourceId::from(prefix))
        });
        derived.unwrap_or_else(|| ResourceId::from(folder_path))
    }
}

/// Builds result nodes for one file.
struct ResultFactory<'a> {
    resource: &'a ResourceId,
    document: Option<DocumentText<'a>>,
    icon: Option<&'static str>,
}

impl ResultFactory<'_> {
    fn build(&self, ranges: &[Span]) -> Vec<TreeNode> {
        ranges
            .iter()
            .map(|&span| {
                let label = self
                    .document
                    .as_ref()
                    .and_then(|document| document.preview(span))
                    .map(|chunks| chunks.to_label())
                    .unwrap_or_else(|| Label::plain(span.start.to_string()));
                let location = Location::new(self.resource.clone(), span);
                TreeNode::Result(Arc::new(ResultNode::new(location, label, self.icon)))
            })
            .collect()
    }
}

/// Case-insensitive name order, ties broken by the raw strings.
fn compare_names(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{NoWorkspace, WorkspaceRoot};

    fn hit(resource: &str, line: u32) -> Hit {
        Hit::new(resource, Span::from_coords(line, 0, line, 3))
    }

    fn tree_of(hits: Vec<Hit>, config: TreeConfig) -> ResultTree {
        let services = TreeServices::new(Arc::new(WorkspaceRoot::new("/ws")));
        ResultTree::new(hits, services, config)
    }

    fn labels(nodes: &[TreeNode]) -> Vec<String> {
        nodes.iter().map(|n| n.label().text.to_string()).collect()
    }

    #[test]
    fn test_results_by_file_groups_and_sorts() {
        let tree = tree_of(
            vec![hit("/ws/b.rs", 9), hit("/ws/a.rs", 3), hit("/ws/b.rs", 1), hit("/ws/b.rs", 9)],
            TreeConfig::default(),
        );

        let by_file = tree.results_by_file();
        let files: Vec<&str> = by_file.keys().map(ResourceId::as_str).collect();
        assert_eq!(files, ["/ws/b.rs", "/ws/a.rs"]);
        let lines: Vec<u32> = by_file[0].iter().map(|s| s.start.line).collect();
        assert_eq!(lines, [1, 9]);
    }

    #[tokio::test]
    async fn test_identical_hits_count_once() {
        let tree = tree_of(vec![hit("/ws/a.rs", 2), hit("/ws/a.rs", 2)], TreeConfig::default());

        assert_eq!(tree.results_by_file()[0].len(), 1);
        let roots = tree.tree();
        assert_eq!(roots[0].match_count(), 1);
        assert_eq!(roots[0].description().as_deref(), Some("1 match"));
        assert_eq!(tree.get_children(&roots[0]).await.len(), 1);
    }

    #[test]
    fn test_empty_tree_is_no_results() {
        let tree = tree_of(Vec::new(), TreeConfig::default());
        let roots = tree.tree();

        assert_eq!(roots.len(), 1);
        assert!(matches!(roots[0], TreeNode::NoResults));
        assert!(!roots[0].has_children());
        assert_eq!(roots[0].match_count(), 0);
    }

    #[test]
    fn test_flat_tree_sorted_by_resource() {
        let tree = tree_of(
            vec![hit("/ws/src/b.rs", 0), hit("/ws/a.rs", 0), hit("/ws/src/a.rs", 0)],
            TreeConfig::default().with_group_by_directory(false),
        );

        assert_eq!(labels(&tree.tree()), ["a.rs", "src/a.rs", "src/b.rs"]);
    }

    #[test]
    fn test_grouped_tree_folders_before_files() {
        let tree = tree_of(
            vec![
                hit("/ws/z.rs", 0),
                hit("/ws/lib/x/b.rs", 0),
                hit("/ws/lib/x/a.rs", 0),
                hit("/ws/app/main.rs", 0),
            ],
            TreeConfig::default(),
        );

        let roots = tree.tree();
        assert_eq!(labels(&roots), ["app", "lib/x", "z.rs"]);

        let TreeNode::Folder(lib) = &roots[1] else {
            panic!("expected folder, got {:?}", roots[1]);
        };
        assert_eq!(lib.resource().as_str(), "/ws/lib/x");
        assert_eq!(labels(lib.children()), ["a.rs", "b.rs"]);
        assert_eq!(roots[1].match_count(), 2);
    }

    #[test]
    fn test_folder_resource_without_workspace_root() {
        let services = TreeServices::new(Arc::new(NoWorkspace));
        let tree = ResultTree::new(
            vec![hit("a/b/one.rs", 0), hit("a/c/two.rs", 0)],
            services,
            TreeConfig::default(),
        );

        let roots = tree.tree();
        let TreeNode::Folder(a) = &roots[0] else {
            panic!("expected folder");
        };
        assert_eq!(a.resource().as_str(), "a");
    }

    #[test]
    fn test_tree_is_cached_until_cleared() {
        let tree = tree_of(vec![hit("/ws/a.rs", 0)], TreeConfig::default());

        let first = tree.tree();
        assert!(Arc::ptr_eq(&first, &tree.tree()));

        tree.clear_tree_cache();
        assert!(!Arc::ptr_eq(&first, &tree.tree()));
    }

    #[test]
    fn test_set_config_clears_only_on_grouping_change() {
        let tree = tree_of(vec![hit("/ws/src/a.rs", 0)], TreeConfig::default());
        let first = tree.tree();

        assert!(!tree.set_config(TreeConfig::default().with_auto_navigate_timeout(Default::default())));
        assert!(Arc::ptr_eq(&first, &tree.tree()));

        assert!(tree.set_config(TreeConfig::default().with_group_by_directory(false)));
        assert_eq!(labels(&tree.tree()), ["src/a.rs"]);
    }

    #[tokio::test]
    async fn test_file_children_without_documents_use_positions() {
        let tree = tree_of(vec![hit("/ws/a.rs", 4), hit("/ws/a.rs", 1)], TreeConfig::default());
        let roots = tree.tree();

        let children = tree.get_children(&roots[0]).await;
        assert_eq!(labels(&children), ["2:1", "5:1"]);
        assert!(children.iter().all(|c| c.label().highlight.is_none()));
        assert!(children.iter().all(|c| c.description().is_none()));
    }

    #[tokio::test]
    async fn test_member_grouping_without_symbol_provider() {
        let tree = tree_of(
            vec![hit("/ws/a.rs", 1)],
            TreeConfig::default().with_group_by_member(true),
        );
        let roots = tree.tree();

        let children = tree.get_children(&roots[0]).await;
        assert_eq!(children.len(), 1);
        assert!(matches!(children[0], TreeNode::Uncategorized(_)));
        assert_eq!(children[0].match_count(), 1);
    }

    #[tokio::test]
    async fn test_view_state_survives_cache_clear() {
        let tree = tree_of(vec![hit("/ws/a.rs", 1)], TreeConfig::default());
        let file = tree.tree()[0].node_id();

        tree.set_node_expanded(&file, true);
        tree.set_last_selected_node(file.clone());
        tree.set_last_selected_node(NodeId::loading());
        tree.clear_tree_cache();

        assert!(tree.is_node_expanded(&file));
        assert_eq!(tree.last_selected_node(), Some(file.clone()));

        tree.set_node_expanded(&file, false);
        assert!(!tree.is_node_expanded(&file));
    }

    #[tokio::test]
    async fn test_expand_all_marks_every_node() {
        let tree = tree_of(
            vec![hit("/ws/src/a.rs", 1), hit("/ws/src/a.rs", 2), hit("/ws/b.rs", 0)],
            TreeConfig::default(),
        );

        tree.expand_all().await;

        let file = NodeId::file("/ws/src/a.rs".into());
        let result = NodeId::result("/ws/b.rs".into(), Span::from_coords(0, 0, 0, 3));
        assert!(tree.is_node_expanded(&file));
        assert!(tree.is_node_expanded(&result));
    }

    #[test]
    fn test_compare_names_is_case_insensitive() {
        let mut names = vec!["b.rs", "A.rs", "a.rs", "C.rs"];
        names.sort_by(|a, b| compare_names(a, b));
        assert_eq!(names, ["A.rs", "a.rs", "b.rs", "C.rs"]);
    }
}
