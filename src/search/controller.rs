//! The registry of executed searches.
//!
//! [`SearchController`] runs searches, keeps one [`SearchInstance`] per
//! search that produced a tree, and tracks which search is active. Views
//! follow the active search through [`SearchController::subscribe`].

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use parking_lot::{Mutex, RwLock};
use smol_str::SmolStr;
use tokio::sync::watch;
use tracing::{debug, info};

use super::auto_navigate::{AutoNavigation, AutoNavigator};
use super::providers::SearchProvider;
use crate::base::{DocumentText, Hit, Location};
use crate::config::TreeConfig;
use crate::error::{Error, Result};
use crate::tree::{ResultTree, TreeNode, TreeServices, first_leaf, path_from_root};

/// Identifier of a search, unique per controller.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SearchId(u64);

impl SearchId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SearchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One executed search.
pub struct SearchInstance {
    id: SearchId,
    title: SmolStr,
    tree: OnceLock<Arc<ResultTree>>,
}

impl SearchInstance {
    pub fn id(&self) -> SearchId {
        self.id
    }

    /// Display title, e.g. `'render' references`.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The result tree, once the search has resolved.
    pub fn tree(&self) -> Option<&Arc<ResultTree>> {
        self.tree.get()
    }

    pub fn is_loading(&self) -> bool {
        self.tree.get().is_none()
    }

    /// Top-level nodes; a single loading node while the search resolves.
    pub fn roots(&self) -> Arc<[TreeNode]> {
        match self.tree.get() {
            Some(tree) => tree.tree(),
            None => Arc::from([TreeNode::Loading]),
        }
    }
}

impl fmt::Debug for SearchInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchInstance")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("loading", &self.is_loading())
            .finish()
    }
}

/// The outcome of [`SearchController::run_search`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The search produced a single hit quickly; the caller should open it.
    /// No search was registered.
    Navigated(Hit),
    /// The search was registered and made active.
    Opened(SearchId),
    /// The search was removed while it was resolving; its hits were dropped.
    Removed(SearchId),
}

/// The active search as seen by subscribers.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ActiveSearch {
    pub id: Option<SearchId>,
    /// Whether the search became active because it was just started.
    pub is_new_search: bool,
}

#[derive(Default)]
struct Registry {
    searches: Vec<Arc<SearchInstance>>,
    active: Option<SearchId>,
}

impl Registry {
    fn get(&self, id: SearchId) -> Option<&Arc<SearchInstance>> {
        self.searches.iter().find(|s| s.id == id)
    }
}

/// Runs searches and tracks their result trees.
pub struct SearchController {
    services: TreeServices,
    config: RwLock<TreeConfig>,
    navigator: AutoNavigator,
    next_id: AtomicU64,
    registry: Mutex<Registry>,
    active_tx: watch::Sender<ActiveSearch>,
}

impl SearchController {
    pub fn new(services: TreeServices, config: TreeConfig) -> Self {
        let (active_tx, _) = watch::channel(ActiveSearch::default());
        Self {
            services,
            config: RwLock::new(config),
            navigator: AutoNavigator::new(),
            next_id: AtomicU64::new(0),
            registry: Mutex::new(Registry::default()),
            active_tx,
        }
    }

    /// Receive every change of the active search.
    pub fn subscribe(&self) -> watch::Receiver<ActiveSearch> {
        self.active_tx.subscribe()
    }

    pub fn config(&self) -> TreeConfig {
        self.config.read().clone()
    }

    /// Run `provider` at `anchor`.
    ///
    /// If the search quickly yields exactly one hit, nothing is registered and
    /// the hit is returned for navigation. Otherwise the search is registered
    /// as soon as the auto-navigation window ends, made active, and shows a
    /// loading node until it resolves. A failing provider unregisters the
    /// search again and the failure is returned. A search removed while it
    /// resolves yields [`SearchOutcome::Removed`].
    pub async fn run_search(
        &self,
        provider: Arc<dyn SearchProvider>,
        anchor: Location,
    ) -> Result<SearchOutcome> {
        let title = self.search_title(provider.as_ref(), &anchor).await;
        let timeout = self.config.read().auto_navigate_timeout;

        let mut resolve = provider.resolve(&anchor);
        let early = match self.navigator.try_navigate(&mut resolve, timeout).await {
            AutoNavigation::Navigated(hit) => return Ok(SearchOutcome::Navigated(hit)),
            AutoNavigation::Resolved(Err(err)) => return Err(Error::SearchFailed(err)),
            AutoNavigation::Resolved(Ok(hits)) => Some(hits),
            AutoNavigation::Pending => None,
        };

        let instance = Arc::new(SearchInstance {
            id: SearchId(self.next_id.fetch_add(1, Ordering::Relaxed)),
            title,
            tree: OnceLock::new(),
        });
        let id = instance.id;
        self.registry.lock().searches.push(instance.clone());
        self.activate(id, true);
        info!(search = %id, title = %instance.title, "search started");

        let hits = match early {
            Some(hits) => hits,
            None => match resolve.await {
                Ok(hits) => hits,
                Err(err) => {
                    debug!(search = %id, %err, "search failed");
                    self.unregister(id);
                    return Err(Error::SearchFailed(err));
                }
            },
        };

        if self.search(id).is_none() {
            debug!(search = %id, count = hits.len(), "search removed before it resolved");
            return Ok(SearchOutcome::Removed(id));
        }

        debug!(search = %id, count = hits.len(), "search resolved");
        let tree = ResultTree::new(hits, self.services.clone(), self.config())
            .with_items_icon(provider.items_icon());
        // the cell is only ever set here
        let _ = instance.tree.set(Arc::new(tree));
        if self.active_search().is_some_and(|active| active.id == id) {
            self.active_tx.send_replace(ActiveSearch {
                id: Some(id),
                is_new_search: true,
            });
        }
        Ok(SearchOutcome::Opened(id))
    }

    async fn search_title(&self, provider: &dyn SearchProvider, anchor: &Location) -> SmolStr {
        let kind = provider.title().to_lowercase();
        let term = match &self.services.documents {
            Some(documents) => match documents.text(&anchor.resource).await {
                Ok(text) => DocumentText::new(&text)
                    .word_at(anchor.span.start)
                    .map(str::to_string),
                Err(err) => {
                    debug!(resource = %anchor.resource, %err, "no search term");
                    None
                }
            },
            None => None,
        };
        match term {
            Some(term) => SmolStr::from(format!("'{term}' {kind}")),
            None => SmolStr::from(kind),
        }
    }

    /// All tracked searches, oldest first.
    pub fn searches(&self) -> Vec<Arc<SearchInstance>> {
        self.registry.lock().searches.clone()
    }

    pub fn search(&self, id: SearchId) -> Option<Arc<SearchInstance>> {
        self.registry.lock().get(id).cloned()
    }

    pub fn active_search(&self) -> Option<Arc<SearchInstance>> {
        let registry = self.registry.lock();
        registry.active.and_then(|id| registry.get(id).cloned())
    }

    /// Make a tracked search active.
    pub fn set_active_search(&self, id: SearchId) -> Result<()> {
        if self.search(id).is_none() {
            return Err(Error::UntrackedSearch(id));
        }
        self.activate(id, false);
        Ok(())
    }

    /// Forget a search. When it was active, the most recent remaining search
    /// becomes active.
    pub fn remove_search(&self, id: SearchId) -> Result<()> {
        if !self.unregister(id) {
            return Err(Error::UntrackedSearch(id));
        }
        Ok(())
    }

    fn unregister(&self, id: SearchId) -> bool {
        let next = {
            let mut registry = self.registry.lock();
            let Some(index) = registry.searches.iter().position(|s| s.id == id) else {
                return false;
            };
            registry.searches.remove(index);
            if registry.active != Some(id) {
                return true;
            }
            let next = registry.searches.last().map(|s| s.id);
            registry.active = next;
            next
        };
        debug!(search = %id, next = ?next, "removed active search");
        self.active_tx.send_replace(ActiveSearch {
            id: next,
            is_new_search: false,
        });
        true
    }

    fn activate(&self, id: SearchId, is_new_search: bool) {
        self.registry.lock().active = Some(id);
        self.active_tx.send_replace(ActiveSearch {
            id: Some(id),
            is_new_search,
        });
    }

    /// Store new settings. Completed trees whose shape depends on the change
    /// are rebuilt, and subscribers are told to refresh the active search.
    pub fn apply_config(&self, config: TreeConfig) {
        let rebuild = self.config.read().affects_grouping(&config);
        *self.config.write() = config.clone();

        for search in self.searches() {
            if let Some(tree) = search.tree() {
                tree.set_config(config.clone());
            }
        }

        if rebuild {
            let active = self.registry.lock().active;
            if let Some(id) = active {
                debug!(search = %id, "rebuilding active search tree");
                self.active_tx.send_replace(ActiveSearch {
                    id: Some(id),
                    is_new_search: false,
                });
            }
        }
    }

    /// The nodes to reveal when a search is shown: the path to its last
    /// selected node (or the closest surviving node), else its first leaf.
    pub async fn reveal(&self, id: SearchId) -> Result<Vec<TreeNode>> {
        let search = self.search(id).ok_or(Error::UntrackedSearch(id))?;
        let Some(tree) = search.tree() else {
            return Ok(vec![TreeNode::Loading]);
        };

        if let Some(selected) = tree.last_selected_node() {
            let path = path_from_root(tree, &selected).await;
            if !path.is_empty() {
                return Ok(path);
            }
        }
        Ok(first_leaf(tree)
            .await
            .map(|path| path.into_nodes())
            .unwrap_or_default())
    }
}

impl fmt::Debug for SearchController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.registry.lock();
        f.debug_struct("SearchController")
            .field("searches", &registry.searches)
            .field("active", &registry.active)
            .finish_non_exhaustive()
    }
}
