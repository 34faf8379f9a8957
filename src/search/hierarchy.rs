//! Type hierarchy as a search: every supertype (or subtype) reachable from the
//! anchor becomes a hit.

use std::sync::Arc;

use async_trait::async_trait;
use rustc_hash::FxHashSet;
use tracing::debug;

use super::providers::{SearchProvider, TypeHierarchyItem, TypeHierarchyProvider};
use crate::base::{Hit, Location};
use crate::error::ProviderError;

/// Icon of type hierarchy results.
pub const TYPE_ICON: &str = "symbol-class";

/// Which way to walk the hierarchy.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HierarchyDirection {
    Supertypes,
    Subtypes,
}

/// A [`SearchProvider`] collecting a type hierarchy depth-first.
pub struct TypeHierarchySearch {
    provider: Arc<dyn TypeHierarchyProvider>,
    direction: HierarchyDirection,
}

impl TypeHierarchySearch {
    pub fn new(provider: Arc<dyn TypeHierarchyProvider>, direction: HierarchyDirection) -> Self {
        Self {
            provider,
            direction,
        }
    }

    pub fn direction(&self) -> HierarchyDirection {
        self.direction
    }

    async fn related(&self, item: &TypeHierarchyItem) -> Result<Vec<TypeHierarchyItem>, ProviderError> {
        match self.direction {
            HierarchyDirection::Supertypes => self.provider.supertypes(item).await,
            HierarchyDirection::Subtypes => self.provider.subtypes(item).await,
        }
    }
}

#[async_trait]
impl SearchProvider for TypeHierarchySearch {
    fn title(&self) -> &str {
        match self.direction {
            HierarchyDirection::Supertypes => "Supertypes",
            HierarchyDirection::Subtypes => "Subtypes",
        }
    }

    fn items_icon(&self) -> Option<&'static str> {
        Some(TYPE_ICON)
    }

    /// Items are visited in pre-order. An item already seen at the same
    /// resource and start position is skipped with its subtree, so cyclic
    /// hierarchies terminate.
    async fn resolve(&self, anchor: &Location) -> Result<Vec<Hit>, ProviderError> {
        let roots = self.provider.prepare(anchor).await?;

        let mut hits = Vec::new();
        let mut seen: FxHashSet<String> = FxHashSet::default();
        let mut stack: Vec<TypeHierarchyItem> = roots.into_iter().rev().collect();

        while let Some(item) = stack.pop() {
            let start = item.location.span.start;
            let key = format!("{}:{}:{}", item.location.resource, start.line, start.character);
            if !seen.insert(key) {
                continue;
            }

            let related = self.related(&item).await?;
            hits.push(item.location);
            stack.extend(related.into_iter().rev());
        }

        debug!(count = hits.len(), direction = ?self.direction, "collected type hierarchy");
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::Span;
    use rustc_hash::FxHashMap;

    /// A hierarchy given as `name -> related names`, with every type on its
    /// own line of `/ws/types.rs`.
    struct FakeHierarchy {
        lines: FxHashMap<&'static str, u32>,
        edges: FxHashMap<&'static str, Vec<&'static str>>,
    }

    impl FakeHierarchy {
        fn new(edges: &[(&'static str, &[&'static str])]) -> Self {
            let mut lines = FxHashMap::default();
            for (name, related) in edges {
                for n in std::iter::once(name).chain(related.iter()) {
                    let next = lines.len() as u32;
                    lines.entry(*n).or_insert(next);
                }
            }
            Self {
                lines,
                edges: edges.iter().map(|(k, v)| (*k, v.to_vec())).collect(),
            }
        }

        fn item(&self, name: &str) -> TypeHierarchyItem {
            let line = self.lines[name];
            TypeHierarchyItem {
                name: name.to_string(),
                location: Location::new("/ws/types.rs", Span::from_coords(line, 0, line, 4)),
            }
        }
    }

    #[async_trait]
    impl TypeHierarchyProvider for FakeHierarchy {
        async fn prepare(&self, _anchor: &Location) -> Result<Vec<TypeHierarchyItem>, ProviderError> {
            Ok(vec![self.item("Root")])
        }

        async fn supertypes(&self, item: &TypeHierarchyItem) -> Result<Vec<TypeHierarchyItem>, ProviderError> {
            let related = self.edges.get(item.name.as_str()).cloned().unwrap_or_default();
            Ok(related.into_iter().map(|n| self.item(n)).collect())
        }

        async fn subtypes(&self, _item: &TypeHierarchyItem) -> Result<Vec<TypeHierarchyItem>, ProviderError> {
            Err("subtypes unsupported".into())
        }
    }

    fn lines(hits: &[Hit]) -> Vec<u32> {
        hits.iter().map(|h| h.span.start.line).collect()
    }

    #[tokio::test]
    async fn test_collects_depth_first() {
        let fake = Arc::new(FakeHierarchy::new(&[("Root", &["A", "B"]), ("A", &["C"])]));
        let expected = [fake.lines["Root"], fake.lines["A"], fake.lines["C"], fake.lines["B"]];
        let search = TypeHierarchySearch::new(fake, HierarchyDirection::Supertypes);

        let anchor = Location::new("/ws/types.rs", Span::default());
        let hits = search.resolve(&anchor).await.unwrap();
        assert_eq!(lines(&hits), expected);
    }

    #[tokio::test]
    async fn test_cycles_terminate() {
        let fake = Arc::new(FakeHierarchy::new(&[("Root", &["A"]), ("A", &["Root", "A"])]));
        let search = TypeHierarchySearch::new(fake, HierarchyDirection::Supertypes);

        let hits = search.resolve(&Location::new("/ws/types.rs", Span::default())).await.unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[tokio::test]
    async fn test_provider_failure_fails_the_search() {
        let fake = Arc::new(FakeHierarchy::new(&[("Root", &[])]));
        let search = TypeHierarchySearch::new(fake, HierarchyDirection::Subtypes);

        let result = search.resolve(&Location::new("/ws/types.rs", Span::default())).await;
        assert!(result.is_err());
        assert_eq!(search.title(), "Subtypes");
        assert_eq!(search.items_icon(), Some(TYPE_ICON));
    }
}
