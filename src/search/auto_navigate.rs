//! Jump straight to a lone result instead of opening a result tree.
//!
//! A search that answers quickly with exactly one hit is treated as a
//! "go to" action. The wait is bounded by the configured timeout; a slower
//! search is left running and ends up in the tree as usual.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tracing::debug;

use crate::base::Hit;
use crate::error::ProviderError;

/// What happened while waiting for a search to settle.
#[derive(Debug)]
pub enum AutoNavigation {
    /// The search finished in time with exactly one hit.
    Navigated(Hit),
    /// The search finished in time with some other outcome.
    Resolved(Result<Vec<Hit>, ProviderError>),
    /// Auto-navigation was skipped or timed out; the search is still running.
    Pending,
}

/// Waits a bounded time for single-hit searches.
///
/// Only one wait runs at a time; a search started while another one is being
/// waited on is not auto-navigated.
#[derive(Debug, Default)]
pub struct AutoNavigator {
    in_progress: AtomicBool,
}

impl AutoNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a wait is currently running.
    pub fn is_in_progress(&self) -> bool {
        self.in_progress.load(Ordering::Acquire)
    }

    /// Poll `resolve` for at most `timeout`.
    ///
    /// A zero timeout disables auto-navigation. On [`AutoNavigation::Pending`]
    /// the caller still owns `resolve` and can keep awaiting it.
    pub async fn try_navigate<F>(&self, resolve: &mut F, timeout: Duration) -> AutoNavigation
    where
        F: Future<Output = Result<Vec<Hit>, ProviderError>> + Unpin,
    {
        if timeout.is_zero() {
            return AutoNavigation::Pending;
        }
        let Some(_guard) = InProgress::acquire(&self.in_progress) else {
            debug!("auto-navigation already in progress");
            return AutoNavigation::Pending;
        };

        match tokio::time::timeout(timeout, resolve).await {
            Err(_) => {
                debug!(?timeout, "search still running, showing result tree");
                AutoNavigation::Pending
            }
            Ok(Ok(hits)) => match <[Hit; 1]>::try_from(hits) {
                Ok([hit]) => {
                    debug!(resource = %hit.resource, "navigating to single result");
                    AutoNavigation::Navigated(hit)
                }
                Err(hits) => AutoNavigation::Resolved(Ok(hits)),
            },
            Ok(Err(err)) => AutoNavigation::Resolved(Err(err)),
        }
    }
}

/// Clears the in-progress flag when dropped.
struct InProgress<'a>(&'a AtomicBool);

impl<'a> InProgress<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InProgress<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::Span;

    fn hit(line: u32) -> Hit {
        Hit::new("/ws/a.rs", Span::from_coords(line, 0, line, 1))
    }

    type Resolve = std::pin::Pin<Box<dyn Future<Output = Result<Vec<Hit>, ProviderError>> + Send>>;

    fn ready(result: Result<Vec<Hit>, ProviderError>) -> Resolve {
        Box::pin(async move { result })
    }

    #[tokio::test]
    async fn test_single_hit_navigates() {
        let navigator = AutoNavigator::new();
        let mut resolve = ready(Ok(vec![hit(3)]));

        let outcome = navigator.try_navigate(&mut resolve, Duration::from_millis(50)).await;
        assert!(matches!(outcome, AutoNavigation::Navigated(h) if h == hit(3)));
        assert!(!navigator.is_in_progress());
    }

    #[tokio::test]
    async fn test_several_hits_resolve() {
        let navigator = AutoNavigator::new();
        let mut resolve = ready(Ok(vec![hit(1), hit(2)]));

        let outcome = navigator.try_navigate(&mut resolve, Duration::from_millis(50)).await;
        assert!(matches!(outcome, AutoNavigation::Resolved(Ok(ref hits)) if hits.len() == 2));
    }

    #[tokio::test]
    async fn test_zero_timeout_disables() {
        let navigator = AutoNavigator::new();
        let mut resolve = ready(Ok(vec![hit(1)]));

        let outcome = navigator.try_navigate(&mut resolve, Duration::ZERO).await;
        assert!(matches!(outcome, AutoNavigation::Pending));
        assert_eq!(resolve.await.unwrap(), vec![hit(1)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_search_times_out_and_keeps_running() {
        let navigator = AutoNavigator::new();
        let mut resolve: Resolve = Box::pin(async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, ProviderError>(vec![hit(1)])
        });

        let outcome = navigator.try_navigate(&mut resolve, Duration::from_millis(100)).await;
        assert!(matches!(outcome, AutoNavigation::Pending));
        assert_eq!(resolve.await.unwrap(), vec![hit(1)]);
    }

    #[tokio::test]
    async fn test_busy_navigator_skips() {
        let navigator = AutoNavigator::new();
        let _held = InProgress::acquire(&navigator.in_progress);
        let mut resolve = ready(Ok(vec![hit(1)]));

        let outcome = navigator.try_navigate(&mut resolve, Duration::from_millis(50)).await;
        assert!(matches!(outcome, AutoNavigation::Pending));
    }
}
