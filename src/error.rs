//! Error types for the result tree engine.
//!
//! Most failures in this crate are *not* errors: a rejected symbol outline
//! degrades to the uncategorized bucket, an empty search becomes a sentinel
//! node and a stale selection is resolved best-effort. What remains here are
//! caller mistakes and failures of the search itself.

use thiserror::Error;

use crate::search::SearchId;

/// Failure reported by an external collaborator (search, symbol or document
/// provider).
pub type ProviderError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Crate result alias.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors surfaced to callers of the engine.
#[derive(Debug, Error)]
pub enum Error {
    /// An operation referenced a search the controller does not track.
    ///
    /// This is a programming error on the caller's side.
    #[error("search {0} is not tracked by this controller")]
    UntrackedSearch(SearchId),

    /// The search provider failed to produce hits.
    #[error("search provider failed: {0}")]
    SearchFailed(#[source] ProviderError),

    /// A configured symbol kind name is not recognized.
    #[error("unknown symbol kind '{0}'")]
    UnknownSymbolKind(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            Error::UntrackedSearch(SearchId::new(7)).to_string(),
            "search #7 is not tracked by this controller"
        );
        assert_eq!(
            Error::UnknownSymbolKind("gizmo".into()).to_string(),
            "unknown symbol kind 'gizmo'"
        );
    }

    #[test]
    fn test_search_failed_keeps_source() {
        let source: ProviderError = "language server crashed".into();
        let err = Error::SearchFailed(source);

        assert_eq!(err.to_string(), "search provider failed: language server crashed");
        assert!(err.source().is_some());
    }
}
