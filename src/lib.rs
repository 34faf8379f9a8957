//! # navtree-base
//!
//! Core library for grouping code-search hits into a navigable result tree.
//!
//! A search (references, implementations, type hierarchy, ...) returns a flat
//! list of hits. This crate groups them by folder, file and enclosing symbol,
//! materializes children lazily, keeps expansion and selection state across
//! rebuilds, and walks the tree for previous/next navigation.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! search   → Search registry, auto-navigation, collaborator traits
//!   ↓
//! tree     → Result tree, lazy children, navigation, path resolution
//!   ↓
//! grouping → Folder compression and member assignment (pure)
//!   ↓
//! base     → Primitives (ResourceId, Span, NodeId, labels)
//! ```
//!
//! `config` and `error` are shared by every layer.

// ============================================================================
// FOUNDATION
// ============================================================================

/// Foundation types: ResourceId, Span, NodeId, labels
pub mod base;

/// Settings consumed by the engine
pub mod config;

/// Crate error type
pub mod error;

// ============================================================================
// ENGINE
// ============================================================================

/// Pure grouping algorithms
pub mod grouping;

/// The stateful result tree
pub mod tree;

/// Searches and host collaborators
pub mod search;

// Re-export commonly needed items
pub use base::{Hit, LineIndex, Location, NodeId, NodeKind, Position, ResourceId, Span};
pub use config::TreeConfig;
pub use error::{Error, ProviderError, Result};
pub use grouping::{DocumentSymbol, SymbolKind};
pub use search::{SearchController, SearchId, SearchOutcome, SearchProvider};
pub use tree::{Direction, NodePath, ResultTree, TreeNode, TreeServices};
