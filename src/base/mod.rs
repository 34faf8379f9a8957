//! Foundation types for the result tree engine.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`ResourceId`], [`Hit`] - Searchable units and the occurrences found in them
//! - [`Position`], [`Span`], [`LineIndex`] - Source positions
//! - [`NodeId`], [`NodeKind`] - Stable node identity
//! - [`Label`], [`DocumentText`] - Label text and hit previews
//!
//! This module has NO dependencies on other navtree modules.

mod node_id;
mod resource;
mod span;
mod text;

pub use node_id::{NodeId, NodeKind};
pub use resource::{Hit, Location, ResourceId};
pub use span::{LineIndex, Position, Span};
pub use text::{
    DocumentText, Label, PREVIEW_AFTER_CHARS, PREVIEW_BEFORE_CHARS, PreviewChunks,
    match_description,
};

// Re-export text-size types for convenience
pub use text_size;
