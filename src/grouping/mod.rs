//! Grouping algorithms: pure functions over hit data.
//!
//! - [`group_paths`] builds the compressed folder structure for directory grouping
//! - [`assign_members`] partitions a file's ranges by enclosing symbol
//!
//! Neither touches providers or caches; [`crate::tree`] drives both.

mod members;
mod paths;
mod symbols;

pub use members::{MemberAssignment, MemberBucket, MemberSymbol, assign_members};
pub use paths::{GroupNode, group_paths};
pub use symbols::{DocumentSymbol, SymbolKind};
