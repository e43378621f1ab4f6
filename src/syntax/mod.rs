//! Syntactic view of the program: the source inventory.
//!
//! Parses Swift files with tree-sitter and emits [`crate::graph::Declaration`]
//! records carrying qualified names, body-spanning ranges, access levels,
//! stored-property type names, and entry-point reasons flagged at parse time.

mod entry_points;
mod inventory;

pub use entry_points::EntryPointPolicy;
pub use inventory::SwiftParser;
