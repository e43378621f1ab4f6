//! swiftsweep - Index-backed dead code detection for Swift
//!
//! This library joins two independent views of a Swift project to find
//! declarations unreachable from entry points:
//! - a **syntactic view** parsed with tree-sitter, authoritative for
//!   declaration locations, containment ranges, access levels, and
//!   entry-point heuristics
//! - a **semantic view** read from a pre-built compiler index, authoritative
//!   for canonical symbol identity (USRs) and cross-file references
//!
//! # Architecture
//!
//! The analysis pipeline consists of:
//! 1. **File Discovery** - Find all `.swift` files under the project root
//! 2. **Syntax Inventory** - Parse source files using tree-sitter
//! 3. **Symbol Joiner** - Hydrate each declaration with its canonical USR
//! 4. **Graph Builder** - Attribute every reference occurrence to its
//!    enclosing declaration and record caller→callee edges
//! 5. **Reachability Analysis** - Prune unused-property edges, sweep from
//!    entry points, rescue framework-implicit members
//! 6. **Reporting** - Numbered dead-code report plus the mapping log

pub mod analysis;
pub mod config;
pub mod discovery;
pub mod graph;
pub mod index;
pub mod report;
pub mod syntax;

pub use analysis::{AnalysisOutcome, DeadSymbol, ReachabilityAnalyzer, SymbolNumber};
pub use config::Config;
pub use discovery::FileFinder;
pub use graph::{
    AccessLevel, CallGraph, Declaration, DeclarationKind, GraphBuilder, HydratedDeclaration,
    JoinReport, MappingLog, SourceLocation, SymbolJoiner,
};
pub use index::{IndexStore, MemoryIndex, ReferenceOccurrence, SymbolIndex, Usr};
pub use report::{ReportFormat, Reporter};
pub use syntax::SwiftParser;
