//! The joined symbol graph: declarations, hydration, and reference edges.
//!
//! This module owns the two hard joins of the pipeline:
//! 1. [`SymbolJoiner`] pairs each parsed declaration with its canonical USR
//!    from the compiler index (kind-and-name scoring, line-proximity
//!    fallback).
//! 2. [`GraphBuilder`] turns reference occurrences into caller→callee edges
//!    by attributing each occurrence to the enclosing known declaration
//!    (symbolic ascent with geometric fallback).

mod builder;
mod declaration;
mod geometry;
mod joiner;

pub use builder::{
    CallGraph, GraphBuilder, MappingLog, MappingOutcome, MappingRecord, DEFAULT_ASCENT_BUDGET,
};
pub use declaration::{
    AccessLevel, Declaration, DeclarationId, DeclarationKind, EntryPointReason,
    HydratedDeclaration, SourceLocation,
};
pub use geometry::GeometricIndex;
pub use joiner::{JoinReport, KindBridge, KindBridgeRow, SymbolJoiner};
