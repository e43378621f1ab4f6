//! Reachability analysis over the joined symbol graph.

mod grouping;
mod reachability;

pub use reachability::{AnalysisOutcome, PrunedEdge, ReachabilityAnalyzer};

use std::fmt;

use serde::Serialize;

use crate::graph::HydratedDeclaration;

/// Hierarchical number assigned to a dead symbol within its component:
/// `k` for the component, `k.i` for its leaves, `parent.child` suffixes up
/// the incoming dead edges.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SymbolNumber(Vec<u32>);

impl SymbolNumber {
    pub fn new(parts: Vec<u32>) -> Self {
        Self(parts)
    }

    pub fn parts(&self) -> &[u32] {
        &self.0
    }
}

impl fmt::Display for SymbolNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for part in &self.0 {
            if !first {
                f.write_str(".")?;
            }
            write!(f, "{part}")?;
            first = false;
        }
        Ok(())
    }
}

/// A declaration unreachable from every entry point.
#[derive(Debug, Clone, Serialize)]
pub struct DeadSymbol {
    pub number: SymbolNumber,
    pub decl: HydratedDeclaration,
}
