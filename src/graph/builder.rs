//! Reference graph construction.
//!
//! For every reference occurrence of every hydrated USR, the builder
//! attributes the occurrence to the single enclosing hydrated declaration
//! (the caller) and records a caller→callee edge.
//!
//! Attribution is two-tier. Tier A walks the index's containment/called-by
//! relations: precise, but the index does not record them universally for
//! closures and nested scopes. Tier B falls back to geometric containment
//! over the pre-indexed interval map: always available, and the
//! largest-start-line tie-break keeps it order-independent.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use miette::Result;
use tracing::{debug, info, warn};

use crate::graph::{GeometricIndex, HydratedDeclaration};
use crate::index::{IndexLocation, ReferenceOccurrence, SymbolIndex, SymbolRole, Usr};

/// Default cap on Tier-A ascent hops. A safety cap, not a semantic limit;
/// raise it via config when index containment chains run deeper.
pub const DEFAULT_ASCENT_BUDGET: usize = 10;

/// How one reference occurrence was attributed to a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingOutcome {
    /// Resolved by walking index containment/called-by relations.
    SymbolicAscent,
    /// Resolved by geometric containment over declaration ranges.
    GeometricFallback,
    /// No enclosing known declaration could be determined.
    Unmapped,
}

impl MappingOutcome {
    pub fn is_mapped(&self) -> bool {
        !matches!(self, MappingOutcome::Unmapped)
    }

    /// Tier label used in the mapping log.
    pub fn tier(&self) -> Option<&'static str> {
        match self {
            MappingOutcome::SymbolicAscent => Some("A"),
            MappingOutcome::GeometricFallback => Some("B"),
            MappingOutcome::Unmapped => None,
        }
    }
}

/// One processed reference with its decisive outcome.
#[derive(Debug, Clone)]
pub struct MappingRecord {
    pub callee: Usr,
    pub location: IndexLocation,
    pub caller: Option<Usr>,
    pub outcome: MappingOutcome,
}

impl fmt::Display for MappingRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.outcome.tier(), &self.caller) {
            (Some(tier), Some(caller)) => write!(
                f,
                "[MAPPED] via {} {} -> {} (from {})",
                tier, self.location, self.callee, caller
            ),
            _ => write!(f, "[UNMAPPED] {} -> {}", self.location, self.callee),
        }
    }
}

/// Complete log of every reference the builder processed, in processing
/// order. Each occurrence appears exactly once.
#[derive(Debug, Default)]
pub struct MappingLog {
    pub records: Vec<MappingRecord>,
}

impl MappingLog {
    pub fn mapped_symbolic(&self) -> usize {
        self.count(MappingOutcome::SymbolicAscent)
    }

    pub fn mapped_geometric(&self) -> usize {
        self.count(MappingOutcome::GeometricFallback)
    }

    pub fn unmapped(&self) -> usize {
        self.count(MappingOutcome::Unmapped)
    }

    fn count(&self, outcome: MappingOutcome) -> usize {
        self.records.iter().filter(|r| r.outcome == outcome).count()
    }
}

/// The joined symbol graph traversed for reachability.
///
/// `in_edges` is maintained as the exact inverse of `out_edges`; self-edges
/// are never stored. Declarations iterate in insertion order (the sorted
/// hydration order), keeping every downstream sweep deterministic.
#[derive(Debug, Default)]
pub struct CallGraph {
    usr_to_decl: HashMap<Usr, HydratedDeclaration>,
    order: Vec<Usr>,
    out_edges: HashMap<Usr, BTreeSet<Usr>>,
    in_edges: HashMap<Usr, BTreeSet<Usr>>,
    geometry: GeometricIndex,
}

impl CallGraph {
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, usr: &Usr) -> bool {
        self.usr_to_decl.contains_key(usr)
    }

    pub fn declaration(&self, usr: &Usr) -> Option<&HydratedDeclaration> {
        self.usr_to_decl.get(usr)
    }

    /// Declarations in insertion order.
    pub fn declarations(&self) -> impl Iterator<Item = &HydratedDeclaration> {
        self.order.iter().filter_map(|usr| self.usr_to_decl.get(usr))
    }

    /// USRs of declarations flagged as entry points, in insertion order.
    pub fn entry_points(&self) -> Vec<Usr> {
        self.declarations()
            .filter(|d| d.is_entry_point())
            .map(|d| d.usr.clone())
            .collect()
    }

    pub fn callees(&self, usr: &Usr) -> impl Iterator<Item = &Usr> {
        self.out_edges.get(usr).into_iter().flatten()
    }

    pub fn callers(&self, usr: &Usr) -> impl Iterator<Item = &Usr> {
        self.in_edges.get(usr).into_iter().flatten()
    }

    pub fn has_edge(&self, from: &Usr, to: &Usr) -> bool {
        self.out_edges.get(from).is_some_and(|set| set.contains(to))
    }

    pub fn geometry(&self) -> &GeometricIndex {
        &self.geometry
    }

    fn add_edge(&mut self, from: Usr, to: Usr) {
        if from == to {
            return;
        }
        self.out_edges.entry(from.clone()).or_default().insert(to.clone());
        self.in_edges.entry(to).or_default().insert(from);
    }

    /// Remove a directed edge from both maps. Returns whether it existed.
    pub fn remove_edge(&mut self, from: &Usr, to: &Usr) -> bool {
        let removed = self
            .out_edges
            .get_mut(from)
            .is_some_and(|set| set.remove(to));
        if removed {
            if let Some(set) = self.in_edges.get_mut(to) {
                set.remove(from);
            }
        }
        removed
    }
}

/// Builds the [`CallGraph`] from hydrated declarations plus the index's
/// reference occurrences.
pub struct GraphBuilder<'a> {
    index: &'a dyn SymbolIndex,
    ascent_budget: usize,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(index: &'a dyn SymbolIndex) -> Self {
        Self {
            index,
            ascent_budget: DEFAULT_ASCENT_BUDGET,
        }
    }

    pub fn with_ascent_budget(mut self, budget: usize) -> Self {
        self.ascent_budget = budget;
        self
    }

    pub fn build(&self, hydrated: Vec<HydratedDeclaration>) -> Result<(CallGraph, MappingLog)> {
        let mut graph = CallGraph {
            geometry: GeometricIndex::build(&hydrated),
            ..CallGraph::default()
        };

        for declaration in hydrated {
            // The joiner guarantees one declaration per USR; stay defensive
            // against hand-built inputs and keep the first.
            if graph.usr_to_decl.contains_key(&declaration.usr) {
                debug!(
                    "duplicate hydrated usr {} ('{}'), keeping first",
                    declaration.usr,
                    declaration.name()
                );
                continue;
            }
            graph.order.push(declaration.usr.clone());
            graph.usr_to_decl.insert(declaration.usr.clone(), declaration);
        }

        let mut log = MappingLog::default();

        for callee in graph.order.clone() {
            let references = self
                .index
                .occurrences_of_usr(&callee, &[SymbolRole::Reference])?;
            for occurrence in references {
                self.attribute(&mut graph, &mut log, &callee, &occurrence)?;
            }
        }

        info!(
            "graph: {} declarations, {} references mapped (A: {}, B: {}), {} unmapped",
            graph.len(),
            log.mapped_symbolic() + log.mapped_geometric(),
            log.mapped_symbolic(),
            log.mapped_geometric(),
            log.unmapped()
        );
        Ok((graph, log))
    }

    fn attribute(
        &self,
        graph: &mut CallGraph,
        log: &mut MappingLog,
        callee: &Usr,
        occurrence: &ReferenceOccurrence,
    ) -> Result<()> {
        let (caller, outcome) = match self.symbolic_ascent(graph, occurrence)? {
            Some(caller) => (Some(caller), MappingOutcome::SymbolicAscent),
            None => match graph
                .geometry
                .innermost(&occurrence.location.file, occurrence.location.line)
            {
                Some(caller) => (Some(caller.clone()), MappingOutcome::GeometricFallback),
                None => (None, MappingOutcome::Unmapped),
            },
        };

        if outcome == MappingOutcome::Unmapped {
            warn!(
                "unmapped reference to {} at {}",
                callee, occurrence.location
            );
        }

        if let Some(caller) = &caller {
            graph.add_edge(caller.clone(), callee.clone());
        }

        log.records.push(MappingRecord {
            callee: callee.clone(),
            location: occurrence.location.clone(),
            caller,
            outcome,
        });
        Ok(())
    }

    /// Tier A: seed from the occurrence's calledBy (else containedBy)
    /// relation, then climb definition-site containedBy links until a known
    /// declaration appears or the chain breaks.
    fn symbolic_ascent(
        &self,
        graph: &CallGraph,
        occurrence: &ReferenceOccurrence,
    ) -> Result<Option<Usr>> {
        let seed = occurrence
            .relation_with_role(SymbolRole::CalledBy)
            .or_else(|| occurrence.relation_with_role(SymbolRole::ContainedBy));
        let Some(seed) = seed else {
            return Ok(None);
        };

        let mut current = seed.usr.clone();
        for _ in 0..self.ascent_budget {
            if graph.contains(&current) {
                return Ok(Some(current));
            }

            let definitions = self
                .index
                .occurrences_of_usr(&current, &[SymbolRole::Definition])?;
            let Some(definition) = definitions.into_iter().next() else {
                return Ok(None);
            };
            let Some(container) = definition.relation_with_role(SymbolRole::ContainedBy) else {
                return Ok(None);
            };
            current = container.usr.clone();
        }

        debug!(
            "symbolic ascent exhausted {} hops at {}",
            self.ascent_budget, occurrence.location
        );
        Ok(None)
    }
}
