//! Unused-property pruning, the reachability sweep, and the rescue pass.
//!
//! The graph builder records a reference from a container to a property's
//! type because the property exists syntactically. If the property itself is
//! never read, that edge represents no real use and would falsely keep the
//! type alive, so it is pruned before the sweep.

use std::collections::{HashMap, HashSet, VecDeque};

use miette::Result;
use tracing::{debug, info};

use super::{grouping, DeadSymbol};
use crate::graph::{CallGraph, DeclarationKind};
use crate::index::{SymbolIndex, SymbolRole, Usr};

/// A container→property-type edge removed by the pruning pre-pass.
#[derive(Debug, Clone)]
pub struct PrunedEdge {
    pub container: Usr,
    pub property_type: Usr,
    /// Qualified name of the unused property that justified the removal.
    pub property: String,
}

/// Everything the sweep produced, ready for reporting.
#[derive(Debug)]
pub struct AnalysisOutcome {
    /// Dead symbols, numbered and sorted.
    pub dead: Vec<DeadSymbol>,
    pub reachable: HashSet<Usr>,
    pub pruned: Vec<PrunedEdge>,
    /// Candidates reinstated by the rescue pass.
    pub rescued: Vec<Usr>,
    pub entry_point_count: usize,
}

pub struct ReachabilityAnalyzer<'a> {
    index: &'a dyn SymbolIndex,
    respect_public_api: bool,
}

impl<'a> ReachabilityAnalyzer<'a> {
    pub fn new(index: &'a dyn SymbolIndex) -> Self {
        Self {
            index,
            respect_public_api: false,
        }
    }

    /// Restrict unused-property pruning to private/fileprivate properties.
    pub fn with_respect_public_api(mut self, enabled: bool) -> Self {
        self.respect_public_api = enabled;
        self
    }

    pub fn analyze(&self, graph: &mut CallGraph) -> Result<AnalysisOutcome> {
        let pruned = self.prune_unused_property_edges(graph)?;

        let entry_points = graph.entry_points();
        let reachable = sweep(graph, &entry_points);
        info!(
            "reachability: {} entry points, {} of {} declarations reachable",
            entry_points.len(),
            reachable.len(),
            graph.len()
        );

        let candidates: Vec<Usr> = graph
            .declarations()
            .filter(|d| !d.is_entry_point() && !reachable.contains(&d.usr))
            .map(|d| d.usr.clone())
            .collect();

        let (dead_usrs, rescued) = self.rescue(graph, &reachable, candidates);
        let dead = grouping::number_components(graph, &dead_usrs);

        Ok(AnalysisOutcome {
            dead,
            reachable,
            pruned,
            rescued,
            entry_point_count: entry_points.len(),
        })
    }

    /// Step 1: for every stored property with zero reference occurrences in
    /// the index, remove the container→property-type edge.
    fn prune_unused_property_edges(&self, graph: &mut CallGraph) -> Result<Vec<PrunedEdge>> {
        // First-wins lookups in declaration order, reproducible across runs.
        let mut type_by_base: HashMap<String, Usr> = HashMap::new();
        let mut decl_by_name: HashMap<String, Usr> = HashMap::new();
        for d in graph.declarations() {
            decl_by_name
                .entry(d.name().to_string())
                .or_insert_with(|| d.usr.clone());
            if d.kind().is_concrete_type() {
                type_by_base
                    .entry(d.decl.base_name().to_string())
                    .or_insert_with(|| d.usr.clone());
            }
        }

        let mut removals: Vec<PrunedEdge> = Vec::new();
        for d in graph.declarations() {
            if d.kind() != DeclarationKind::Property {
                continue;
            }
            if self.respect_public_api && !d.decl.access.is_private() {
                continue;
            }

            let references = self
                .index
                .occurrences_of_usr(&d.usr, &[SymbolRole::Reference])?;
            if !references.is_empty() {
                continue;
            }

            let Some(type_name) = d.decl.type_name.as_deref() else {
                continue;
            };
            let Some(property_type) = type_by_base.get(outer_type_name(type_name)) else {
                continue;
            };
            let Some(parent) = d.decl.parent_path() else {
                continue;
            };
            let Some(container) = decl_by_name.get(parent) else {
                continue;
            };

            removals.push(PrunedEdge {
                container: container.clone(),
                property_type: property_type.clone(),
                property: d.name().to_string(),
            });
        }

        let mut pruned = Vec::new();
        for removal in removals {
            if graph.remove_edge(&removal.container, &removal.property_type) {
                debug!(
                    "pruned edge {} -> {} (unused property '{}')",
                    removal.container, removal.property_type, removal.property
                );
                pruned.push(removal);
            }
        }
        Ok(pruned)
    }

    /// Step 4: members of live UI container types stay out of the report.
    /// Covers closures handed to framework calls and accessors the
    /// framework invokes implicitly.
    fn rescue(
        &self,
        graph: &CallGraph,
        reachable: &HashSet<Usr>,
        candidates: Vec<Usr>,
    ) -> (Vec<Usr>, Vec<Usr>) {
        let mut decl_by_name: HashMap<&str, &Usr> = HashMap::new();
        for d in graph.declarations() {
            decl_by_name.entry(d.name()).or_insert(&d.usr);
        }

        let mut dead = Vec::new();
        let mut rescued = Vec::new();

        'candidates: for usr in candidates {
            if let Some(d) = graph.declaration(&usr) {
                if matches!(
                    d.kind(),
                    DeclarationKind::Function | DeclarationKind::Variable
                ) {
                    if let Some(&parent_usr) =
                        d.decl.parent_path().and_then(|p| decl_by_name.get(p))
                    {
                        if reachable.contains(parent_usr) {
                            let parent_kind = graph.declaration(parent_usr).map(|p| p.kind());
                            if matches!(
                                parent_kind,
                                Some(DeclarationKind::Struct) | Some(DeclarationKind::Class)
                            ) {
                                debug!("rescued '{}': parent type is reachable", d.name());
                                rescued.push(usr);
                                continue 'candidates;
                            }
                        }
                    }
                }
            }
            dead.push(usr);
        }

        (dead, rescued)
    }
}

/// Step 2: breadth-first sweep along out-edges from the entry set.
fn sweep(graph: &CallGraph, entry_points: &[Usr]) -> HashSet<Usr> {
    let mut reachable: HashSet<Usr> = entry_points.iter().cloned().collect();
    let mut queue: VecDeque<Usr> = entry_points.iter().cloned().collect();

    while let Some(current) = queue.pop_front() {
        for callee in graph.callees(&current) {
            if reachable.insert(callee.clone()) {
                queue.push_back(callee.clone());
            }
        }
    }

    reachable
}

/// Outer name of a declared type: `Box<T>` -> `Box`, `Tracker?` -> `Tracker`.
/// Generic arguments never decide whether pruning applies.
fn outer_type_name(type_name: &str) -> &str {
    type_name
        .trim_end_matches(['?', '!'])
        .split('<')
        .next()
        .unwrap_or(type_name)
        .trim()
}
