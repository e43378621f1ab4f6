//! Grouped numbering of dead symbols.
//!
//! Dead symbols are grouped into weakly-connected components of the
//! dead-induced subgraph (both edge directions), then numbered
//! hierarchically: component leaves first (`k.0`, `k.1`, ...), then a
//! visited-guarded breadth-first walk up the incoming dead edges assigns
//! `parent.child` suffixes. Symbols no numbered path reaches keep the bare
//! component number, which also covers pure cycles.

use std::collections::{HashMap, VecDeque};

use petgraph::unionfind::UnionFind;

use super::{DeadSymbol, SymbolNumber};
use crate::graph::CallGraph;
use crate::index::Usr;

/// Number and sort the dead set. `dead` is expected in declaration order so
/// component indices and leaf ordinals are reproducible across runs.
pub(crate) fn number_components(graph: &CallGraph, dead: &[Usr]) -> Vec<DeadSymbol> {
    let index_of: HashMap<&Usr, usize> = dead.iter().enumerate().map(|(i, u)| (u, i)).collect();

    // Component discovery: union over dead-to-dead edges (direction ignored).
    let mut union = UnionFind::<usize>::new(dead.len());
    for (i, usr) in dead.iter().enumerate() {
        for callee in graph.callees(usr) {
            if let Some(&j) = index_of.get(callee) {
                union.union(i, j);
            }
        }
    }

    // Components in first-appearance order.
    let mut component_of_root: HashMap<usize, usize> = HashMap::new();
    let mut members: Vec<Vec<usize>> = Vec::new();
    for i in 0..dead.len() {
        let root = union.find(i);
        let component = *component_of_root.entry(root).or_insert_with(|| {
            members.push(Vec::new());
            members.len() - 1
        });
        members[component].push(i);
    }

    let mut numbers: Vec<Option<SymbolNumber>> = vec![None; dead.len()];

    for (component, member_indices) in members.iter().enumerate() {
        let k = component as u32 + 1;

        // Leaves: no outgoing edge to another dead symbol.
        let mut queue: VecDeque<usize> = VecDeque::new();
        let mut leaf_ordinal = 0u32;
        for &i in member_indices {
            let has_dead_callee = graph.callees(&dead[i]).any(|c| index_of.contains_key(c));
            if !has_dead_callee {
                numbers[i] = Some(SymbolNumber::new(vec![k, leaf_ordinal]));
                leaf_ordinal += 1;
                queue.push_back(i);
            }
        }

        // Walk incoming dead edges breadth-first, assigning child suffixes.
        while let Some(i) = queue.pop_front() {
            let Some(parent) = numbers[i].clone() else {
                continue;
            };
            let mut child_ordinal = 0u32;
            for caller in graph.callers(&dead[i]) {
                if let Some(&j) = index_of.get(caller) {
                    if numbers[j].is_none() {
                        let mut parts = parent.parts().to_vec();
                        parts.push(child_ordinal);
                        child_ordinal += 1;
                        numbers[j] = Some(SymbolNumber::new(parts));
                        queue.push_back(j);
                    }
                }
            }
        }

        // Everything left (pure cycles) keeps the bare component number.
        for &i in member_indices {
            if numbers[i].is_none() {
                numbers[i] = Some(SymbolNumber::new(vec![k]));
            }
        }
    }

    let mut symbols: Vec<DeadSymbol> = dead
        .iter()
        .zip(numbers)
        .filter_map(|(usr, number)| {
            let decl = graph.declaration(usr)?.clone();
            Some(DeadSymbol {
                number: number?,
                decl,
            })
        })
        .collect();
    symbols.sort_by(|a, b| a.number.cmp(&b.number));
    symbols
}
