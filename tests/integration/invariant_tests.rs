//! Quantified invariants over the pipeline.

use swiftsweep::graph::{DeclarationKind, EntryPointReason};
use swiftsweep::index::{IndexSymbolKind, MemoryIndex, Usr};

use crate::common::*;

fn chain_fixture() -> (MemoryIndex, Vec<swiftsweep::graph::Declaration>) {
    let mut index = MemoryIndex::new();
    index.add(canonical("s:main", "main()", IndexSymbolKind::Function, 1));
    index.add(canonical("s:a", "a()", IndexSymbolKind::Function, 10));
    index.add(canonical("s:b", "b()", IndexSymbolKind::Function, 20));
    index.add(canonical("s:orphan", "orphan()", IndexSymbolKind::Function, 30));
    index.add(reference("s:a", 2, vec![called_by("s:main")]));
    index.add(reference("s:b", 11, vec![called_by("s:a")]));
    index.add(reference("s:a", 21, vec![called_by("s:b")]));

    let declarations = vec![
        entry(
            decl("main", DeclarationKind::Function, 1, 5),
            EntryPointReason::MainAttribute,
        ),
        decl("a", DeclarationKind::Function, 10, 14),
        decl("b", DeclarationKind::Function, 20, 24),
        decl("orphan", DeclarationKind::Function, 30, 34),
    ];
    (index, declarations)
}

#[test]
fn test_in_edges_are_exact_inverse_of_out_edges() {
    let (index, declarations) = chain_fixture();
    let (_, _, graph) = run_pipeline(declarations, &index);

    for declaration in graph.declarations() {
        for callee in graph.callees(&declaration.usr) {
            assert!(
                graph.callers(callee).any(|c| c == &declaration.usr),
                "missing inverse of {} -> {}",
                declaration.usr,
                callee
            );
        }
        for caller in graph.callers(&declaration.usr) {
            assert!(
                graph.callees(caller).any(|c| c == &declaration.usr),
                "missing forward of {} -> {}",
                caller,
                declaration.usr
            );
        }
    }
}

#[test]
fn test_every_reachable_symbol_has_a_path_from_an_entry_point() {
    let (index, declarations) = chain_fixture();
    let (outcome, _, graph) = run_pipeline(declarations, &index);

    // BFS with a cycle (a <-> b) terminates and reaches both sides.
    for usr in ["s:main", "s:a", "s:b"] {
        assert!(outcome.reachable.contains(&Usr::from(usr)), "{usr}");
    }
    assert!(!outcome.reachable.contains(&Usr::from("s:orphan")));

    // Spot-check path existence by replaying edges.
    assert!(graph.has_edge(&Usr::from("s:main"), &Usr::from("s:a")));
    assert!(graph.has_edge(&Usr::from("s:a"), &Usr::from("s:b")));
}

#[test]
fn test_mapping_log_round_trip() {
    let (index, declarations) = chain_fixture();
    let (_, log, _) = run_pipeline(declarations, &index);

    // Every reference occurrence appears exactly once with a decisive
    // outcome.
    assert_eq!(log.records.len(), 3);
    assert_eq!(
        log.mapped_symbolic() + log.mapped_geometric() + log.unmapped(),
        log.records.len()
    );
}

#[test]
fn test_analysis_is_idempotent() {
    let render = || {
        let (index, declarations) = chain_fixture();
        let (outcome, log, _) = run_pipeline(declarations, &index);
        let dead: Vec<String> = outcome
            .dead
            .iter()
            .map(|s| format!("{} {}", s.number, s.decl.name()))
            .collect();
        let mapping: Vec<String> = log.records.iter().map(|r| r.to_string()).collect();
        (dead, mapping)
    };

    let first = render();
    for _ in 0..5 {
        assert_eq!(first, render());
    }
}

#[test]
fn test_reference_on_one_line_declaration_maps_geometrically() {
    let mut index = MemoryIndex::new();
    index.add(canonical("s:oneliner", "oneliner()", IndexSymbolKind::Function, 7));
    index.add(canonical("s:callee", "callee()", IndexSymbolKind::Function, 20));
    // No relations: Tier A cannot seed, Tier B must hit the one-line range.
    index.add(reference("s:callee", 7, vec![]));

    let declarations = vec![
        decl("oneliner", DeclarationKind::Function, 7, 7),
        decl("callee", DeclarationKind::Function, 20, 22),
    ];

    let (_, log, graph) = run_pipeline(declarations, &index);

    assert_eq!(log.mapped_geometric(), 1);
    assert!(graph.has_edge(&Usr::from("s:oneliner"), &Usr::from("s:callee")));
}

#[test]
fn test_unmatched_declarations_never_reach_the_graph() {
    let mut index = MemoryIndex::new();
    index.add(canonical("s:known", "known()", IndexSymbolKind::Function, 1));
    // No canonical definition anywhere near the ghost declaration.

    let declarations = vec![
        decl("known", DeclarationKind::Function, 1, 2),
        decl("ghost", DeclarationKind::Function, 50, 55),
    ];

    let bridge = swiftsweep::graph::KindBridge::default();
    let join = swiftsweep::graph::SymbolJoiner::new(&index, &bridge)
        .hydrate(declarations)
        .unwrap();

    assert_eq!(join.hydrated.len(), 1);
    assert_eq!(join.unmatched.len(), 1);
    assert_eq!(join.unmatched[0].name, "ghost");

    let (graph, _) = swiftsweep::graph::GraphBuilder::new(&index)
        .build(join.hydrated)
        .unwrap();
    assert_eq!(graph.len(), 1);
}
