//! End-to-end scenarios over hand-built declarations and a memory index.

use swiftsweep::graph::{DeclarationKind, EntryPointReason};
use swiftsweep::index::{IndexSymbolKind, MemoryIndex, Usr};

use crate::common::*;

#[test]
fn test_simple_dead_function() {
    let mut index = MemoryIndex::new();
    index.add(canonical("s:used", "used()", IndexSymbolKind::Function, 1));
    index.add(canonical("s:dead", "dead()", IndexSymbolKind::Function, 3));

    let declarations = vec![
        entry(
            decl("used", DeclarationKind::Function, 1, 1),
            EntryPointReason::MainAttribute,
        ),
        decl("dead", DeclarationKind::Function, 3, 3),
    ];

    let (outcome, _, _) = run_pipeline(declarations, &index);

    assert_eq!(dead_names(&outcome), vec!["dead"]);
    assert_eq!(number_of(&outcome, "dead"), "1.0");
}

#[test]
fn test_entry_point_chain_has_no_dead_symbols() {
    let mut index = MemoryIndex::new();
    index.add(canonical("s:App", "App", IndexSymbolKind::Class, 1));
    index.add(canonical("s:App.run", "run()", IndexSymbolKind::InstanceMethod, 2));
    index.add(canonical("s:helper1", "helper1()", IndexSymbolKind::Function, 10));
    index.add(canonical("s:helper2", "helper2()", IndexSymbolKind::Function, 20));
    index.add(reference("s:helper1", 3, vec![called_by("s:App.run")]));
    index.add(reference("s:helper2", 12, vec![called_by("s:helper1")]));

    let declarations = vec![
        entry(
            decl("App", DeclarationKind::Class, 1, 5),
            EntryPointReason::FrameworkRoot,
        ),
        entry(
            decl("App.run", DeclarationKind::Function, 2, 4),
            EntryPointReason::CommandRun,
        ),
        decl("helper1", DeclarationKind::Function, 10, 14),
        decl("helper2", DeclarationKind::Function, 20, 24),
    ];

    let (outcome, _, _) = run_pipeline(declarations, &index);

    assert!(outcome.dead.is_empty(), "dead: {:?}", dead_names(&outcome));
    assert!(outcome.reachable.contains(&Usr::from("s:helper2")));
}

#[test]
fn test_container_with_unused_property_prunes_type_edge() {
    let mut index = MemoryIndex::new();
    index.add(canonical("s:A", "A", IndexSymbolKind::Struct, 1));
    index.add(canonical("s:A.m", "m()", IndexSymbolKind::InstanceMethod, 2));
    index.add(canonical("s:A.t", "t", IndexSymbolKind::InstanceProperty, 3));
    index.add(canonical("s:T", "T", IndexSymbolKind::Struct, 20));
    index.add(canonical("s:T.mt", "mt()", IndexSymbolKind::InstanceMethod, 21));
    // The property's type annotation references T from inside A.
    index.add(reference("s:T", 3, vec![contained_by("s:A")]));
    // No reference occurrences of s:A.t anywhere: the property is unused.

    let declarations = vec![
        entry(
            decl("A", DeclarationKind::Struct, 1, 10),
            EntryPointReason::FrameworkRoot,
        ),
        entry(
            decl("A.m", DeclarationKind::Function, 2, 2),
            EntryPointReason::LifecycleMethod,
        ),
        property("A.t", "T", 3),
        decl("T", DeclarationKind::Struct, 20, 30),
        decl("T.mt", DeclarationKind::Function, 21, 23),
    ];

    let (outcome, _, graph) = run_pipeline(declarations, &index);

    // Pruning removed the container -> property-type edge.
    assert_eq!(outcome.pruned.len(), 1);
    assert_eq!(outcome.pruned[0].container, Usr::from("s:A"));
    assert_eq!(outcome.pruned[0].property_type, Usr::from("s:T"));
    assert!(!graph.has_edge(&Usr::from("s:A"), &Usr::from("s:T")));

    let mut names = dead_names(&outcome);
    names.sort();
    assert_eq!(names, vec!["A.t", "T", "T.mt"]);
}

#[test]
fn test_unused_property_with_generic_type_still_prunes() {
    let mut index = MemoryIndex::new();
    index.add(canonical("s:A", "A", IndexSymbolKind::Struct, 1));
    index.add(canonical("s:A.box", "box", IndexSymbolKind::InstanceProperty, 3));
    index.add(canonical("s:Box", "Box", IndexSymbolKind::Struct, 20));
    index.add(reference("s:Box", 3, vec![contained_by("s:A")]));

    let declarations = vec![
        entry(
            decl("A", DeclarationKind::Struct, 1, 10),
            EntryPointReason::FrameworkRoot,
        ),
        property("A.box", "Box<Int>", 3),
        decl("Box", DeclarationKind::Struct, 20, 30),
    ];

    let (outcome, _, _) = run_pipeline(declarations, &index);
    assert_eq!(outcome.pruned.len(), 1);
    assert_eq!(outcome.pruned[0].property_type, Usr::from("s:Box"));
}

#[test]
fn test_extension_and_type_merge() {
    let mut index = MemoryIndex::new();
    index.add(canonical("s:X", "X", IndexSymbolKind::Struct, 1));
    let mut extension_def = canonical("s:X", "X", IndexSymbolKind::Struct, 10);
    extension_def.location.line = 10;
    index.add(extension_def);

    let declarations = vec![
        entry(
            decl("X", DeclarationKind::Struct, 1, 5),
            EntryPointReason::PublicApi,
        ),
        decl("X", DeclarationKind::Extension, 10, 14),
    ];

    let bridge = swiftsweep::graph::KindBridge::default();
    let join = swiftsweep::graph::SymbolJoiner::new(&index, &bridge)
        .hydrate(declarations)
        .unwrap();

    // Exactly one hydrated declaration for X; the collision is logged.
    assert_eq!(join.hydrated.len(), 1);
    assert_eq!(join.collisions.len(), 1);
    assert_eq!(join.collisions[0].0, Usr::from("s:X"));

    let (mut graph, _) = swiftsweep::graph::GraphBuilder::new(&index)
        .build(join.hydrated)
        .unwrap();
    assert_eq!(graph.len(), 1);

    let outcome = swiftsweep::analysis::ReachabilityAnalyzer::new(&index)
        .analyze(&mut graph)
        .unwrap();
    assert!(outcome.dead.is_empty());
    assert_eq!(outcome.reachable.len(), 1);
}

#[test]
fn test_closure_inside_reachable_function_resolves_via_ascent() {
    let mut index = MemoryIndex::new();
    index.add(canonical("s:f", "f()", IndexSymbolKind::Function, 1));
    index.add(canonical("s:_h", "_h()", IndexSymbolKind::Function, 20));
    // The index records calledBy pointing into a synthesized closure the
    // syntax inventory never saw; its definition is contained by f.
    index.add(reference("s:_h", 3, vec![called_by("s:closure#1")]));
    {
        let mut closure_def = reference("s:closure#1", 2, vec![contained_by("s:f")]);
        closure_def.roles = vec![swiftsweep::index::SymbolRole::Definition];
        index.add(closure_def);
    }

    let declarations = vec![
        entry(
            decl("f", DeclarationKind::Function, 1, 10),
            EntryPointReason::MainAttribute,
        ),
        decl("_h", DeclarationKind::Function, 20, 25),
    ];

    let (outcome, log, graph) = run_pipeline(declarations, &index);

    assert!(graph.has_edge(&Usr::from("s:f"), &Usr::from("s:_h")));
    assert_eq!(log.mapped_symbolic(), 1);
    assert!(outcome.dead.is_empty(), "dead: {:?}", dead_names(&outcome));
}

#[test]
fn test_self_recursion_is_dead_without_self_edge() {
    let mut index = MemoryIndex::new();
    index.add(canonical("s:r", "r()", IndexSymbolKind::Function, 1));
    index.add(reference("s:r", 2, vec![called_by("s:r")]));

    let declarations = vec![decl("r", DeclarationKind::Function, 1, 3)];

    let (outcome, _, graph) = run_pipeline(declarations, &index);

    assert_eq!(graph.callees(&Usr::from("s:r")).count(), 0);
    assert_eq!(dead_names(&outcome), vec!["r"]);
    assert_eq!(number_of(&outcome, "r"), "1.0");
}

#[test]
fn test_rescue_keeps_members_of_live_ui_types() {
    let mut index = MemoryIndex::new();
    index.add(canonical("s:Screen", "Screen", IndexSymbolKind::Struct, 1));
    index.add(canonical(
        "s:Screen.onTap",
        "onTap()",
        IndexSymbolKind::InstanceMethod,
        3,
    ));

    // `onTap` has no references: it is handed to the framework as a closure.
    let declarations = vec![
        entry(
            decl("Screen", DeclarationKind::Struct, 1, 10),
            EntryPointReason::FrameworkRoot,
        ),
        decl("Screen.onTap", DeclarationKind::Function, 3, 5),
    ];

    let (outcome, _, _) = run_pipeline(declarations, &index);

    assert!(outcome.dead.is_empty(), "dead: {:?}", dead_names(&outcome));
    assert_eq!(outcome.rescued, vec![Usr::from("s:Screen.onTap")]);
}

#[test]
fn test_respect_public_api_limits_pruning() {
    let mut index = MemoryIndex::new();
    index.add(canonical("s:A", "A", IndexSymbolKind::Struct, 1));
    index.add(canonical("s:A.t", "t", IndexSymbolKind::InstanceProperty, 3));
    index.add(canonical("s:T", "T", IndexSymbolKind::Struct, 20));
    index.add(reference("s:T", 3, vec![contained_by("s:A")]));

    let mut public_property = property("A.t", "T", 3);
    public_property.access = swiftsweep::graph::AccessLevel::Public;
    public_property
        .entry_point_reasons
        .push(EntryPointReason::PublicApi);

    let declarations = vec![
        entry(
            decl("A", DeclarationKind::Struct, 1, 10),
            EntryPointReason::FrameworkRoot,
        ),
        public_property,
        decl("T", DeclarationKind::Struct, 20, 30),
    ];

    let bridge = swiftsweep::graph::KindBridge::default();
    let join = swiftsweep::graph::SymbolJoiner::new(&index, &bridge)
        .hydrate(declarations)
        .unwrap();
    let (mut graph, _) = swiftsweep::graph::GraphBuilder::new(&index)
        .build(join.hydrated)
        .unwrap();

    let outcome = swiftsweep::analysis::ReachabilityAnalyzer::new(&index)
        .with_respect_public_api(true)
        .analyze(&mut graph)
        .unwrap();

    // Safe mode: the public property does not justify removing A -> T.
    assert!(outcome.pruned.is_empty());
    assert!(graph.has_edge(&Usr::from("s:A"), &Usr::from("s:T")));
    assert!(outcome.reachable.contains(&Usr::from("s:T")));
}
