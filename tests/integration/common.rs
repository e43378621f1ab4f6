//! Shared fixture builders for the pipeline tests.
//!
//! Declarations are constructed directly (as the syntax inventory would have
//! produced them) so the core join/graph/reachability stages are exercised
//! deterministically, independent of grammar details.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use swiftsweep::analysis::{AnalysisOutcome, ReachabilityAnalyzer};
use swiftsweep::graph::{
    AccessLevel, CallGraph, Declaration, DeclarationKind, EntryPointReason, GraphBuilder,
    KindBridge, MappingLog, SourceLocation, SymbolJoiner,
};
use swiftsweep::index::{
    IndexLocation, IndexSymbolKind, MemoryIndex, ReferenceOccurrence, SymbolRelation, SymbolRole,
};
use swiftsweep::graph::DeclarationId;

pub const FILE: &str = "/project/Sources/App.swift";

pub fn decl(name: &str, kind: DeclarationKind, line: u32, end_line: u32) -> Declaration {
    Declaration {
        id: DeclarationId::new(Path::new(FILE), line),
        name: name.to_string(),
        kind,
        location: SourceLocation {
            file: PathBuf::from(FILE),
            line,
            column: 1,
            end_line,
            end_column: 2,
        },
        access: AccessLevel::Internal,
        type_name: None,
        entry_point_reasons: vec![],
    }
}

pub fn entry(mut declaration: Declaration, reason: EntryPointReason) -> Declaration {
    declaration.entry_point_reasons.push(reason);
    declaration
}

pub fn property(name: &str, type_name: &str, line: u32) -> Declaration {
    let mut declaration = decl(name, DeclarationKind::Property, line, line);
    declaration.type_name = Some(type_name.to_string());
    declaration
}

/// Canonical definition occurrence on the declaration's start line, which is
/// what the joiner matches against.
pub fn canonical(usr: &str, name: &str, kind: IndexSymbolKind, line: u32) -> ReferenceOccurrence {
    ReferenceOccurrence {
        usr: usr.into(),
        name: name.to_string(),
        kind,
        location: IndexLocation {
            file: PathBuf::from(FILE),
            line,
            column: 6,
        },
        roles: vec![SymbolRole::Definition, SymbolRole::Canonical],
        relations: vec![],
    }
}

pub fn reference(usr: &str, line: u32, relations: Vec<SymbolRelation>) -> ReferenceOccurrence {
    ReferenceOccurrence {
        usr: usr.into(),
        name: String::new(),
        kind: IndexSymbolKind::Unknown,
        location: IndexLocation {
            file: PathBuf::from(FILE),
            line,
            column: 9,
        },
        roles: vec![SymbolRole::Reference],
        relations,
    }
}

pub fn called_by(caller: &str) -> SymbolRelation {
    SymbolRelation::new(vec![SymbolRole::CalledBy], caller)
}

pub fn contained_by(container: &str) -> SymbolRelation {
    SymbolRelation::new(vec![SymbolRole::ContainedBy], container)
}

/// Hydrate, build, and sweep in one go: the pipeline minus parsing and CLI.
pub fn run_pipeline(
    declarations: Vec<Declaration>,
    index: &MemoryIndex,
) -> (AnalysisOutcome, MappingLog, CallGraph) {
    let bridge = KindBridge::default();
    let join = SymbolJoiner::new(index, &bridge)
        .hydrate(declarations)
        .expect("join failed");
    let (mut graph, log) = GraphBuilder::new(index)
        .build(join.hydrated)
        .expect("graph build failed");
    let outcome = ReachabilityAnalyzer::new(index)
        .analyze(&mut graph)
        .expect("analysis failed");
    (outcome, log, graph)
}

pub fn dead_names(outcome: &AnalysisOutcome) -> Vec<String> {
    outcome
        .dead
        .iter()
        .map(|symbol| symbol.decl.name().to_string())
        .collect()
}

pub fn number_of(outcome: &AnalysisOutcome, name: &str) -> String {
    outcome
        .dead
        .iter()
        .find(|symbol| symbol.decl.name() == name)
        .unwrap_or_else(|| panic!("'{name}' not reported dead"))
        .number
        .to_string()
}
