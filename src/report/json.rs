//! JSON reporter for CI consumption.

use std::path::PathBuf;

use miette::{IntoDiagnostic, Result, WrapErr};
use serde::Serialize;

use crate::analysis::AnalysisOutcome;
use crate::graph::MappingLog;

#[derive(Serialize)]
struct JsonReport<'a> {
    summary: JsonSummary,
    unused_symbols: Vec<JsonSymbol<'a>>,
}

#[derive(Serialize)]
struct JsonSummary {
    entry_points: usize,
    reachable: usize,
    unused: usize,
    pruned_edges: usize,
    rescued: usize,
    references_mapped_symbolic: usize,
    references_mapped_geometric: usize,
    references_unmapped: usize,
}

#[derive(Serialize)]
struct JsonSymbol<'a> {
    number: String,
    file: String,
    line: u32,
    column: u32,
    name: &'a str,
    kind: &'a str,
    usr: &'a str,
}

pub struct JsonReporter {
    output_path: Option<PathBuf>,
}

impl JsonReporter {
    pub fn new(output_path: Option<PathBuf>) -> Self {
        Self { output_path }
    }

    pub fn report(&self, outcome: &AnalysisOutcome, log: &MappingLog) -> Result<()> {
        let report = JsonReport {
            summary: JsonSummary {
                entry_points: outcome.entry_point_count,
                reachable: outcome.reachable.len(),
                unused: outcome.dead.len(),
                pruned_edges: outcome.pruned.len(),
                rescued: outcome.rescued.len(),
                references_mapped_symbolic: log.mapped_symbolic(),
                references_mapped_geometric: log.mapped_geometric(),
                references_unmapped: log.unmapped(),
            },
            unused_symbols: outcome
                .dead
                .iter()
                .map(|symbol| JsonSymbol {
                    number: symbol.number.to_string(),
                    file: symbol.decl.location().file.display().to_string(),
                    line: symbol.decl.location().line,
                    column: symbol.decl.location().column,
                    name: symbol.decl.name(),
                    kind: symbol.decl.kind().display_name(),
                    usr: symbol.decl.usr.as_str(),
                })
                .collect(),
        };

        let rendered = serde_json::to_string_pretty(&report).into_diagnostic()?;
        match &self.output_path {
            Some(path) => std::fs::write(path, rendered)
                .into_diagnostic()
                .wrap_err_with(|| format!("failed to write report to {}", path.display()))?,
            None => println!("{rendered}"),
        }
        Ok(())
    }
}
