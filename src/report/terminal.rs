//! Terminal reporter: the mapping log block and the dead-code report.

use std::path::{Path, PathBuf};

use colored::Colorize;

use crate::analysis::{AnalysisOutcome, DeadSymbol};
use crate::graph::{MappingLog, SourceLocation};
use crate::report::colors::{BoxChars, MappingIndicator, StructureColors};

pub struct TerminalReporter {
    verbose: bool,
    base_path: Option<PathBuf>,
}

impl TerminalReporter {
    pub fn new() -> Self {
        Self {
            verbose: false,
            base_path: None,
        }
    }

    /// Print one line per processed reference instead of the summary.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_base_path(mut self, base: PathBuf) -> Self {
        self.base_path = Some(base);
        self
    }

    pub fn report(&self, outcome: &AnalysisOutcome, log: &MappingLog) {
        self.print_mapping_block(log);
        println!();
        self.print_dead_code_block(outcome);
    }

    fn print_mapping_block(&self, log: &MappingLog) {
        if self.verbose {
            for record in &log.records {
                let line = match (record.outcome.tier(), &record.caller) {
                    (Some(tier), Some(caller)) => format!(
                        "{} via {} {} -> {} (from {})",
                        MappingIndicator::mapped("[MAPPED]"),
                        tier,
                        StructureColors::location(&self.format_index_location(record)),
                        record.callee,
                        caller
                    ),
                    _ => format!(
                        "{} {} -> {}",
                        MappingIndicator::unmapped("[UNMAPPED]"),
                        StructureColors::location(&self.format_index_location(record)),
                        record.callee
                    ),
                };
                println!("{line}");
            }
            println!("{}", BoxChars::light_line(50).dimmed());
        }

        println!(
            "references: {} mapped (A: {}, B: {}), {} unmapped",
            StructureColors::count(
                &(log.mapped_symbolic() + log.mapped_geometric()).to_string()
            ),
            log.mapped_symbolic(),
            log.mapped_geometric(),
            log.unmapped()
        );
    }

    fn print_dead_code_block(&self, outcome: &AnalysisOutcome) {
        if !outcome.pruned.is_empty() {
            println!(
                "pruned {} container edge(s) through unused properties",
                StructureColors::count(&outcome.pruned.len().to_string())
            );
        }

        if outcome.dead.is_empty() {
            println!("{}", "✅ No unused symbols found.".green().bold());
            return;
        }

        println!(
            "{}",
            format!(
                "❌ Found {} potentially unused symbols:",
                outcome.dead.len()
            )
            .red()
            .bold()
        );
        for symbol in &outcome.dead {
            println!("{}", self.format_dead_symbol(symbol));
        }
    }

    fn format_dead_symbol(&self, symbol: &DeadSymbol) -> String {
        format!(
            "{} {} -> {} [{}]",
            StructureColors::number(&symbol.number.to_string()),
            StructureColors::location(&self.format_location(symbol.decl.location())),
            StructureColors::symbol_name(symbol.decl.name()),
            StructureColors::kind(symbol.decl.kind().display_name())
        )
    }

    fn format_location(&self, location: &SourceLocation) -> String {
        format!(
            "{}:{}:{}",
            self.format_path(&location.file),
            location.line,
            location.column
        )
    }

    fn format_index_location(&self, record: &crate::graph::MappingRecord) -> String {
        format!(
            "{}:{}:{}",
            self.format_path(&record.location.file),
            record.location.line,
            record.location.column
        )
    }

    fn format_path(&self, path: &Path) -> String {
        match &self.base_path {
            Some(base) => path.strip_prefix(base).unwrap_or(path).display().to_string(),
            None => path.display().to_string(),
        }
    }
}

impl Default for TerminalReporter {
    fn default() -> Self {
        Self::new()
    }
}
