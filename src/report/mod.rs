mod colors;
mod dump;
mod json;
mod terminal;

pub use dump::print_symbol_dump;
pub use json::JsonReporter;
pub use terminal::TerminalReporter;

use std::path::PathBuf;

use miette::Result;

use crate::analysis::AnalysisOutcome;
use crate::graph::MappingLog;

/// Output format for the analysis report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    /// Human-readable terminal output: mapping log plus dead-code report.
    #[default]
    Terminal,
    /// Machine-readable JSON for CI consumption.
    Json,
}

/// Options shared by the reporters.
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    /// Output file for the JSON format; stdout when unset.
    pub output_path: Option<PathBuf>,
    /// Base path stripped from file paths for shorter display.
    pub base_path: Option<PathBuf>,
    /// Print the full per-reference mapping log instead of the summary.
    pub verbose: bool,
}

/// Dispatches the analysis outcome to the selected reporter.
pub struct Reporter {
    format: ReportFormat,
    options: ReportOptions,
}

impl Reporter {
    pub fn new(format: ReportFormat, options: ReportOptions) -> Self {
        Self { format, options }
    }

    pub fn report(&self, outcome: &AnalysisOutcome, log: &MappingLog) -> Result<()> {
        match self.format {
            ReportFormat::Terminal => {
                let mut reporter = TerminalReporter::new().with_verbose(self.options.verbose);
                if let Some(base) = &self.options.base_path {
                    reporter = reporter.with_base_path(base.clone());
                }
                reporter.report(outcome, log);
                Ok(())
            }
            ReportFormat::Json => {
                let reporter = JsonReporter::new(self.options.output_path.clone());
                reporter.report(outcome, log)
            }
        }
    }
}
