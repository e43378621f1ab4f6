//! Cross-view symbol dump (`--dump-symbols`).
//!
//! Prints every parsed declaration next to the canonical USR the joiner
//! selected for it, before any graph is built. The main debugging aid when
//! the two views disagree.

use colored::Colorize;

use crate::graph::JoinReport;
use crate::report::colors::{BoxChars, StructureColors};

pub fn print_symbol_dump(report: &JoinReport) {
    println!("{}", "Symbol dump (syntactic view ∪ index view)".bold());
    println!("{}", BoxChars::heavy_line(60).dimmed());

    for hydrated in &report.hydrated {
        println!(
            "{} [{}] {} -> {}",
            StructureColors::symbol_name(hydrated.name()),
            StructureColors::kind(hydrated.kind().display_name()),
            StructureColors::location(&hydrated.location().to_string()),
            hydrated.usr
        );
    }

    for decl in &report.unmatched {
        println!(
            "{} [{}] {} -> {}",
            StructureColors::symbol_name(&decl.name),
            StructureColors::kind(decl.kind.display_name()),
            StructureColors::location(&decl.location.to_string()),
            "UNMATCHED".yellow()
        );
    }

    if !report.collisions.is_empty() {
        println!("{}", BoxChars::light_line(60).dimmed());
        for (usr, decl) in &report.collisions {
            println!(
                "collision: '{}' at {} also resolved to {}",
                decl.name,
                StructureColors::location(&decl.location.to_string()),
                usr
            );
        }
    }

    println!("{}", BoxChars::light_line(60).dimmed());
    println!(
        "{} hydrated, {} unmatched, {} collisions",
        StructureColors::count(&report.hydrated.len().to_string()),
        StructureColors::count(&report.unmatched.len().to_string()),
        StructureColors::count(&report.collisions.len().to_string()),
    );
}
