//! Centralized color scheme for consistent output formatting
//!
//! Based on Rust compiler diagnostics design (RFC 1644)

use colored::{ColoredString, Colorize};

/// Structural element colors
pub struct StructureColors;

impl StructureColors {
    /// File path with line/column
    pub fn location(text: &str) -> ColoredString {
        text.dimmed()
    }

    /// Declaration/symbol name
    pub fn symbol_name(text: &str) -> ColoredString {
        text.white().bold()
    }

    /// Declaration kind tag
    pub fn kind(text: &str) -> ColoredString {
        text.magenta()
    }

    /// Hierarchical symbol number
    pub fn number(text: &str) -> ColoredString {
        text.cyan()
    }

    /// Count/statistics numbers
    pub fn count(text: &str) -> ColoredString {
        text.white().bold()
    }
}

/// Mapping-log outcome markers
pub struct MappingIndicator;

impl MappingIndicator {
    pub fn mapped(text: &str) -> ColoredString {
        text.green()
    }

    pub fn unmapped(text: &str) -> ColoredString {
        text.yellow()
    }
}

/// Box drawing characters for section separators
pub struct BoxChars;

impl BoxChars {
    /// Heavy separator line
    pub fn heavy_line(width: usize) -> String {
        "━".repeat(width)
    }

    /// Light separator line
    pub fn light_line(width: usize) -> String {
        "─".repeat(width)
    }
}
