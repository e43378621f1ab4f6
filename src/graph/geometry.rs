//! Geometric containment: per-file interval maps over declaration ranges.
//!
//! Used by the graph builder as the fallback when the index has no usable
//! containment chain for a reference. Source is lexically nested, so among
//! ranges containing a line, the one starting latest is the innermost scope.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::graph::HydratedDeclaration;
use crate::index::Usr;

#[derive(Debug, Clone)]
struct RangeEntry {
    start: u32,
    end: u32,
    usr: Usr,
}

/// Per-file lists of (line range, USR), sorted by start line ascending and
/// shorter range first so tighter scopes win ties.
#[derive(Debug, Default)]
pub struct GeometricIndex {
    by_file: HashMap<PathBuf, Vec<RangeEntry>>,
}

impl GeometricIndex {
    pub fn build(declarations: &[HydratedDeclaration]) -> Self {
        let mut by_file: HashMap<PathBuf, Vec<RangeEntry>> = HashMap::new();

        for hydrated in declarations {
            let location = hydrated.location();
            debug_assert!(location.line <= location.end_line);
            by_file
                .entry(location.file.clone())
                .or_default()
                .push(RangeEntry {
                    start: location.line,
                    end: location.end_line,
                    usr: hydrated.usr.clone(),
                });
        }

        for entries in by_file.values_mut() {
            entries.sort_by_key(|e| (e.start, e.end - e.start));
        }

        Self { by_file }
    }

    pub fn contains_file(&self, file: &Path) -> bool {
        self.by_file.contains_key(file)
    }

    /// The declaration whose range contains `line`, choosing the innermost
    /// scope: largest start line, shorter range on equal starts.
    pub fn innermost(&self, file: &Path, line: u32) -> Option<&Usr> {
        let entries = self.by_file.get(file)?;
        let mut best: Option<&RangeEntry> = None;

        for entry in entries {
            if entry.start > line {
                break;
            }
            if entry.end < line {
                continue;
            }
            // Entries are sorted by (start asc, length asc): a later hit with
            // a strictly larger start is more deeply nested; an equal start
            // keeps the earlier, shorter entry.
            if best.map_or(true, |b| entry.start > b.start) {
                best = Some(entry);
            }
        }

        best.map(|entry| &entry.usr)
    }
}
