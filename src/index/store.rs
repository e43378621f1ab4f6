//! On-disk index store reader.
//!
//! The exporter that runs next to the build writes one JSON record file per
//! translation unit into the store directory. Each record carries the source
//! file it covers and every occurrence the compiler emitted for it:
//!
//! ```json
//! {
//!   "file": "/abs/path/Sources/App/Main.swift",
//!   "occurrences": [
//!     { "usr": "s:3App4mainyyF", "name": "main()", "kind": "function", ... }
//!   ]
//! }
//! ```
//!
//! The whole store is loaded eagerly at open time; a typical project yields
//! tens of thousands of occurrences, which fit in RAM without spill. Open
//! failures and malformed records are fatal: the semantic view is either
//! trustworthy or the run aborts.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use miette::{miette, IntoDiagnostic, Result, WrapErr};
use serde::Deserialize;
use tracing::{debug, info};

use super::{matches_role_filter, ReferenceOccurrence, SymbolIndex, SymbolRole, Usr};
use crate::discovery::normalize_path;

/// One record file in the store directory.
#[derive(Debug, Deserialize)]
struct FileRecord {
    file: PathBuf,
    occurrences: Vec<ReferenceOccurrence>,
}

/// A [`SymbolIndex`] backed by a directory of per-file JSON records.
pub struct IndexStore {
    by_file: HashMap<PathBuf, Vec<ReferenceOccurrence>>,
    by_usr: HashMap<Usr, Vec<ReferenceOccurrence>>,
}

impl IndexStore {
    /// Load every record file under `store_path`.
    ///
    /// Record paths are normalized once at ingest (absolute, symlinks
    /// resolved) so later lookups compare by byte equality.
    pub fn open(store_path: &Path) -> Result<Self> {
        if !store_path.is_dir() {
            return Err(miette!(
                "index store path is not a directory: {}",
                store_path.display()
            ));
        }

        let mut record_paths: Vec<PathBuf> = fs::read_dir(store_path)
            .into_diagnostic()
            .wrap_err_with(|| format!("failed to read index store {}", store_path.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        record_paths.sort();

        if record_paths.is_empty() {
            return Err(miette!(
                "index store contains no record files: {}",
                store_path.display()
            ));
        }

        let mut by_file: HashMap<PathBuf, Vec<ReferenceOccurrence>> = HashMap::new();
        let mut by_usr: HashMap<Usr, Vec<ReferenceOccurrence>> = HashMap::new();
        let mut total = 0usize;

        for record_path in &record_paths {
            let raw = fs::read_to_string(record_path)
                .into_diagnostic()
                .wrap_err_with(|| format!("failed to read record {}", record_path.display()))?;
            let record: FileRecord = serde_json::from_str(&raw)
                .into_diagnostic()
                .wrap_err_with(|| format!("malformed index record {}", record_path.display()))?;

            let file = normalize_path(&record.file);
            debug!(
                "index record {}: {} occurrences for {}",
                record_path.display(),
                record.occurrences.len(),
                file.display()
            );

            for mut occurrence in record.occurrences {
                occurrence.location.file = normalize_path(&occurrence.location.file);
                total += 1;
                by_usr
                    .entry(occurrence.usr.clone())
                    .or_default()
                    .push(occurrence.clone());
                by_file.entry(file.clone()).or_default().push(occurrence);
            }
        }

        info!(
            "index store: {} records, {} occurrences, {} distinct symbols",
            record_paths.len(),
            total,
            by_usr.len()
        );

        Ok(Self { by_file, by_usr })
    }

    pub fn symbol_count(&self) -> usize {
        self.by_usr.len()
    }
}

impl SymbolIndex for IndexStore {
    fn occurrences_in_file(&self, path: &Path) -> Result<Vec<ReferenceOccurrence>> {
        Ok(self.by_file.get(path).cloned().unwrap_or_default())
    }

    fn occurrences_of_usr(
        &self,
        usr: &Usr,
        role_filter: &[SymbolRole],
    ) -> Result<Vec<ReferenceOccurrence>> {
        Ok(self
            .by_usr
            .get(usr)
            .map(|occurrences| {
                occurrences
                    .iter()
                    .filter(|o| matches_role_filter(o, role_filter))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}
