//! In-memory symbol index for tests and embedders.

use std::path::Path;

use miette::Result;

use super::{matches_role_filter, ReferenceOccurrence, SymbolIndex, SymbolRole, Usr};

/// A [`SymbolIndex`] backed by a plain vector of occurrences.
///
/// Occurrences are returned in insertion order, so fixtures behave
/// deterministically without any sorting on the query path.
#[derive(Debug, Default)]
pub struct MemoryIndex {
    occurrences: Vec<ReferenceOccurrence>,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, occurrence: ReferenceOccurrence) -> &mut Self {
        self.occurrences.push(occurrence);
        self
    }

    pub fn extend(&mut self, occurrences: impl IntoIterator<Item = ReferenceOccurrence>) {
        self.occurrences.extend(occurrences);
    }

    pub fn len(&self) -> usize {
        self.occurrences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occurrences.is_empty()
    }
}

impl SymbolIndex for MemoryIndex {
    fn occurrences_in_file(&self, path: &Path) -> Result<Vec<ReferenceOccurrence>> {
        Ok(self
            .occurrences
            .iter()
            .filter(|o| o.location.file == path)
            .cloned()
            .collect())
    }

    fn occurrences_of_usr(
        &self,
        usr: &Usr,
        role_filter: &[SymbolRole],
    ) -> Result<Vec<ReferenceOccurrence>> {
        Ok(self
            .occurrences
            .iter()
            .filter(|o| &o.usr == usr && matches_role_filter(o, role_filter))
            .cloned()
            .collect())
    }
}
