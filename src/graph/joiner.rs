//! Symbol joiner: hydrate syntactic declarations with canonical USRs.
//!
//! Parsers and the compiler index disagree on start lines for attribute
//! stacks, multi-line signatures, and synthesized accessors. Exact-line
//! matching covers the common case; a narrow fuzzy window handles the rest
//! without the false-match explosion a global name fallback would cause.

use std::collections::HashMap;
use std::path::PathBuf;

use miette::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::graph::{Declaration, DeclarationKind, HydratedDeclaration};
use crate::index::{IndexSymbolKind, ReferenceOccurrence, SymbolIndex, Usr};

/// Score granted when the candidate's kind is compatible. Required: a
/// candidate with an incompatible kind is discarded outright.
const KIND_SCORE: i64 = 1000;

/// Score granted when base names agree.
const NAME_SCORE: i64 = 100;

/// Lines searched above the start and below the end when the exact line
/// yields no kind-compatible candidate.
const FUZZY_WINDOW: u32 = 2;

/// Kind-compatibility table between syntactic and index kinds.
///
/// Kept as data rather than logic so the table can be extended (new index
/// kinds, project-specific bridges) from the config file without touching
/// the joiner.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KindBridge {
    rows: Vec<KindBridgeRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KindBridgeRow {
    pub decl: DeclarationKind,
    pub index: Vec<IndexSymbolKind>,
}

impl KindBridge {
    pub fn compatible(&self, decl: DeclarationKind, index: IndexSymbolKind) -> bool {
        self.rows
            .iter()
            .any(|row| row.decl == decl && row.index.contains(&index))
    }
}

impl Default for KindBridge {
    fn default() -> Self {
        use DeclarationKind as D;
        use IndexSymbolKind as I;

        let row = |decl: D, index: Vec<I>| KindBridgeRow { decl, index };
        Self {
            rows: vec![
                row(D::Struct, vec![I::Struct]),
                row(D::Class, vec![I::Class]),
                row(D::Enum, vec![I::Enum]),
                row(D::Protocol, vec![I::Protocol]),
                // Extensions hydrate to the extended type's USR, so a type
                // and its extensions collapse into one graph node.
                row(D::Extension, vec![I::Struct, I::Class, I::Enum, I::Protocol]),
                row(D::Initializer, vec![I::Constructor]),
                row(
                    D::Function,
                    vec![I::Function, I::InstanceMethod, I::StaticMethod, I::ClassMethod],
                ),
                row(
                    D::Variable,
                    vec![I::Variable, I::InstanceProperty, I::StaticProperty],
                ),
                row(
                    D::Property,
                    vec![I::Variable, I::InstanceProperty, I::StaticProperty],
                ),
            ],
        }
    }
}

/// Outcome of hydrating one source tree.
#[derive(Debug, Default)]
pub struct JoinReport {
    /// Declarations with a USR, in input order.
    pub hydrated: Vec<HydratedDeclaration>,
    /// Declarations no candidate matched. Kept for the symbol dump but
    /// excluded from the graph.
    pub unmatched: Vec<Declaration>,
    /// Declarations that resolved to a USR already claimed by an earlier
    /// declaration (e.g. a type and its extension). First one wins.
    pub collisions: Vec<(Usr, Declaration)>,
}

impl JoinReport {
    pub fn hydrated_count(&self) -> usize {
        self.hydrated.len()
    }
}

/// Assigns each declaration its canonical USR so later stages speak one
/// identifier language.
pub struct SymbolJoiner<'a> {
    index: &'a dyn SymbolIndex,
    bridge: &'a KindBridge,
    debug_scoring: bool,
}

type LineLookup = HashMap<u32, Vec<ReferenceOccurrence>>;

impl<'a> SymbolJoiner<'a> {
    pub fn new(index: &'a dyn SymbolIndex, bridge: &'a KindBridge) -> Self {
        Self {
            index,
            bridge,
            debug_scoring: false,
        }
    }

    /// Log every candidate's score. Driven by `--debug-usr`.
    pub fn with_debug_scoring(mut self, enabled: bool) -> Self {
        self.debug_scoring = enabled;
        self
    }

    /// Hydrate declarations in input order.
    ///
    /// Callers sort declarations by (file, line, column) beforehand so the
    /// first-wins collision rule and candidate tie-breaks are reproducible
    /// across runs.
    pub fn hydrate(&self, declarations: Vec<Declaration>) -> Result<JoinReport> {
        let lookup = self.canonical_definitions(&declarations)?;

        let mut report = JoinReport::default();
        let mut claimed: HashMap<Usr, String> = HashMap::new();

        for decl in declarations {
            let by_line = lookup.get(&decl.location.file);
            match by_line.and_then(|lines| self.best_candidate(&decl, lines)) {
                Some(usr) => {
                    if let Some(winner) = claimed.get(&usr) {
                        debug!(
                            "usr collision: {} already claimed by '{}', dropping '{}' ({})",
                            usr, winner, decl.name, decl.location
                        );
                        report.collisions.push((usr, decl));
                        continue;
                    }
                    claimed.insert(usr.clone(), decl.name.clone());
                    report.hydrated.push(HydratedDeclaration { decl, usr });
                }
                None => {
                    info!(
                        "no canonical symbol for '{}' [{}] at {}",
                        decl.name, decl.kind, decl.location
                    );
                    report.unmatched.push(decl);
                }
            }
        }

        info!(
            "joined {} declarations ({} unmatched, {} collisions)",
            report.hydrated.len(),
            report.unmatched.len(),
            report.collisions.len()
        );
        Ok(report)
    }

    /// Canonical-definition occurrences per file, keyed by line.
    fn canonical_definitions(
        &self,
        declarations: &[Declaration],
    ) -> Result<HashMap<PathBuf, LineLookup>> {
        let mut lookup: HashMap<PathBuf, LineLookup> = HashMap::new();
        for decl in declarations {
            if lookup.contains_key(&decl.location.file) {
                continue;
            }
            let mut by_line: LineLookup = HashMap::new();
            for occurrence in self.index.occurrences_in_file(&decl.location.file)? {
                if occurrence.is_canonical_definition() {
                    by_line
                        .entry(occurrence.location.line)
                        .or_default()
                        .push(occurrence);
                }
            }
            lookup.insert(decl.location.file.clone(), by_line);
        }
        Ok(lookup)
    }

    /// Exact-line pool first; the fuzzy window only when the exact line has
    /// no kind-compatible candidate at all.
    fn best_candidate(&self, decl: &Declaration, by_line: &LineLookup) -> Option<Usr> {
        let exact: &[ReferenceOccurrence] = by_line
            .get(&decl.location.line)
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        if let Some(scored) = self.pick(decl, exact.iter()) {
            return self.accept(decl, scored);
        }

        let lo = decl.location.line.saturating_sub(FUZZY_WINDOW);
        let hi = decl.location.end_line.saturating_add(FUZZY_WINDOW);
        let fuzzy = (lo..=hi).flat_map(|line| by_line.get(&line).into_iter().flatten());
        let scored = self.pick(decl, fuzzy)?;
        trace!(
            "fuzzy window [{}, {}] matched '{}' -> {}",
            lo,
            hi,
            decl.name,
            scored.1
        );
        self.accept(decl, scored)
    }

    fn accept(&self, decl: &Declaration, (score, usr): (i64, Usr)) -> Option<Usr> {
        if score > 0 {
            Some(usr)
        } else {
            debug!(
                "best candidate for '{}' scored {} (<= 0), leaving unmatched",
                decl.name, score
            );
            None
        }
    }

    /// Best kind-compatible candidate; `None` when no candidate passes the
    /// kind gate. Ties keep the earlier candidate (stable iteration order).
    fn pick<'o>(
        &self,
        decl: &Declaration,
        candidates: impl Iterator<Item = &'o ReferenceOccurrence>,
    ) -> Option<(i64, Usr)> {
        let mut best: Option<(i64, &ReferenceOccurrence)> = None;

        for candidate in candidates {
            if !self.bridge.compatible(decl.kind, candidate.kind) {
                if self.debug_scoring {
                    debug!(
                        "  candidate {} [{}] discarded: kind incompatible with {}",
                        candidate.usr,
                        candidate.kind.as_str(),
                        decl.kind
                    );
                }
                continue;
            }

            let mut score = KIND_SCORE;
            if decl.base_name() == base_of_index_name(&candidate.name) {
                score += NAME_SCORE;
            }
            score -= candidate.usr.len() as i64;

            if self.debug_scoring {
                debug!(
                    "  candidate {} [{}] '{}' scored {} for '{}'",
                    candidate.usr,
                    candidate.kind.as_str(),
                    candidate.name,
                    score,
                    decl.name
                );
            }

            if best.map_or(true, |(best_score, _)| score > best_score) {
                best = Some((score, candidate));
            }
        }

        best.map(|(score, candidate)| (score, candidate.usr.clone()))
    }
}

/// The index spells function names with a parameter list, e.g.
/// `greet(name:)`; the comparable base name is the prefix before `(`.
fn base_of_index_name(name: &str) -> &str {
    name.split('(').next().unwrap_or(name)
}
