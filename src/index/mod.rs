//! Semantic view of the program: the pre-built compiler index.
//!
//! The index is authoritative for canonical symbol identity (USRs) and for
//! cross-file reference edges. Everything here is read-only: occurrences are
//! produced on demand and never mutated.
//!
//! Two implementations of [`SymbolIndex`] ship with the crate:
//! - [`IndexStore`] reads the on-disk record format exported next to a build
//! - [`MemoryIndex`] holds occurrences in memory, for tests and embedders

mod memory;
mod store;

pub use memory::MemoryIndex;
pub use store::IndexStore;

use std::fmt;
use std::path::{Path, PathBuf};

use miette::Result;
use serde::{Deserialize, Serialize};

/// Canonical symbol identifier assigned by the compiler index.
///
/// Equal across files and build units for the same entity. Treated as an
/// opaque byte string: compared, hashed, displayed, never parsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Usr(String);

impl Usr {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Byte length of the raw identifier. Shorter USRs are considered more
    /// canonical by the joiner's tie-break.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Usr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Usr {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

impl From<String> for Usr {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

/// Symbol kind as recorded by the index.
///
/// This is the index's vocabulary, not the syntactic one; the two are bridged
/// by the joiner's kind table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IndexSymbolKind {
    Struct,
    Class,
    Enum,
    Protocol,
    Extension,
    Function,
    InstanceMethod,
    StaticMethod,
    ClassMethod,
    Constructor,
    Variable,
    InstanceProperty,
    StaticProperty,
    Parameter,
    Unknown,
}

impl IndexSymbolKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IndexSymbolKind::Struct => "struct",
            IndexSymbolKind::Class => "class",
            IndexSymbolKind::Enum => "enum",
            IndexSymbolKind::Protocol => "protocol",
            IndexSymbolKind::Extension => "extension",
            IndexSymbolKind::Function => "function",
            IndexSymbolKind::InstanceMethod => "instance-method",
            IndexSymbolKind::StaticMethod => "static-method",
            IndexSymbolKind::ClassMethod => "class-method",
            IndexSymbolKind::Constructor => "constructor",
            IndexSymbolKind::Variable => "variable",
            IndexSymbolKind::InstanceProperty => "instance-property",
            IndexSymbolKind::StaticProperty => "static-property",
            IndexSymbolKind::Parameter => "parameter",
            IndexSymbolKind::Unknown => "unknown",
        }
    }
}

/// Roles attached to an occurrence or to a relation within one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SymbolRole {
    /// The occurrence defines the symbol.
    Definition,
    /// The occurrence is the symbol's authoritative definition site.
    Canonical,
    /// The occurrence uses the symbol.
    Reference,
    /// Relation: the related symbol calls this occurrence's symbol here.
    CalledBy,
    /// Relation: the related symbol lexically contains this occurrence.
    ContainedBy,
    /// Relation: this occurrence is an accessor of the related symbol.
    AccessorOf,
    /// Relation: this occurrence overrides the related symbol.
    OverrideOf,
}

/// Where the index saw an occurrence.
///
/// Line and column are 1-based; the column is a UTF-8 byte offset within its
/// line, which is what the syntax inventory produces as well.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexLocation {
    pub file: PathBuf,
    pub line: u32,
    pub column: u32,
}

impl fmt::Display for IndexLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file.display(), self.line, self.column)
    }
}

/// A (role set, related USR) pair attached to an occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolRelation {
    pub roles: Vec<SymbolRole>,
    pub usr: Usr,
}

impl SymbolRelation {
    pub fn new(roles: Vec<SymbolRole>, usr: impl Into<Usr>) -> Self {
        Self {
            roles,
            usr: usr.into(),
        }
    }

    pub fn has_role(&self, role: SymbolRole) -> bool {
        self.roles.contains(&role)
    }
}

/// A single occurrence of a symbol in the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceOccurrence {
    /// The symbol this occurrence is of.
    pub usr: Usr,
    /// Symbol name as the index spells it. May carry a parameter list
    /// suffix, e.g. `greet(name:)`.
    pub name: String,
    pub kind: IndexSymbolKind,
    pub location: IndexLocation,
    pub roles: Vec<SymbolRole>,
    pub relations: Vec<SymbolRelation>,
}

impl ReferenceOccurrence {
    pub fn has_role(&self, role: SymbolRole) -> bool {
        self.roles.contains(&role)
    }

    /// Whether this occurrence is the symbol's authoritative definition site.
    pub fn is_canonical_definition(&self) -> bool {
        self.has_role(SymbolRole::Definition) && self.has_role(SymbolRole::Canonical)
    }

    /// First relation carrying the given role, in recorded order.
    pub fn relation_with_role(&self, role: SymbolRole) -> Option<&SymbolRelation> {
        self.relations.iter().find(|r| r.has_role(role))
    }
}

/// Read access to a pre-built compiler index.
///
/// A `role_filter` matches occurrences carrying *any* of the given roles; an
/// empty filter matches everything.
pub trait SymbolIndex {
    /// All occurrences recorded for a file, in recorded order.
    fn occurrences_in_file(&self, path: &Path) -> Result<Vec<ReferenceOccurrence>>;

    /// All occurrences of a symbol across the whole index.
    fn occurrences_of_usr(
        &self,
        usr: &Usr,
        role_filter: &[SymbolRole],
    ) -> Result<Vec<ReferenceOccurrence>>;
}

pub(crate) fn matches_role_filter(occ: &ReferenceOccurrence, filter: &[SymbolRole]) -> bool {
    filter.is_empty() || filter.iter().any(|r| occ.has_role(*r))
}
