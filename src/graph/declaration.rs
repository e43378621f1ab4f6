//! The syntactic view's data model: declarations as the parser saw them.
//!
//! Everything here is created in one pass per source tree and immutable
//! afterwards; the analysis owns it until reporting completes.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::index::Usr;

/// A region of source text.
///
/// Lines and columns are 1-based. Columns are UTF-8 byte offsets within their
/// line (not code-point columns), which is what the compiler index records.
/// `end_line` bounds the entire declaration body; one-line declarations have
/// `end_line == line`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub file: PathBuf,
    pub line: u32,
    pub column: u32,
    pub end_line: u32,
    pub end_column: u32,
}

impl SourceLocation {
    pub fn contains_line(&self, line: u32) -> bool {
        self.line <= line && line <= self.end_line
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file.display(), self.line, self.column)
    }
}

/// Stable local identifier for a declaration within one run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeclarationId(String);

impl DeclarationId {
    pub fn new(file: &std::path::Path, ordinal: u32) -> Self {
        Self(format!("{}#{}", file.display(), ordinal))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeclarationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Syntactic declaration kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclarationKind {
    Struct,
    Class,
    Enum,
    Protocol,
    /// An `extension` block. Hydrates to the extended type's USR, so a type
    /// and its extensions collapse into one graph node.
    Extension,
    Function,
    Initializer,
    Variable,
    Property,
}

impl DeclarationKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            DeclarationKind::Struct => "struct",
            DeclarationKind::Class => "class",
            DeclarationKind::Enum => "enum",
            DeclarationKind::Protocol => "protocol",
            DeclarationKind::Extension => "extension",
            DeclarationKind::Function => "function",
            DeclarationKind::Initializer => "initializer",
            DeclarationKind::Variable => "variable",
            DeclarationKind::Property => "property",
        }
    }

    /// Type-introducing kinds (everything a member can be nested in).
    pub fn is_type(&self) -> bool {
        matches!(
            self,
            DeclarationKind::Struct
                | DeclarationKind::Class
                | DeclarationKind::Enum
                | DeclarationKind::Protocol
                | DeclarationKind::Extension
        )
    }

    /// Concrete nominal types: the targets of unused-property pruning.
    pub fn is_concrete_type(&self) -> bool {
        matches!(
            self,
            DeclarationKind::Struct | DeclarationKind::Class | DeclarationKind::Enum
        )
    }
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Swift access level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    Private,
    FilePrivate,
    Internal,
    Public,
    Open,
}

impl AccessLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::Private => "private",
            AccessLevel::FilePrivate => "fileprivate",
            AccessLevel::Internal => "internal",
            AccessLevel::Public => "public",
            AccessLevel::Open => "open",
        }
    }

    /// `private` or `fileprivate`.
    pub fn is_private(&self) -> bool {
        matches!(self, AccessLevel::Private | AccessLevel::FilePrivate)
    }

    /// `public` or `open`.
    pub fn is_public(&self) -> bool {
        matches!(self, AccessLevel::Public | AccessLevel::Open)
    }

    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "private" => Some(AccessLevel::Private),
            "fileprivate" => Some(AccessLevel::FilePrivate),
            "internal" => Some(AccessLevel::Internal),
            "public" => Some(AccessLevel::Public),
            "open" => Some(AccessLevel::Open),
            _ => None,
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a declaration is assumed reachable from outside the analyzed code.
///
/// Reasons are ORed together; any single reason makes the declaration an
/// entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntryPointReason {
    /// Type inherits from a configured framework root.
    FrameworkRoot,
    /// Carries `@main` (or a platform equivalent).
    MainAttribute,
    /// Overrides a supertype method.
    Override,
    /// Non-private method or initializer on a class.
    ExposedClassMember,
    /// Initializer declared public.
    PublicInitializer,
    /// Initializer inside a type marked with a persistence macro.
    PersistenceInitializer,
    /// Function name matches the configured lifecycle set.
    LifecycleMethod,
    /// Function name matches the representable-protocol set.
    RepresentableMethod,
    /// `run` inside a CLI-command-conforming type.
    CommandRun,
    /// Test-prefixed function in a test-path file.
    TestMethod,
    /// `body` inside a UI view/app-conforming type.
    ViewBody,
    /// Public or open modifier anywhere.
    PublicApi,
}

impl EntryPointReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryPointReason::FrameworkRoot => "framework-root",
            EntryPointReason::MainAttribute => "main-attribute",
            EntryPointReason::Override => "override",
            EntryPointReason::ExposedClassMember => "exposed-class-member",
            EntryPointReason::PublicInitializer => "public-initializer",
            EntryPointReason::PersistenceInitializer => "persistence-initializer",
            EntryPointReason::LifecycleMethod => "lifecycle-method",
            EntryPointReason::RepresentableMethod => "representable-method",
            EntryPointReason::CommandRun => "command-run",
            EntryPointReason::TestMethod => "test-method",
            EntryPointReason::ViewBody => "view-body",
            EntryPointReason::PublicApi => "public-api",
        }
    }
}

impl fmt::Display for EntryPointReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A declaration as produced by the syntax inventory. Immutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    pub id: DeclarationId,
    /// Dot-joined path of enclosing type names ending in the base name,
    /// e.g. `Outer.Inner.foo`. Extensions contribute the extended type's
    /// name.
    pub name: String,
    pub kind: DeclarationKind,
    pub location: SourceLocation,
    pub access: AccessLevel,
    /// Declared type name for stored properties (best effort; used only to
    /// locate the type's declaration during pruning).
    pub type_name: Option<String>,
    pub entry_point_reasons: Vec<EntryPointReason>,
}

impl Declaration {
    pub fn is_entry_point(&self) -> bool {
        !self.entry_point_reasons.is_empty()
    }

    /// Last dot-segment of the qualified name.
    pub fn base_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    /// Qualified name of the immediately enclosing type, if any.
    pub fn parent_path(&self) -> Option<&str> {
        self.name.rsplit_once('.').map(|(parent, _)| parent)
    }
}

/// A declaration joined with its canonical USR. Immutable after the join.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HydratedDeclaration {
    pub decl: Declaration,
    pub usr: Usr,
}

impl HydratedDeclaration {
    pub fn name(&self) -> &str {
        &self.decl.name
    }

    pub fn kind(&self) -> DeclarationKind {
        self.decl.kind
    }

    pub fn location(&self) -> &SourceLocation {
        &self.decl.location
    }

    pub fn is_entry_point(&self) -> bool {
        self.decl.is_entry_point()
    }
}
