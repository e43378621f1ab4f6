//! Swift declaration inventory over tree-sitter.
//!
//! A single walk over the syntax tree with an explicit stack of enclosing
//! type scopes. Each node kind handles its own declaration logic directly;
//! the scope stack produces the dot-joined qualified names. Extensions push
//! the extended type's name, so members declared in an extension carry the
//! extended type's path.
//!
//! Lines and columns are 1-based; columns are UTF-8 byte offsets within the
//! line (tree-sitter's native column unit), which aligns with the index.

use std::fs;
use std::path::Path;

use miette::{miette, IntoDiagnostic, Result, WrapErr};
use tracing::trace;
use tree_sitter::{Node, Parser};

use super::entry_points::EntryPointPolicy;
use crate::config::Config;
use crate::discovery::normalize_path;
use crate::graph::{
    AccessLevel, Declaration, DeclarationId, DeclarationKind, SourceLocation,
};

/// Enclosing type context carried on the scope stack.
#[derive(Debug, Clone)]
pub(crate) struct TypeScope {
    pub name: String,
    pub kind: DeclarationKind,
    /// Inherited/conformed type names as written, generics stripped.
    pub conformances: Vec<String>,
    pub has_persistence_attribute: bool,
}

/// Parses one Swift file at a time. Not thread-safe; parallel callers create
/// one parser per worker.
pub struct SwiftParser {
    parser: Parser,
}

impl SwiftParser {
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_swift::LANGUAGE.into())
            .into_diagnostic()
            .wrap_err("failed to load the Swift grammar")?;
        Ok(Self { parser })
    }

    pub fn parse_file(&mut self, path: &Path, config: &Config) -> Result<Vec<Declaration>> {
        let source = fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("failed to read {}", path.display()))?;
        self.parse_source(&source, &normalize_path(path), config)
    }

    /// Parse source text already associated with a normalized path.
    pub fn parse_source(
        &mut self,
        source: &str,
        path: &Path,
        config: &Config,
    ) -> Result<Vec<Declaration>> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| miette!("parser produced no tree for {}", path.display()))?;

        let mut collector = Collector {
            source: source.as_bytes(),
            file: path,
            policy: EntryPointPolicy::new(config),
            scopes: Vec::new(),
            function_depth: 0,
            next_ordinal: 0,
            declarations: Vec::new(),
        };
        collector.visit(tree.root_node());
        trace!(
            "{}: {} declarations",
            path.display(),
            collector.declarations.len()
        );
        Ok(collector.declarations)
    }
}

struct Collector<'s> {
    source: &'s [u8],
    file: &'s Path,
    policy: EntryPointPolicy<'s>,
    scopes: Vec<TypeScope>,
    /// Depth of function/initializer bodies; local bindings inside them are
    /// not declarations.
    function_depth: u32,
    next_ordinal: u32,
    declarations: Vec<Declaration>,
}

impl<'s> Collector<'s> {
    fn visit(&mut self, node: Node<'_>) {
        match node.kind() {
            "class_declaration" | "protocol_declaration" => self.visit_type(node),
            "function_declaration" => self.visit_function(node),
            "init_declaration" => self.visit_initializer(node),
            "property_declaration" => self.visit_property(node),
            _ => self.visit_children(node),
        }
    }

    fn visit_children(&mut self, node: Node<'_>) {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.visit(child);
        }
    }

    /// Classes, structs, enums, actors, extensions, and protocols. The
    /// grammar reuses one node kind for most of them; the introducing
    /// keyword token tells them apart.
    fn visit_type(&mut self, node: Node<'_>) {
        let kind = if node.kind() == "protocol_declaration" {
            DeclarationKind::Protocol
        } else {
            self.type_keyword_kind(node)
        };

        let Some(raw_name) = self.type_name(node) else {
            self.visit_children(node);
            return;
        };
        let name = strip_generics(&raw_name).to_string();

        let access = self.access_level(node);
        let attributes = self.attributes(node);
        let conformances = self.conformances(node);
        let qualified = self.qualify(&name);

        let reasons = self
            .policy
            .type_reasons(access, &conformances, &attributes);

        let id = self.next_id();
        self.emit(Declaration {
            id,
            name: qualified,
            kind,
            location: self.location(node),
            access,
            type_name: None,
            entry_point_reasons: reasons,
        });

        let has_persistence_attribute = self.policy.has_persistence_attribute(&attributes);
        self.scopes.push(TypeScope {
            name,
            kind,
            conformances,
            has_persistence_attribute,
        });
        self.visit_children(node);
        self.scopes.pop();
    }

    fn visit_function(&mut self, node: Node<'_>) {
        let Some(name) = self.field_text(node, "name") else {
            self.visit_children(node);
            return;
        };

        let access = self.access_level(node);
        let attributes = self.attributes(node);
        let is_override = self.has_modifier(node, "override");

        let reasons = self.policy.function_reasons(
            &name,
            access,
            is_override,
            &attributes,
            self.scopes.last(),
            self.file,
        );

        let id = self.next_id();
        self.emit(Declaration {
            id,
            name: self.qualify(&name),
            kind: DeclarationKind::Function,
            location: self.location(node),
            access,
            type_name: None,
            entry_point_reasons: reasons,
        });

        self.function_depth += 1;
        self.visit_children(node);
        self.function_depth -= 1;
    }

    fn visit_initializer(&mut self, node: Node<'_>) {
        let access = self.access_level(node);
        let reasons = self
            .policy
            .initializer_reasons(access, self.scopes.last());

        let id = self.next_id();
        self.emit(Declaration {
            id,
            name: self.qualify("init"),
            kind: DeclarationKind::Initializer,
            location: self.location(node),
            access,
            type_name: None,
            entry_point_reasons: reasons,
        });

        self.function_depth += 1;
        self.visit_children(node);
        self.function_depth -= 1;
    }

    fn visit_property(&mut self, node: Node<'_>) {
        // Bindings inside function bodies are locals, not declarations; the
        // walk still descends for nested functions and closures.
        if self.function_depth > 0 {
            self.visit_children(node);
            return;
        }

        let Some(name) = self.binding_name(node) else {
            self.visit_children(node);
            return;
        };

        let kind = if self.scopes.is_empty() {
            DeclarationKind::Variable
        } else {
            DeclarationKind::Property
        };
        let access = self.access_level(node);
        let type_name = self.annotated_type(node);

        let reasons = self
            .policy
            .property_reasons(&name, access, self.scopes.last());

        let id = self.next_id();
        self.emit(Declaration {
            id,
            name: self.qualify(&name),
            kind,
            location: self.location(node),
            access,
            type_name,
            entry_point_reasons: reasons,
        });

        self.visit_children(node);
    }

    // --- node helpers -----------------------------------------------------

    fn text(&self, node: Node<'_>) -> &str {
        node.utf8_text(self.source).unwrap_or("")
    }

    fn field_text(&self, node: Node<'_>, field: &str) -> Option<String> {
        node.child_by_field_name(field)
            .map(|child| self.text(child).to_string())
    }

    fn type_keyword_kind(&self, node: Node<'_>) -> DeclarationKind {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "struct" => return DeclarationKind::Struct,
                "class" | "actor" => return DeclarationKind::Class,
                "enum" => return DeclarationKind::Enum,
                "extension" => return DeclarationKind::Extension,
                _ => {}
            }
        }
        DeclarationKind::Class
    }

    fn type_name(&self, node: Node<'_>) -> Option<String> {
        if let Some(name) = self.field_text(node, "name") {
            return Some(name);
        }
        // Extensions name a (possibly dotted) existing type rather than
        // introducing an identifier.
        let mut cursor = node.walk();
        let found = node
            .children(&mut cursor)
            .find(|child| matches!(child.kind(), "user_type" | "type_identifier"))
            .map(|child| self.text(child).to_string());
        found
    }

    fn access_level(&self, node: Node<'_>) -> AccessLevel {
        self.modifier_texts(node)
            .iter()
            .find_map(|text| AccessLevel::parse(text))
            .unwrap_or(AccessLevel::Internal)
    }

    fn has_modifier(&self, node: Node<'_>, keyword: &str) -> bool {
        self.modifier_texts(node).iter().any(|text| text == keyword)
    }

    /// Texts of every non-attribute leaf under the declaration's
    /// `modifiers` child (`public`, `override`, `static`, ...).
    fn modifier_texts(&self, node: Node<'_>) -> Vec<String> {
        let mut texts = Vec::new();
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.kind() != "modifiers" {
                continue;
            }
            let mut inner = child.walk();
            for modifier in child.children(&mut inner) {
                if modifier.kind() == "attribute" {
                    continue;
                }
                texts.push(self.text(modifier).trim().to_string());
            }
        }
        texts
    }

    /// Attribute texts (`@main`, `@Model`, ...) attached to the declaration.
    fn attributes(&self, node: Node<'_>) -> Vec<String> {
        let mut attributes = Vec::new();
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.kind() == "attribute" {
                attributes.push(self.text(child).to_string());
            }
            if child.kind() == "modifiers" {
                let mut inner = child.walk();
                for modifier in child.children(&mut inner) {
                    if modifier.kind() == "attribute" {
                        attributes.push(self.text(modifier).to_string());
                    }
                }
            }
        }
        attributes
    }

    fn conformances(&self, node: Node<'_>) -> Vec<String> {
        let mut conformances = Vec::new();
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.kind() == "inheritance_specifier" {
                conformances.push(strip_generics(self.text(child).trim()).to_string());
            }
        }
        conformances
    }

    /// First bound identifier of a property declaration. Multi-binding
    /// declarations contribute their first name; the rest share the range
    /// and are rare enough not to matter for reachability.
    fn binding_name(&self, node: Node<'_>) -> Option<String> {
        fn first_identifier<'t>(node: Node<'t>) -> Option<Node<'t>> {
            if node.kind() == "simple_identifier" {
                return Some(node);
            }
            // Stop at the initializer expression: identifiers there are
            // references, not binding names.
            if matches!(node.kind(), "=" | "computed_property") {
                return None;
            }
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                if matches!(child.kind(), "=" | "computed_property") {
                    break;
                }
                if let Some(found) = first_identifier(child) {
                    return Some(found);
                }
            }
            None
        }

        first_identifier(node).map(|n| self.text(n).to_string())
    }

    /// Declared type from the `: Type` annotation, as written.
    fn annotated_type(&self, node: Node<'_>) -> Option<String> {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.kind() == "type_annotation" {
                let text = self.text(child).trim_start_matches(':').trim();
                if !text.is_empty() {
                    return Some(text.to_string());
                }
            }
        }
        None
    }

    fn location(&self, node: Node<'_>) -> SourceLocation {
        let start = node.start_position();
        let end = node.end_position();
        SourceLocation {
            file: self.file.to_path_buf(),
            line: start.row as u32 + 1,
            column: start.column as u32 + 1,
            end_line: end.row as u32 + 1,
            end_column: end.column as u32 + 1,
        }
    }

    fn qualify(&self, base: &str) -> String {
        if self.scopes.is_empty() {
            return base.to_string();
        }
        let mut path: Vec<&str> = self.scopes.iter().map(|s| s.name.as_str()).collect();
        path.push(base);
        path.join(".")
    }

    fn next_id(&mut self) -> DeclarationId {
        let id = DeclarationId::new(self.file, self.next_ordinal);
        self.next_ordinal += 1;
        id
    }

    fn emit(&mut self, declaration: Declaration) {
        self.declarations.push(declaration);
    }
}

/// `Array<Element>` compares as `Array`; `SwiftUI.View` as `View`.
pub(crate) fn strip_generics(name: &str) -> &str {
    name.split('<').next().unwrap_or(name).trim()
}
