//! Entry-point heuristics, evaluated at parse time.
//!
//! A declaration can be reachable through framework machinery the reference
//! graph never sees: lifecycle callbacks, representable protocols, test
//! runners, serialization. Each heuristic contributes a reason; reasons are
//! ORed together. The name sets driving them live in [`Config`] as data.

use std::path::Path;

use super::inventory::{strip_generics, TypeScope};
use crate::config::Config;
use crate::graph::{AccessLevel, DeclarationKind, EntryPointReason};

pub struct EntryPointPolicy<'a> {
    config: &'a Config,
    framework_roots: Vec<&'a str>,
}

impl<'a> EntryPointPolicy<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            framework_roots: config.effective_framework_roots(),
            config,
        }
    }

    pub fn type_reasons(
        &self,
        access: AccessLevel,
        conformances: &[String],
        attributes: &[String],
    ) -> Vec<EntryPointReason> {
        let mut reasons = Vec::new();

        if conformances
            .iter()
            .any(|c| self.framework_roots.contains(&base_type_name(c)))
        {
            reasons.push(EntryPointReason::FrameworkRoot);
        }
        if has_main_attribute(attributes) {
            reasons.push(EntryPointReason::MainAttribute);
        }
        if access.is_public() {
            reasons.push(EntryPointReason::PublicApi);
        }

        reasons
    }

    #[allow(clippy::too_many_arguments)]
    pub fn function_reasons(
        &self,
        name: &str,
        access: AccessLevel,
        is_override: bool,
        attributes: &[String],
        enclosing: Option<&TypeScope>,
        file: &Path,
    ) -> Vec<EntryPointReason> {
        let mut reasons = Vec::new();

        if is_override {
            reasons.push(EntryPointReason::Override);
        }
        if has_main_attribute(attributes) {
            reasons.push(EntryPointReason::MainAttribute);
        }
        if enclosing.is_some_and(|s| s.kind == DeclarationKind::Class) && !access.is_private() {
            reasons.push(EntryPointReason::ExposedClassMember);
        }
        if self.config.lifecycle_methods.iter().any(|m| m == name) {
            reasons.push(EntryPointReason::LifecycleMethod);
        }
        if self.config.representable_methods.iter().any(|m| m == name) {
            reasons.push(EntryPointReason::RepresentableMethod);
        }
        if name == "run"
            && enclosing.is_some_and(|s| self.conforms_to_any(s, &self.config.command_protocols))
        {
            reasons.push(EntryPointReason::CommandRun);
        }
        if name.starts_with("test") && path_mentions_test(file) {
            reasons.push(EntryPointReason::TestMethod);
        }
        if access.is_public() {
            reasons.push(EntryPointReason::PublicApi);
        }

        reasons
    }

    pub fn initializer_reasons(
        &self,
        access: AccessLevel,
        enclosing: Option<&TypeScope>,
    ) -> Vec<EntryPointReason> {
        let mut reasons = Vec::new();

        if access.is_public() {
            reasons.push(EntryPointReason::PublicInitializer);
            reasons.push(EntryPointReason::PublicApi);
        }
        if enclosing.is_some_and(|s| s.has_persistence_attribute) {
            reasons.push(EntryPointReason::PersistenceInitializer);
        }
        if enclosing.is_some_and(|s| s.kind == DeclarationKind::Class) && !access.is_private() {
            reasons.push(EntryPointReason::ExposedClassMember);
        }

        reasons
    }

    pub fn property_reasons(
        &self,
        name: &str,
        access: AccessLevel,
        enclosing: Option<&TypeScope>,
    ) -> Vec<EntryPointReason> {
        let mut reasons = Vec::new();

        if name == "body"
            && enclosing.is_some_and(|s| self.conforms_to_any(s, &self.config.view_protocols))
        {
            reasons.push(EntryPointReason::ViewBody);
        }
        if access.is_public() {
            reasons.push(EntryPointReason::PublicApi);
        }

        reasons
    }

    pub fn has_persistence_attribute(&self, attributes: &[String]) -> bool {
        attributes.iter().any(|attr| {
            let name = attribute_name(attr);
            self.config.persistence_attributes.iter().any(|p| p == name)
        })
    }

    fn conforms_to_any(&self, scope: &TypeScope, protocols: &[String]) -> bool {
        scope
            .conformances
            .iter()
            .any(|c| protocols.iter().any(|p| p == base_type_name(c)))
    }
}

/// `SwiftUI.View` -> `View`; `Collection<Int>` -> `Collection`.
fn base_type_name(name: &str) -> &str {
    let stripped = strip_generics(name);
    stripped.rsplit('.').next().unwrap_or(stripped)
}

/// `@main(...)` -> `main`.
fn attribute_name(attribute: &str) -> &str {
    let trimmed = attribute.trim_start_matches('@');
    trimmed
        .split(|c: char| c == '(' || c.is_whitespace())
        .next()
        .unwrap_or(trimmed)
}

fn has_main_attribute(attributes: &[String]) -> bool {
    attributes.iter().any(|attr| {
        matches!(
            attribute_name(attr),
            "main" | "UIApplicationMain" | "NSApplicationMain"
        )
    })
}

fn path_mentions_test(file: &Path) -> bool {
    file.to_string_lossy().to_lowercase().contains("test")
}
