//! Analysis configuration.
//!
//! Loaded from `.swiftsweep.json` at the project root (or `--config`), then
//! overridden by CLI flags. Every name set driving the entry-point
//! heuristics lives here as data so projects can extend them without code
//! changes, and the joiner's kind bridge is exposed the same way.

use std::path::Path;

use miette::{IntoDiagnostic, Result, WrapErr};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::discovery::DEFAULT_EXCLUDES;
use crate::graph::{KindBridge, DEFAULT_ASCENT_BUDGET};

/// Default config file name searched at the project root.
pub const CONFIG_FILE_NAME: &str = ".swiftsweep.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct Config {
    /// Directory names skipped during file discovery.
    pub exclude: Vec<String>,

    /// Framework base types whose subtypes are assumed reachable.
    pub framework_roots: Vec<String>,

    /// Serialization conformances treated as framework roots when
    /// `codable_entry_points` is on.
    pub codable_roots: Vec<String>,

    /// Treat codable conformance as an entry point.
    pub codable_entry_points: bool,

    /// Method names invoked by framework lifecycle machinery.
    pub lifecycle_methods: Vec<String>,

    /// Methods required by view-representable protocols.
    pub representable_methods: Vec<String>,

    /// Protocols marking a type as a CLI command (`run` becomes an entry
    /// point inside them).
    pub command_protocols: Vec<String>,

    /// Protocols whose `body` member the framework evaluates.
    pub view_protocols: Vec<String>,

    /// Attribute names marking persisted model types; their initializers
    /// are assumed reachable.
    pub persistence_attributes: Vec<String>,

    /// Restrict unused-property pruning to private/fileprivate properties.
    pub respect_public_api: bool,

    /// Hop cap for the builder's symbolic ascent.
    pub ascent_budget: usize,

    /// Kind-compatibility table used by the joiner.
    pub kind_bridge: KindBridge,
}

impl Default for Config {
    fn default() -> Self {
        let strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        Self {
            exclude: strings(DEFAULT_EXCLUDES),
            framework_roots: strings(&[
                "UIView",
                "UIViewController",
                "UIApplicationDelegate",
                "NSView",
                "NSViewController",
                "View",
                "App",
                "Scene",
                "Widget",
                "ParsableCommand",
                "AsyncParsableCommand",
                "XCTestCase",
            ]),
            codable_roots: strings(&["Codable", "Encodable", "Decodable"]),
            codable_entry_points: true,
            lifecycle_methods: strings(&[
                "viewDidLoad",
                "viewWillAppear",
                "viewDidAppear",
                "viewWillDisappear",
                "viewDidDisappear",
                "viewDidLayoutSubviews",
                "applicationDidFinishLaunching",
                "applicationWillTerminate",
                "sceneDidBecomeActive",
                "sceneWillResignActive",
            ]),
            representable_methods: strings(&[
                "makeUIView",
                "updateUIView",
                "makeNSView",
                "updateNSView",
                "makeUIViewController",
                "updateUIViewController",
                "makeCoordinator",
                "dismantleUIView",
            ]),
            command_protocols: strings(&["ParsableCommand", "AsyncParsableCommand"]),
            view_protocols: strings(&["View", "App", "Scene", "Widget"]),
            persistence_attributes: strings(&["Model", "NSManaged", "Persistent"]),
            respect_public_api: false,
            ascent_budget: DEFAULT_ASCENT_BUDGET,
            kind_bridge: KindBridge::default(),
        }
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("failed to read config {}", path.display()))?;
        serde_json::from_str(&raw)
            .into_diagnostic()
            .wrap_err_with(|| format!("malformed config {}", path.display()))
    }

    /// Load `.swiftsweep.json` from the project root when present, else the
    /// built-in defaults.
    pub fn from_default_locations(project_root: &Path) -> Result<Self> {
        let candidate = project_root.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            debug!("loading config from {}", candidate.display());
            return Self::from_file(&candidate);
        }
        Ok(Self::default())
    }

    /// Framework roots effective for entry-point detection, with codable
    /// conformances folded in when enabled.
    pub fn effective_framework_roots(&self) -> Vec<&str> {
        let mut roots: Vec<&str> = self.framework_roots.iter().map(String::as_str).collect();
        if self.codable_entry_points {
            roots.extend(self.codable_roots.iter().map(String::as_str));
        }
        roots
    }
}
