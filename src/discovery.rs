//! Source file discovery.
//!
//! Walks the project root collecting `.swift` files, skipping excluded
//! directory names and hidden directories. Paths are normalized once here so
//! every later stage compares them by byte equality.

use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};

use miette::{miette, Result};
use tracing::debug;
use walkdir::WalkDir;

use crate::config::Config;

/// Directory names skipped by default during discovery.
pub const DEFAULT_EXCLUDES: &[&str] = &[".build", "Pods", "Carthage", "DerivedData"];

/// Normalize a path: absolute, symlinks resolved where possible.
///
/// Falls back to a lexical cleanup relative to the current directory when the
/// path does not exist on disk (fixtures, index records for generated files).
pub fn normalize_path(path: &Path) -> PathBuf {
    if let Ok(canonical) = fs::canonicalize(path) {
        return canonical;
    }

    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };

    let mut cleaned = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                cleaned.pop();
            }
            other => cleaned.push(other),
        }
    }
    cleaned
}

/// Finds Swift source files under a project root.
pub struct FileFinder {
    excluded_dirs: HashSet<String>,
}

impl FileFinder {
    pub fn new(config: &Config) -> Self {
        Self {
            excluded_dirs: config.exclude.iter().cloned().collect(),
        }
    }

    /// Walk `root` and return every `.swift` file, normalized and sorted.
    pub fn find_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
        if !root.is_dir() {
            return Err(miette!(
                "project path is not a directory: {}",
                root.display()
            ));
        }

        let mut files: Vec<PathBuf> = WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| {
                if entry.depth() == 0 || !entry.file_type().is_dir() {
                    return true;
                }
                let name = entry.file_name().to_string_lossy();
                if name.starts_with('.') || self.excluded_dirs.contains(name.as_ref()) {
                    debug!("skipping directory {}", entry.path().display());
                    return false;
                }
                true
            })
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "swift"))
            .map(|entry| normalize_path(entry.path()))
            .collect();

        files.sort();
        files.dedup();
        Ok(files)
    }
}
