/*!
 * Utility functions for bundlefs
 */

use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use crate::exclusion::ExclusionSet;

/// Count files the scanner will visit, for progress tracking.
///
/// `output` is the bundle being written; like the scanner, the count leaves
/// it out when it lives inside `dir`.
pub fn count_files(dir: &Path, exclusions: &ExclusionSet, output: &Path) -> u64 {
    let root = fs::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf());
    let output = fs::canonicalize(output).ok();

    WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_entry(|e| !exclusions.is_excluded(&e.file_name().to_string_lossy()))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() || e.path().is_file())
        .filter(|e| output.as_deref() != Some(e.path()))
        .count() as u64
}

/// Join a `/` separated relative path and a child name
pub fn join_relative(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", parent, name)
    }
}

/// Format a human-readable file size
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}

/// Patterns added by `--default-ignores`
pub const DEFAULT_IGNORE: &[&str] = &[
    // Version control
    ".git",
    ".svn",
    ".hg",
    // OS files
    ".DS_Store",
    "Thumbs.db",
    // Dependencies
    "node_modules",
    "bower_components",
    ".venv",
    "venv",
    // Build output
    "target",
    "dist",
    "build",
    "__pycache__",
    "*.pyc",
    "*.class",
    "*.o",
    // Editors and caches
    ".idea",
    ".vscode",
    "*.swp",
    ".cache",
    ".pytest_cache",
    ".mypy_cache",
];
