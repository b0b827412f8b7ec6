/*!
 * Directory and file scanning functionality
 */

use std::fs;
use std::path::Path;
use std::sync::Arc;

use indicatif::ProgressBar;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::Config;
use crate::ensure;
use crate::error::{Result, ResultExt};
use crate::exclusion::ExclusionSet;
use crate::types::{DirectoryNode, FileContent, FileNode};
use crate::utils::join_relative;

/// Scanner for directory contents
pub struct Scanner {
    /// Scanner configuration
    config: Config,
    /// Names to skip at every level
    exclusions: ExclusionSet,
    /// Progress bar
    pub progress: Arc<ProgressBar>,
}

impl Scanner {
    /// Create a new scanner
    pub fn new(config: Config, exclusions: ExclusionSet, progress: Arc<ProgressBar>) -> Self {
        Self {
            config,
            exclusions,
            progress,
        }
    }

    /// Scan the root directory and return the directory tree
    pub fn scan(&self) -> Result<DirectoryNode> {
        let root = &self.config.root;
        ensure!(
            root.is_dir(),
            Config,
            "root {} is not a directory",
            root.display()
        );

        let abs_path = fs::canonicalize(root)
            .with_context(|| format!("Failed to resolve root {}", root.display()))?;

        // The bundle being written must not end up inside itself
        let output_file = fs::canonicalize(&self.config.output_file).ok();

        debug!("Scanning {}", abs_path.display());
        Ok(self.scan_directory(
            &abs_path,
            String::new(),
            root_name(root),
            output_file.as_deref(),
        ))
    }

    /// Scan a directory and return its node representation
    fn scan_directory(
        &self,
        abs_path: &Path,
        rel_path: String,
        name: String,
        output_file: Option<&Path>,
    ) -> DirectoryNode {
        let mut node = DirectoryNode {
            name,
            path: rel_path,
            files: Vec::new(),
            directories: Vec::new(),
        };

        let entries = WalkDir::new(abs_path)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
            .sort_by_file_name();

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry in {}: {}", abs_path.display(), e);
                    continue;
                }
            };

            let entry_name = entry.file_name().to_string_lossy().to_string();
            if self.exclusions.is_excluded(&entry_name) {
                debug!("Excluded {}", join_relative(&node.path, &entry_name));
                continue;
            }

            let entry_rel = join_relative(&node.path, &entry_name);
            let file_type = entry.file_type();

            if file_type.is_dir() {
                let child = self.scan_directory(entry.path(), entry_rel, entry_name, output_file);
                node.directories.push(child);
            } else if file_type.is_file() || (file_type.is_symlink() && entry.path().is_file()) {
                if output_file == Some(entry.path()) {
                    debug!("Skipping the bundle output {}", entry_rel);
                    continue;
                }
                node.files.push(self.process_file(entry.path(), entry_rel, entry_name));
            } else {
                debug!(
                    "Skipping {}: not a regular file or directory",
                    entry_rel
                );
            }
        }

        node
    }

    /// Read a single file into its node representation
    fn process_file(&self, abs_path: &Path, rel_path: String, name: String) -> FileNode {
        self.progress.inc(1);

        // Truncate if too long to avoid display issues
        let display_name = if name.len() > 40 {
            let mut start = name.len() - 37;
            while !name.is_char_boundary(start) {
                start += 1;
            }
            format!("...{}", &name[start..])
        } else {
            name.clone()
        };
        self.progress
            .set_message(format!("Current file: {}", display_name));

        let (size, content) = match fs::read(abs_path) {
            Ok(bytes) => {
                let size = bytes.len() as u64;
                match String::from_utf8(bytes) {
                    Ok(text) => (size, FileContent::Text(text)),
                    Err(_) => {
                        debug!("{} is not valid UTF-8, bundling as binary", rel_path);
                        (size, FileContent::Binary)
                    }
                }
            }
            Err(e) => {
                warn!("Error reading {}: {}", rel_path, e);
                (0, FileContent::Unreadable(e.to_string()))
            }
        };

        FileNode {
            name,
            path: rel_path,
            size,
            content,
        }
    }
}

/// Name the root is rendered with in the tree listing
fn root_name(root: &Path) -> String {
    root.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| ".".to_string())
}
