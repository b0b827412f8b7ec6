/*!
 * Bundle document writer
 */

use std::fs::File;
use std::io::{BufWriter, Write};

use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{Result, ResultExt};
use crate::format::{
    ensure_trailing_newline, file_footer, file_header, is_marker_line, BINARY_SENTINEL,
    SECTION_HEADER, STRUCTURE_HEADER,
};
use crate::report::FileReportInfo;
use crate::transform::{strip_blank_lines, TransformRegistry, BUILTIN_TRANSFORMS};
use crate::types::{DirectoryNode, FileContent, FileNode};

/// Spaces per depth level in the tree listing
const INDENT: usize = 4;

/// Counters collected while writing a bundle
#[derive(Debug, Clone, Default)]
pub struct WriteStatistics {
    /// Files emitted in the concatenated section
    pub files_written: usize,
    /// Files emitted as the binary sentinel
    pub binary_files: usize,
    /// Files that could not be read
    pub unreadable_files: usize,
    /// Files whose comments were stripped
    pub comments_stripped: usize,
    /// Lines of emitted content
    pub total_lines: usize,
    /// Characters of emitted content
    pub total_chars: usize,
    /// Per-file details, in bundle order
    pub file_details: Vec<(String, FileReportInfo)>,
}

/// Writes a scanned tree as a bundle document
pub struct BundleWriter {
    /// Writer configuration
    config: Config,
    /// Comment strippers by extension
    transforms: TransformRegistry,
}

impl BundleWriter {
    /// Create a writer using the built-in comment strippers
    pub fn new(config: Config) -> Self {
        Self::with_transforms(config, BUILTIN_TRANSFORMS.clone())
    }

    /// Create a writer with a custom transform registry
    pub fn with_transforms(config: Config, transforms: TransformRegistry) -> Self {
        Self { config, transforms }
    }

    /// Write the bundle to the configured output file
    pub fn write(&self, root: &DirectoryNode) -> Result<WriteStatistics> {
        let path = &self.config.output_file;
        let file = File::create(path)
            .with_context(|| format!("Cannot write output {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        let stats = self.write_to(root, &mut writer)?;
        writer
            .flush()
            .with_context(|| format!("Cannot write output {}", path.display()))?;
        Ok(stats)
    }

    /// Write the bundle to any writer
    pub fn write_to<W: Write>(&self, root: &DirectoryNode, out: &mut W) -> Result<WriteStatistics> {
        let mut stats = WriteStatistics::default();

        write!(out, "{}\n\n", STRUCTURE_HEADER)?;
        out.write_all(render_tree(root).as_bytes())?;
        write!(out, "\n\n{}\n\n", SECTION_HEADER)?;

        for file in root.sorted_files() {
            let content = self.render_content(file, &mut stats);

            writeln!(out, "{}", file_header(&file.path))?;
            out.write_all(content.as_bytes())?;
            write!(out, "{}\n\n", file_footer(&file.path))?;

            let info = FileReportInfo {
                lines: content.lines().count(),
                chars: content.chars().count(),
            };
            stats.files_written += 1;
            stats.total_lines += info.lines;
            stats.total_chars += info.chars;
            stats.file_details.push((file.path.clone(), info));
        }

        Ok(stats)
    }

    /// Content block for one file, newline terminated unless empty
    fn render_content(&self, file: &FileNode, stats: &mut WriteStatistics) -> String {
        match &file.content {
            FileContent::Text(text) => {
                let text = self.apply_transforms(file, text, stats);
                if text.lines().any(is_marker_line) {
                    warn!(
                        "{} contains a line that looks like a bundle marker; decoding will split the file there",
                        file.path
                    );
                }
                ensure_trailing_newline(text)
            }
            FileContent::Binary => {
                stats.binary_files += 1;
                format!("{}\n", BINARY_SENTINEL)
            }
            FileContent::Unreadable(message) => {
                stats.unreadable_files += 1;
                format!("[error reading file: {}]\n", message)
            }
        }
    }

    fn apply_transforms(&self, file: &FileNode, text: &str, stats: &mut WriteStatistics) -> String {
        if self.config.strip_comments {
            if let Some(transform) = self.transforms.for_path(&file.path) {
                match transform.apply(text) {
                    Ok(stripped) => {
                        debug!("Stripped comments from {} ({})", file.path, transform.name());
                        stats.comments_stripped += 1;
                        // Comment stripping already drops blank lines
                        return stripped;
                    }
                    Err(e) => warn!(
                        "Could not strip comments from {} ({}): {}; keeping original content",
                        file.path,
                        transform.name(),
                        e
                    ),
                }
            }
        }

        if self.config.strip_blank_lines {
            strip_blank_lines(text)
        } else {
            text.to_string()
        }
    }
}

/// Render the indented tree listing of a scanned directory
pub fn render_tree(root: &DirectoryNode) -> String {
    let mut lines = Vec::new();
    render_directory(root, 0, &mut lines);
    lines.join("\n")
}

fn render_directory(dir: &DirectoryNode, depth: usize, lines: &mut Vec<String>) {
    lines.push(format!("{}{}/", " ".repeat(INDENT * depth), dir.name));

    let file_indent = " ".repeat(INDENT * (depth + 1));
    for file in &dir.files {
        lines.push(format!("{}{}", file_indent, file.name));
    }

    for child in &dir.directories {
        render_directory(child, depth + 1, lines);
    }
}
