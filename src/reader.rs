/*!
 * Bundle document reader
 *
 * Decoding happens in two passes. [`parse_bundle`] turns the document into
 * [`FileRecord`]s without touching the filesystem, so a document that cannot
 * be parsed leaves no partial output behind. [`Reconstructor`] then writes the
 * records under a target root.
 */

use std::collections::HashMap;
use std::fs;
use std::mem;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{BundleError, Result, ResultExt};
use crate::format::{classify_line, Marker, BINARY_SENTINEL, SECTION_HEADER};
use crate::types::FileRecord;

/// A header line that could not be parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedHeader {
    /// 1-based line number in the document
    pub line_number: usize,
    /// The offending line
    pub line: String,
}

/// Result of parsing a bundle document
#[derive(Debug, Clone, Default)]
pub struct ParsedBundle {
    /// Records in document order, one per distinct path (last occurrence wins)
    pub records: Vec<FileRecord>,
    /// Header lines that were skipped
    pub malformed: Vec<MalformedHeader>,
    /// Paths that appeared more than once
    pub duplicates: Vec<String>,
}

/// Parser state between lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParserState {
    /// Between files
    Idle,
    /// Inside a file, buffering its lines
    Collecting { path: String, lines: Vec<String> },
    /// After a malformed header, discarding lines until the next marker
    Skipping,
}

/// Line-driven state machine for the concatenated-files section
#[derive(Debug)]
pub struct BundleParser {
    state: ParserState,
    records: Vec<FileRecord>,
    malformed: Vec<MalformedHeader>,
}

impl Default for BundleParser {
    fn default() -> Self {
        Self::new()
    }
}

impl BundleParser {
    pub fn new() -> Self {
        Self {
            state: ParserState::Idle,
            records: Vec::new(),
            malformed: Vec::new(),
        }
    }

    /// Current state
    pub fn state(&self) -> &ParserState {
        &self.state
    }

    /// Process one line (without its `\n`)
    pub fn feed(&mut self, line_number: usize, line: &str) {
        match classify_line(line) {
            Marker::Header(path) => {
                self.flush();
                self.state = ParserState::Collecting {
                    path: path.to_string(),
                    lines: Vec::new(),
                };
            }
            Marker::MalformedHeader => {
                warn!(
                    "Line {}: malformed file header, skipping entry: {}",
                    line_number,
                    line.trim_end()
                );
                self.flush();
                self.malformed.push(MalformedHeader {
                    line_number,
                    line: line.to_string(),
                });
                self.state = ParserState::Skipping;
            }
            Marker::Footer => {
                if self.state == ParserState::Idle {
                    debug!("Line {}: footer without an open file", line_number);
                }
                self.flush();
            }
            Marker::Content => {
                if let ParserState::Collecting { lines, .. } = &mut self.state {
                    lines.push(line.to_string());
                }
            }
        }
    }

    /// Close any open file and return everything parsed
    pub fn finish(mut self) -> ParsedBundle {
        if let ParserState::Collecting { path, .. } = &self.state {
            warn!("{} has no end-of-file marker, keeping its content", path);
        }
        self.flush();

        // Different spellings of one path land on the same file
        let keys: Vec<String> = self.records.iter().map(|r| path_key(&r.path)).collect();
        let mut last_index: HashMap<&str, usize> = HashMap::new();
        for (index, key) in keys.iter().enumerate() {
            last_index.insert(key.as_str(), index);
        }

        let mut duplicates: Vec<String> = Vec::new();
        for (index, key) in keys.iter().enumerate() {
            if last_index[key.as_str()] != index && !duplicates.contains(key) {
                warn!(
                    "{} appears more than once in the bundle; the last copy wins",
                    key
                );
                duplicates.push(key.clone());
            }
        }

        let keep: Vec<bool> = keys
            .iter()
            .enumerate()
            .map(|(index, key)| last_index[key.as_str()] == index)
            .collect();
        let records = self
            .records
            .into_iter()
            .zip(keep)
            .filter_map(|(record, keep)| keep.then_some(record))
            .collect();

        ParsedBundle {
            records,
            malformed: self.malformed,
            duplicates,
        }
    }

    fn flush(&mut self) {
        if let ParserState::Collecting { path, lines } =
            mem::replace(&mut self.state, ParserState::Idle)
        {
            self.records.push(build_record(path, lines));
        }
        self.state = ParserState::Idle;
    }
}

/// Join buffered lines into a record; every line regains its newline
fn build_record(path: String, lines: Vec<String>) -> FileRecord {
    let binary = lines.len() == 1 && lines[0].trim_end_matches('\r') == BINARY_SENTINEL;

    let mut content = lines.join("\n");
    if !lines.is_empty() {
        content.push('\n');
    }

    FileRecord {
        path,
        content,
        binary,
    }
}

/// Parse a bundle document into file records
pub fn parse_bundle(document: &str) -> Result<ParsedBundle> {
    // The final newline terminates the last line rather than starting a new one
    let document = document.strip_suffix('\n').unwrap_or(document);
    let mut lines = document.split('\n').enumerate();

    if !lines
        .by_ref()
        .any(|(_, line)| line.trim_end() == SECTION_HEADER)
    {
        return Err(BundleError::MissingSection(SECTION_HEADER));
    }

    let mut parser = BundleParser::new();
    for (index, line) in lines {
        parser.feed(index + 1, line);
    }

    Ok(parser.finish())
}

/// Convert a header path to a path below the target root.
///
/// Both `/` and `\` are accepted as separators. Returns `None` for paths that
/// would escape the root.
pub fn resolve_relative(raw: &str) -> Option<PathBuf> {
    if raw.starts_with('/') || raw.starts_with('\\') {
        return None;
    }

    let mut out = PathBuf::new();
    for part in raw.split(|c: char| c == '/' || c == '\\') {
        match part {
            "" | "." => continue,
            ".." => return None,
            _ => {
                if cfg!(windows) && part.contains(':') {
                    return None;
                }
                out.push(part);
            }
        }
    }

    let is_plain = out
        .components()
        .all(|c| matches!(c, Component::Normal(_)));
    (is_plain && out.components().next().is_some()).then_some(out)
}

/// `/` joined form of a header path, used to spot duplicates.
///
/// Paths that would be rejected on write are kept as written.
fn path_key(raw: &str) -> String {
    match resolve_relative(raw) {
        Some(path) => path
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/"),
        None => raw.to_string(),
    }
}

/// Outcome of writing records to disk
#[derive(Debug, Clone, Default)]
pub struct ReconstructStatistics {
    /// Paths written successfully
    pub written: Vec<String>,
    /// Records holding the binary sentinel
    pub binary_files: usize,
    /// Paths that could not be written, with the reason
    pub failed: Vec<(String, String)>,
    /// Total bytes written
    pub bytes_written: u64,
}

/// Writes decoded records under a target root
pub struct Reconstructor {
    root: PathBuf,
}

impl Reconstructor {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Target root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the root if needed and write every record.
    ///
    /// Failing to create the root is fatal. Per-file failures are logged and
    /// collected, and the remaining records are still written.
    pub fn write_all(&self, records: &[FileRecord]) -> Result<ReconstructStatistics> {
        if !self.root.is_dir() {
            fs::create_dir_all(&self.root).with_context(|| {
                format!("Cannot create target root {}", self.root.display())
            })?;
            info!("Created target root {}", self.root.display());
        }

        let mut stats = ReconstructStatistics::default();
        for record in records {
            match self.write_record(record) {
                Ok(dest) => {
                    debug!("Wrote {}", dest.display());
                    if record.binary {
                        stats.binary_files += 1;
                    }
                    stats.bytes_written += record.content.len() as u64;
                    stats.written.push(record.path.clone());
                }
                Err(e) => {
                    warn!("Skipping {}: {}", record.path, e);
                    stats.failed.push((record.path.clone(), e.to_string()));
                }
            }
        }

        Ok(stats)
    }

    fn write_record(&self, record: &FileRecord) -> Result<PathBuf> {
        let relative = resolve_relative(&record.path).ok_or_else(|| {
            BundleError::InvalidArgument(format!(
                "path {:?} is absolute or leaves the target root",
                record.path
            ))
        })?;
        let dest = self.root.join(relative);

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create directory {}", parent.display()))?;
        }
        fs::write(&dest, &record.content)
            .with_context(|| format!("Cannot write {}", dest.display()))?;

        Ok(dest)
    }
}

/// Read a bundle document and recreate its files under `root`
pub fn decode_file(input: &Path, root: &Path) -> Result<(ParsedBundle, ReconstructStatistics)> {
    let document = fs::read_to_string(input)
        .with_context(|| format!("Cannot read input {}", input.display()))?;
    let parsed = parse_bundle(&document)?;
    let stats = Reconstructor::new(root).write_all(&parsed.records)?;
    Ok((parsed, stats))
}
