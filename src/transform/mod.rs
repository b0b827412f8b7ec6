/*!
 * Content transforms applied to file contents before they are bundled
 *
 * Comment stripping is language specific, so each language registers a
 * [`ContentTransform`] under its file extensions. Blank-line stripping is
 * language independent and lives here as a plain function.
 */

mod c_family;
mod error;
mod python;

pub use c_family::CFamilyCommentStripper;
pub use error::{TransformError, TransformResult};
pub use python::PythonCommentStripper;

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use once_cell::sync::Lazy;
use strum::{Display, EnumIter, EnumProperty, IntoEnumIterator};

/// A rewrite of a file's text content
pub trait ContentTransform: Send + Sync {
    /// Short name used in log messages
    fn name(&self) -> &str;

    /// Rewrite `content`, or fail if it cannot be tokenized
    fn apply(&self, content: &str) -> TransformResult<String>;
}

/// Languages with a built-in comment stripper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, EnumProperty)]
#[strum(serialize_all = "lowercase")]
pub enum Language {
    #[strum(props(extensions = "py,pyi,pyw"))]
    Python,

    #[strum(props(extensions = "rs"))]
    Rust,

    #[strum(props(extensions = "c,h,cc,cpp,cxx,hpp,java,js,mjs,ts,tsx,go"))]
    CFamily,
}

impl Language {
    /// File extensions handled by this language
    pub fn extensions(&self) -> Vec<&'static str> {
        self.get_str("extensions")
            .map(|list| list.split(',').collect())
            .unwrap_or_default()
    }

    /// Find the language registered for an extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        Self::iter().find(|lang| lang.extensions().contains(&ext))
    }

    /// Comment stripper for this language
    pub fn comment_stripper(&self) -> Arc<dyn ContentTransform> {
        match self {
            Language::Python => Arc::new(PythonCommentStripper),
            Language::Rust => Arc::new(CFamilyCommentStripper::rust()),
            Language::CFamily => Arc::new(CFamilyCommentStripper::c_like()),
        }
    }
}

/// Comment-stripping transforms keyed by file extension
#[derive(Clone, Default)]
pub struct TransformRegistry {
    by_extension: HashMap<String, Arc<dyn ContentTransform>>,
}

/// Registry holding the comment strippers of every [`Language`]
pub static BUILTIN_TRANSFORMS: Lazy<TransformRegistry> = Lazy::new(TransformRegistry::builtin);

impl TransformRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with every built-in language registered
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for lang in Language::iter() {
            let stripper = lang.comment_stripper();
            for ext in lang.extensions() {
                registry.register(ext, Arc::clone(&stripper));
            }
        }
        registry
    }

    /// Register a transform for an extension (without the leading dot)
    pub fn register(&mut self, extension: &str, transform: Arc<dyn ContentTransform>) {
        self.by_extension
            .insert(extension.to_ascii_lowercase(), transform);
    }

    /// Transform registered for the extension of `path`, if any
    pub fn for_path(&self, path: &str) -> Option<&dyn ContentTransform> {
        let ext = Path::new(path).extension()?.to_str()?.to_ascii_lowercase();
        self.by_extension.get(&ext).map(|t| t.as_ref())
    }
}

/// Remove every empty or whitespace-only line
pub fn strip_blank_lines(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    for line in content.split_inclusive('\n') {
        if !line.trim().is_empty() {
            out.push_str(line);
        }
    }
    out
}

/// Accumulates output line by line while a tokenizer drops comments.
///
/// A line is removed when it ends up whitespace-only and no string literal
/// touches it. Trailing whitespace left in front of a removed comment is
/// trimmed.
pub(crate) struct LineSink {
    out: String,
    line: String,
    started_in_literal: bool,
    had_comment: bool,
}

impl LineSink {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            out: String::with_capacity(capacity),
            line: String::new(),
            started_in_literal: false,
            had_comment: false,
        }
    }

    pub(crate) fn push(&mut self, c: char) {
        self.line.push(c);
    }

    pub(crate) fn push_slice(&mut self, chars: &[char]) {
        self.line.extend(chars);
    }

    pub(crate) fn mark_comment(&mut self) {
        self.had_comment = true;
    }

    /// Close the current line. `in_literal` is true when the newline is part
    /// of a multi-line string literal.
    pub(crate) fn newline(&mut self, in_literal: bool) {
        self.flush_line(in_literal, true);
        self.started_in_literal = in_literal;
    }

    pub(crate) fn finish(mut self) -> String {
        if !self.line.is_empty() {
            self.flush_line(false, false);
        }
        self.out
    }

    fn flush_line(&mut self, in_literal: bool, newline: bool) {
        let mut line = std::mem::take(&mut self.line);
        let carriage_return = line.ends_with('\r');
        if carriage_return {
            line.pop();
        }

        if self.had_comment && !in_literal {
            let trimmed = line.trim_end().len();
            line.truncate(trimmed);
        }
        self.had_comment = false;

        let touches_literal = self.started_in_literal || in_literal;
        if line.trim().is_empty() && !touches_literal {
            return;
        }

        self.out.push_str(&line);
        if carriage_return {
            self.out.push('\r');
        }
        if newline {
            self.out.push('\n');
        }
    }
}

/// 1-based line number of the char at `index`
pub(crate) fn line_of(chars: &[char], index: usize) -> usize {
    chars[..index.min(chars.len())]
        .iter()
        .filter(|&&c| c == '\n')
        .count()
        + 1
}
