/*!
 * Exclusion patterns
 *
 * Patterns are matched against bare file and directory names, never full
 * paths, so a pattern excludes a name at every depth of the tree.
 */

use std::fs;
use std::path::Path;

use glob_match::glob_match;
use tracing::debug;

use crate::error::{Result, ResultExt};

/// Ordered set of glob or exact-name exclusion patterns
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    patterns: Vec<String>,
}

impl ExclusionSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from already-split patterns
    pub fn from_patterns<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::new();
        set.extend(patterns);
        set
    }

    /// Parse a config text: one pattern per line, blank lines and `#` comments ignored
    pub fn parse(text: &str) -> Self {
        Self::from_patterns(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#')),
        )
    }

    /// Load patterns from a config file
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read exclusion config {}", path.display()))?;
        let set = Self::parse(&text);
        debug!(
            "Loaded {} exclusion pattern(s) from {}",
            set.len(),
            path.display()
        );
        Ok(set)
    }

    /// Append patterns, skipping empty strings
    pub fn extend<I, S>(&mut self, patterns: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.patterns.extend(
            patterns
                .into_iter()
                .map(Into::into)
                .filter(|p: &String| !p.trim().is_empty()),
        );
    }

    /// Check whether a bare name should be skipped
    pub fn is_excluded(&self, name: &str) -> bool {
        self.patterns
            .iter()
            .any(|pattern| pattern == name || glob_match(pattern, name))
    }

    /// Patterns in load order
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let set = ExclusionSet::parse("# build output\n\ntarget\n  *.log  \n#*.txt\n");
        assert_eq!(set.patterns(), &["target".to_string(), "*.log".to_string()]);
    }

    #[test]
    fn test_glob_matching() {
        let set = ExclusionSet::from_patterns(["*.log", "file?.txt", "[ab].md"]);
        assert!(set.is_excluded("skip.log"));
        assert!(set.is_excluded("file1.txt"));
        assert!(set.is_excluded("a.md"));
        assert!(!set.is_excluded("c.md"));
        assert!(!set.is_excluded("file10.txt"));
        assert!(!set.is_excluded("log"));
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let set = ExclusionSet::from_patterns(["*.LOG", "Makefile"]);
        assert!(set.is_excluded("a.LOG"));
        assert!(!set.is_excluded("a.log"));
        assert!(!set.is_excluded("makefile"));
    }

    #[test]
    fn test_exact_name_fallback() {
        let set = ExclusionSet::from_patterns(["node_modules", "[draft]"]);
        assert!(set.is_excluded("node_modules"));
        assert!(set.is_excluded("[draft]"));
        assert!(!set.is_excluded("node_modules2"));
    }

    #[test]
    fn test_empty_set_excludes_nothing() {
        let set = ExclusionSet::new();
        assert!(set.is_empty());
        assert!(!set.is_excluded("anything"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "# comment\n*.pyc\n__pycache__").unwrap();

        let set = ExclusionSet::load(file.path()).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.is_excluded("mod.pyc"));
        assert!(set.is_excluded("__pycache__"));
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ExclusionSet::load(&dir.path().join("nope.txt")).is_err());
    }
}
