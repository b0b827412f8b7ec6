/*!
 * Bundle document wire format
 *
 * Marker lines and helpers shared by the writer and the reader. The marker
 * strings are part of the interchange format and must not change.
 */

/// Header line opening the tree listing
pub const STRUCTURE_HEADER: &str = "# --- Project Structure ---";

/// Header line opening the concatenated-files section
pub const SECTION_HEADER: &str = "# --- Concatenated Files ---";

/// Prefix of a file header line
pub const FILE_HEADER_PREFIX: &str = "# --- File: ";

/// Prefix of a file footer line
pub const FILE_FOOTER_PREFIX: &str = "# --- End of File: ";

/// Suffix closing both header and footer lines
pub const MARKER_SUFFIX: &str = " ---";

/// Placeholder emitted in place of content that is not valid UTF-8
pub const BINARY_SENTINEL: &str = "binary file";

/// Render the header line for a file
pub fn file_header(path: &str) -> String {
    format!("{}{}{}", FILE_HEADER_PREFIX, path, MARKER_SUFFIX)
}

/// Render the footer line for a file
pub fn file_footer(path: &str) -> String {
    format!("{}{}{}", FILE_FOOTER_PREFIX, path, MARKER_SUFFIX)
}

/// Classification of a single line in the concatenated-files section
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Marker<'a> {
    /// A well-formed file header carrying its path
    Header(&'a str),
    /// A line that starts like a header but cannot be parsed
    MalformedHeader,
    /// A file footer
    Footer,
    /// Anything else
    Content,
}

/// Classify a line of the concatenated-files section
pub fn classify_line(line: &str) -> Marker<'_> {
    if let Some(rest) = line.strip_prefix(FILE_HEADER_PREFIX) {
        return match rest.trim_end().strip_suffix(MARKER_SUFFIX) {
            Some(path) if !path.trim().is_empty() => Marker::Header(path),
            _ => Marker::MalformedHeader,
        };
    }

    if line.starts_with(FILE_FOOTER_PREFIX) {
        return Marker::Footer;
    }

    Marker::Content
}

/// True when `line` would be read back as a header or footer marker
pub fn is_marker_line(line: &str) -> bool {
    let line = line.strip_suffix('\r').unwrap_or(line);
    !matches!(classify_line(line), Marker::Content)
}

/// Append a newline to non-empty content that does not already end with one
pub fn ensure_trailing_newline(mut content: String) -> String {
    if !content.is_empty() && !content.ends_with('\n') {
        content.push('\n');
    }
    content
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_and_footer_rendering() {
        assert_eq!(file_header("src/main.rs"), "# --- File: src/main.rs ---");
        assert_eq!(
            file_footer("src/main.rs"),
            "# --- End of File: src/main.rs ---"
        );
    }

    #[test]
    fn test_classify_header() {
        assert_eq!(
            classify_line("# --- File: a/b c.txt ---"),
            Marker::Header("a/b c.txt")
        );
        // Trailing whitespace and carriage returns do not break a header
        assert_eq!(
            classify_line("# --- File: a.txt ---  \r"),
            Marker::Header("a.txt")
        );
    }

    #[test]
    fn test_classify_malformed_header() {
        assert_eq!(classify_line("# --- File: a.txt"), Marker::MalformedHeader);
        assert_eq!(classify_line("# --- File:  ---"), Marker::MalformedHeader);
    }

    #[test]
    fn test_classify_footer_and_content() {
        assert_eq!(classify_line("# --- End of File: a.txt ---"), Marker::Footer);
        assert_eq!(classify_line("# --- End of File: whatever"), Marker::Footer);
        assert_eq!(classify_line("# regular comment"), Marker::Content);
        assert_eq!(classify_line(""), Marker::Content);
    }

    #[test]
    fn test_ensure_trailing_newline() {
        assert_eq!(ensure_trailing_newline("hello".into()), "hello\n");
        assert_eq!(ensure_trailing_newline("hello\n".into()), "hello\n");
        assert_eq!(ensure_trailing_newline("a\n\n".into()), "a\n\n");
        assert_eq!(ensure_trailing_newline(String::new()), "");
    }
}
