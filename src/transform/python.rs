//! Comment stripping for Python sources

use super::{line_of, ContentTransform, LineSink, TransformError, TransformResult};

/// Removes `#` comments while leaving string literals untouched
#[derive(Debug, Clone, Copy, Default)]
pub struct PythonCommentStripper;

impl ContentTransform for PythonCommentStripper {
    fn name(&self) -> &str {
        "python-comments"
    }

    fn apply(&self, content: &str) -> TransformResult<String> {
        strip_comments(content)
    }
}

#[derive(Debug, Clone, Copy)]
enum State {
    Code,
    Str { quote: char, triple: bool, start: usize },
}

fn strip_comments(source: &str) -> TransformResult<String> {
    let chars: Vec<char> = source.chars().collect();
    let mut sink = LineSink::new(source.len());
    let mut state = State::Code;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match state {
            State::Code => match c {
                '#' => {
                    sink.mark_comment();
                    while i < chars.len() && chars[i] != '\n' {
                        i += 1;
                    }
                    continue;
                }
                '\'' | '"' => {
                    // String prefixes (r, b, f, u) were already emitted as code
                    let triple = chars.get(i + 1) == Some(&c) && chars.get(i + 2) == Some(&c);
                    let width = if triple { 3 } else { 1 };
                    sink.push_slice(&chars[i..i + width]);
                    state = State::Str {
                        quote: c,
                        triple,
                        start: i,
                    };
                    i += width;
                    continue;
                }
                '\n' => sink.newline(false),
                _ => sink.push(c),
            },
            State::Str {
                quote,
                triple,
                start,
            } => match c {
                '\\' => {
                    sink.push(c);
                    match chars.get(i + 1) {
                        Some('\n') => sink.newline(true),
                        Some(&next) => sink.push(next),
                        None => break,
                    }
                    i += 2;
                    continue;
                }
                '\n' if !triple => {
                    return Err(TransformError::Unterminated {
                        what: "string literal",
                        line: line_of(&chars, start),
                    });
                }
                '\n' => sink.newline(true),
                c if c == quote && !triple => {
                    sink.push(c);
                    state = State::Code;
                }
                c if c == quote
                    && chars.get(i + 1) == Some(&quote)
                    && chars.get(i + 2) == Some(&quote) =>
                {
                    sink.push_slice(&chars[i..i + 3]);
                    state = State::Code;
                    i += 3;
                    continue;
                }
                _ => sink.push(c),
            },
        }
        i += 1;
    }

    if let State::Str { start, .. } = state {
        return Err(TransformError::Unterminated {
            what: "string literal",
            line: line_of(&chars, start),
        });
    }

    Ok(sink.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip(src: &str) -> String {
        PythonCommentStripper.apply(src).unwrap()
    }

    #[test]
    fn test_removes_whole_line_and_trailing_comments() {
        let src = "# header\nimport os  # why\n\nx = 1\n";
        assert_eq!(strip(src), "import os\nx = 1\n");
    }

    #[test]
    fn test_hash_inside_strings_is_kept() {
        let src = "a = '#not'\nb = \"# nor\"  # yes\nc = r'\\'#'\n";
        assert_eq!(strip(src), "a = '#not'\nb = \"# nor\"\nc = r'\\'#'\n");
    }

    #[test]
    fn test_triple_quoted_strings_keep_blank_lines() {
        let src = "doc = \"\"\"first\n\n# still text\n\"\"\"  # gone\n";
        assert_eq!(strip(src), "doc = \"\"\"first\n\n# still text\n\"\"\"\n");
    }

    #[test]
    fn test_quote_inside_triple_string() {
        let src = "s = '''it's \"fine\"'''\n# c\n";
        assert_eq!(strip(src), "s = '''it's \"fine\"'''\n");
    }

    #[test]
    fn test_empty_strings() {
        assert_eq!(strip("a = ''  # e\nb = \"\"\n"), "a = ''\nb = \"\"\n");
    }

    #[test]
    fn test_indented_comment_lines_removed() {
        let src = "def f():\n    # explain\n    return 1\n";
        assert_eq!(strip(src), "def f():\n    return 1\n");
    }

    #[test]
    fn test_unterminated_string_fails() {
        let err = PythonCommentStripper.apply("x = 1\ny = 'oops\n").unwrap_err();
        assert_eq!(
            err,
            TransformError::Unterminated {
                what: "string literal",
                line: 2
            }
        );
    }

    #[test]
    fn test_unterminated_triple_string_fails() {
        assert!(PythonCommentStripper.apply("x = \"\"\"never closed\n").is_err());
    }

    #[test]
    fn test_no_trailing_newline_preserved() {
        assert_eq!(strip("x = 1  # c"), "x = 1");
    }
}
