//! Comment stripping for languages with `//` and `/* */` comments

use super::{line_of, ContentTransform, LineSink, TransformError, TransformResult};

/// Removes line and block comments from C-like sources.
///
/// The Rust flavour additionally understands raw strings, lifetimes, nested
/// block comments and multi-line string literals. The C-like flavour treats
/// backtick strings (JavaScript templates, Go raw strings) as multi-line.
#[derive(Debug, Clone, Copy)]
pub struct CFamilyCommentStripper {
    rust: bool,
}

impl CFamilyCommentStripper {
    pub fn rust() -> Self {
        Self { rust: true }
    }

    pub fn c_like() -> Self {
        Self { rust: false }
    }
}

impl ContentTransform for CFamilyCommentStripper {
    fn name(&self) -> &str {
        if self.rust {
            "rust-comments"
        } else {
            "c-family-comments"
        }
    }

    fn apply(&self, content: &str) -> TransformResult<String> {
        Tokenizer::new(content, self.rust).run()
    }
}

#[derive(Debug, Clone, Copy)]
enum State {
    Code,
    Block { depth: usize, start: usize },
    Str { quote: char, multiline: bool, start: usize },
    RawStr { hashes: usize, start: usize },
}

struct Tokenizer {
    chars: Vec<char>,
    sink: LineSink,
    rust: bool,
}

fn is_ident(c: Option<char>) -> bool {
    matches!(c, Some(c) if c.is_alphanumeric() || c == '_')
}

impl Tokenizer {
    fn new(source: &str, rust: bool) -> Self {
        Self {
            chars: source.chars().collect(),
            sink: LineSink::new(source.len()),
            rust,
        }
    }

    fn at(&self, i: usize) -> Option<char> {
        self.chars.get(i).copied()
    }

    /// Number of `#` marks when a Rust raw string (`r"`, `r#"`, `br"`) starts at `i`
    fn raw_string_hashes(&self, i: usize) -> Option<usize> {
        if !self.rust || self.chars[i] != 'r' {
            return None;
        }
        let before = i.checked_sub(1).and_then(|p| self.at(p));
        let prefixed_ok = match before {
            Some('b') => !is_ident(i.checked_sub(2).and_then(|p| self.at(p))),
            other => !is_ident(other),
        };
        if !prefixed_ok {
            return None;
        }
        let mut j = i + 1;
        while self.at(j) == Some('#') {
            j += 1;
        }
        (self.at(j) == Some('"')).then(|| j - i - 1)
    }

    fn closes_raw_string(&self, i: usize, hashes: usize) -> bool {
        self.chars[i] == '"' && (1..=hashes).all(|k| self.at(i + k) == Some('#'))
    }

    /// Keep the tokens around an inline block comment spanning `start..end` apart
    fn separate_tokens(&mut self, start: usize, end: usize) {
        let touches_code = |c: Option<char>| matches!(c, Some(c) if !c.is_whitespace());
        let before = start.checked_sub(1).and_then(|p| self.at(p));
        let single_line = !self.chars[start..end].contains(&'\n');
        if single_line && touches_code(before) && touches_code(self.at(end)) {
            self.sink.push(' ');
        }
    }

    fn unterminated(&self, what: &'static str, start: usize) -> TransformError {
        TransformError::Unterminated {
            what,
            line: line_of(&self.chars, start),
        }
    }

    fn run(mut self) -> TransformResult<String> {
        let mut state = State::Code;
        let mut i = 0;

        while i < self.chars.len() {
            let c = self.chars[i];
            let next = self.at(i + 1);

            match state {
                State::Code => {
                    if c == '/' && next == Some('/') {
                        self.sink.mark_comment();
                        while i < self.chars.len() && self.chars[i] != '\n' {
                            i += 1;
                        }
                        continue;
                    }
                    if c == '/' && next == Some('*') {
                        self.sink.mark_comment();
                        state = State::Block { depth: 1, start: i };
                        i += 2;
                        continue;
                    }
                    if let Some(hashes) = self.raw_string_hashes(i) {
                        let end = i + hashes + 2;
                        self.sink.push_slice(&self.chars[i..end]);
                        state = State::RawStr { hashes, start: i };
                        i = end;
                        continue;
                    }
                    match c {
                        '"' => {
                            self.sink.push(c);
                            state = State::Str {
                                quote: c,
                                multiline: self.rust,
                                start: i,
                            };
                        }
                        '`' if !self.rust => {
                            self.sink.push(c);
                            state = State::Str {
                                quote: c,
                                multiline: true,
                                start: i,
                            };
                        }
                        '\'' if self.rust && next != Some('\\') => {
                            // 'x' is a char literal, anything else is a lifetime or label
                            if self.at(i + 2) == Some('\'') {
                                self.sink.push_slice(&self.chars[i..i + 3]);
                                i += 3;
                                continue;
                            }
                            self.sink.push(c);
                        }
                        '\'' => {
                            self.sink.push(c);
                            state = State::Str {
                                quote: c,
                                multiline: false,
                                start: i,
                            };
                        }
                        '\n' => self.sink.newline(false),
                        _ => self.sink.push(c),
                    }
                }
                State::Block { depth, start } => {
                    if c == '*' && next == Some('/') {
                        state = if depth == 1 {
                            self.separate_tokens(start, i + 2);
                            State::Code
                        } else {
                            State::Block {
                                depth: depth - 1,
                                start,
                            }
                        };
                        i += 2;
                        continue;
                    }
                    if self.rust && c == '/' && next == Some('*') {
                        state = State::Block {
                            depth: depth + 1,
                            start,
                        };
                        i += 2;
                        continue;
                    }
                    if c == '\n' {
                        self.sink.newline(false);
                    }
                }
                State::Str {
                    quote,
                    multiline,
                    start,
                } => match c {
                    '\\' => {
                        self.sink.push(c);
                        match next {
                            Some('\n') => self.sink.newline(true),
                            Some(n) => self.sink.push(n),
                            None => break,
                        }
                        i += 2;
                        continue;
                    }
                    '\n' if !multiline => {
                        let what = if quote == '\'' {
                            "character literal"
                        } else {
                            "string literal"
                        };
                        return Err(self.unterminated(what, start));
                    }
                    '\n' => self.sink.newline(true),
                    c if c == quote => {
                        self.sink.push(c);
                        state = State::Code;
                    }
                    _ => self.sink.push(c),
                },
                State::RawStr { hashes, .. } => {
                    if self.closes_raw_string(i, hashes) {
                        self.sink.push_slice(&self.chars[i..i + hashes + 1]);
                        state = State::Code;
                        i += hashes + 1;
                        continue;
                    }
                    if c == '\n' {
                        self.sink.newline(true);
                    } else {
                        self.sink.push(c);
                    }
                }
            }
            i += 1;
        }

        match state {
            State::Code => Ok(self.sink.finish()),
            State::Block { start, .. } => Err(self.unterminated("block comment", start)),
            State::Str { quote, start, .. } if quote == '\'' => {
                Err(self.unterminated("character literal", start))
            }
            State::Str { start, .. } | State::RawStr { start, .. } => {
                Err(self.unterminated("string literal", start))
            }
        }
    }
}
