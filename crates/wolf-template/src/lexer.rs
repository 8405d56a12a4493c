//! Character cursor with an indentation layer.
//!
//! The grammar reads characters directly and asks the lexer for a
//! [`Layout`] token whenever a logical line ends. Layout tokens are derived
//! from the indentation of the next significant line, so the grammar sees
//! blocks the same way it would see brackets.

use crate::error::{SyntaxError, SyntaxResult};
use std::collections::VecDeque;
use wolf_source::Span;

/// Synthetic tokens produced at line boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Layout {
    /// The next line is deeper than the current level.
    Indent,
    /// The next line is at the current level.
    Continue,
    /// One level closes.
    Deindent,
    /// No more lines.
    Eof,
}

pub(crate) struct Lexer<'a> {
    source: &'a str,
    pos: usize,
    /// Offset of `source` within the component file.
    base: u32,
    /// Indentation prefix of each open level. The first entry is the base level.
    levels: Vec<&'a str>,
    pending: VecDeque<Layout>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, base: u32) -> Self {
        Self {
            source,
            pos: 0,
            base,
            levels: Vec::new(),
            pending: VecDeque::new(),
        }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn set_pos(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// File span of a section-relative byte range.
    pub fn span(&self, start: usize, end: usize) -> Span {
        Span::new(start as u32 + self.base, end as u32 + self.base)
    }

    pub fn span_from(&self, start: usize) -> Span {
        self.span(start, self.pos)
    }

    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.source[start..end]
    }

    pub fn remaining(&self) -> &'a str {
        &self.source[self.pos..]
    }

    pub fn is_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    pub fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    pub fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    pub fn starts_with(&self, s: &str) -> bool {
        self.remaining().starts_with(s)
    }

    /// Consume `s` if it is next.
    pub fn consume(&mut self, s: &str) -> bool {
        if self.starts_with(s) {
            self.pos += s.len();
            true
        } else {
            false
        }
    }

    pub fn read_while<F: Fn(char) -> bool>(&mut self, pred: F) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
        &self.source[start..self.pos]
    }

    /// Skip spaces and tabs; returns how many were skipped.
    pub fn skip_inline_ws(&mut self) -> usize {
        self.read_while(|c| c == ' ' || c == '\t').len()
    }

    pub fn at_line_end(&self) -> bool {
        let rest = self.remaining();
        rest.is_empty() || rest.starts_with('\n') || rest.starts_with("\r\n") || rest == "\r"
    }

    fn skip_line(&mut self) {
        while let Some(c) = self.advance() {
            if c == '\n' {
                break;
            }
        }
    }

    /// Failure describing whatever is at the cursor.
    pub fn unexpected(&self, expected: &'static str) -> SyntaxError {
        let (found, len) = match self.peek() {
            None => ("end of input".to_string(), 0),
            Some('\n') | Some('\r') => ("end of line".to_string(), 0),
            Some(c) => (format!("`{c}`"), c.len_utf8()),
        };
        SyntaxError::Unexpected {
            found,
            expected,
            span: self.span(self.pos, self.pos + len),
        }
    }

    /// Move to the first significant line and fix the base indentation.
    /// Returns `false` for a template with no significant lines.
    pub fn start(&mut self) -> bool {
        match self.next_significant_line() {
            Some(indent) => {
                self.levels = vec![indent];
                true
            }
            None => false,
        }
    }

    /// Starting at a line start, skip blank and `//` comment lines. Leaves the
    /// cursor after the indentation of the next significant line.
    fn next_significant_line(&mut self) -> Option<&'a str> {
        loop {
            if self.is_eof() {
                return None;
            }
            let indent = self.read_while(|c| c == ' ' || c == '\t');
            if self.at_line_end() || self.starts_with("//") {
                self.skip_line();
                continue;
            }
            return Some(indent);
        }
    }

    pub fn peek_layout(&mut self) -> SyntaxResult<Layout> {
        if self.pending.is_empty() {
            self.compute_layout()?;
        }
        Ok(self.pending.front().copied().unwrap_or(Layout::Eof))
    }

    pub fn next_layout(&mut self) -> SyntaxResult<Layout> {
        let layout = self.peek_layout()?;
        self.pending.pop_front();
        Ok(layout)
    }

    fn compute_layout(&mut self) -> SyntaxResult<()> {
        self.skip_inline_ws();
        if !self.at_line_end() {
            return Err(self.unexpected("end of line"));
        }
        self.skip_line();

        let Some(indent) = self.next_significant_line() else {
            for _ in 1..self.levels.len() {
                self.pending.push_back(Layout::Deindent);
            }
            self.levels.truncate(1);
            self.pending.push_back(Layout::Eof);
            return Ok(());
        };

        let top = self.levels.last().copied().unwrap_or_default();
        if indent == top {
            self.pending.push_back(Layout::Continue);
        } else if indent.len() > top.len() && indent.starts_with(top) {
            self.levels.push(indent);
            self.pending.push_back(Layout::Indent);
        } else if let Some(depth) = self.levels.iter().rposition(|level| *level == indent) {
            for _ in depth + 1..self.levels.len() {
                self.pending.push_back(Layout::Deindent);
            }
            self.levels.truncate(depth + 1);
            self.pending.push_back(Layout::Continue);
        } else {
            return Err(SyntaxError::InconsistentDedent {
                span: self.span(self.pos - indent.len(), self.pos),
            });
        }
        Ok(())
    }

    /// Scan code from `from` until `close` appears outside any bracket,
    /// string, template literal or comment. Returns the offset of `close`.
    ///
    /// `open` is where the construct started, for error reporting.
    pub fn scan_balanced(
        &self,
        from: usize,
        close: &str,
        what: &'static str,
        open: usize,
    ) -> SyntaxResult<usize> {
        let bytes = self.source.as_bytes();
        let mut stack: Vec<u8> = Vec::new();
        let mut i = from;

        while i < bytes.len() {
            let c = bytes[i];
            if stack.last() == Some(&b'`') {
                match c {
                    b'\\' => i += 2,
                    b'`' => {
                        stack.pop();
                        i += 1;
                    }
                    b'$' if bytes.get(i + 1) == Some(&b'{') => {
                        stack.push(b'}');
                        i += 2;
                    }
                    _ => i += 1,
                }
                continue;
            }

            if stack.is_empty() && bytes[i..].starts_with(close.as_bytes()) {
                return Ok(i);
            }

            match c {
                b'\'' | b'"' => {
                    i = self.skip_quoted(i)?;
                    continue;
                }
                b'/' if bytes.get(i + 1) == Some(&b'/') => {
                    while i < bytes.len() && bytes[i] != b'\n' {
                        i += 1;
                    }
                    continue;
                }
                b'/' if bytes.get(i + 1) == Some(&b'*') => {
                    match self.source[i + 2..].find("*/") {
                        Some(end) => i += 2 + end + 2,
                        None => {
                            return Err(SyntaxError::Unterminated {
                                what: "comment",
                                span: self.span(i, bytes.len()),
                            })
                        }
                    }
                    continue;
                }
                b'`' => stack.push(b'`'),
                b'(' => stack.push(b')'),
                b'[' => stack.push(b']'),
                b'{' => stack.push(b'}'),
                b')' | b']' | b'}' => match stack.pop() {
                    Some(expected) if expected == c => {}
                    Some(expected) => {
                        return Err(SyntaxError::MismatchedBracket {
                            expected: expected as char,
                            found: c as char,
                            span: self.span(i, i + 1),
                        })
                    }
                    None => {
                        return Err(SyntaxError::MismatchedBracket {
                            expected: close.chars().next().unwrap_or(')'),
                            found: c as char,
                            span: self.span(i, i + 1),
                        })
                    }
                },
                _ => {}
            }
            i += 1;
        }

        Err(SyntaxError::Unterminated {
            what,
            span: self.span(open, from),
        })
    }

    /// Skip a quoted string starting at `start`; returns the offset after it.
    fn skip_quoted(&self, start: usize) -> SyntaxResult<usize> {
        let bytes = self.source.as_bytes();
        let quote = bytes[start];
        let mut i = start + 1;
        while i < bytes.len() {
            match bytes[i] {
                b'\\' => i += 2,
                b'\n' => break,
                c if c == quote => return Ok(i + 1),
                _ => i += 1,
            }
        }
        Err(SyntaxError::Unterminated {
            what: "string literal",
            span: self.span(start, i.min(bytes.len())),
        })
    }
}
