//! Source position tracking and code writing for the wolf compiler.
//!
//! Spans are byte offsets into the original component file. Line and column
//! are recovered on demand through [`LineIndex`], so AST nodes only carry the
//! two offsets.

use std::ops::Range;

/// A span in the source code, representing a half-open range [start, end).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    /// Start offset (inclusive)
    pub start: u32,
    /// End offset (exclusive)
    pub end: u32,
}

impl Span {
    /// Create a new span from start and end offsets.
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Create an empty span at the given offset.
    #[inline]
    pub const fn empty(offset: u32) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    /// Create a span from a range.
    #[inline]
    pub fn from_range(range: Range<usize>) -> Self {
        Self {
            start: range.start as u32,
            end: range.end as u32,
        }
    }

    #[inline]
    pub const fn len(&self) -> u32 {
        self.end - self.start
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Check if this span contains another span.
    #[inline]
    pub const fn contains(&self, other: Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Merge two spans into one that covers both.
    #[inline]
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Shift the span by `base` bytes. Used to turn section-relative offsets
    /// into file offsets.
    #[inline]
    pub const fn shifted(self, base: u32) -> Span {
        Span {
            start: self.start + base,
            end: self.end + base,
        }
    }

    /// Convert to a Range<usize>.
    #[inline]
    pub fn to_range(self) -> Range<usize> {
        self.start as usize..self.end as usize
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Self::from_range(range)
    }
}

impl From<Span> for Range<usize> {
    fn from(span: Span) -> Self {
        span.to_range()
    }
}

/// A line index for converting between byte offsets and line/column positions.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Byte offsets of the start of each line.
    line_starts: Vec<u32>,
    /// Total length of the source.
    len: u32,
}

impl LineIndex {
    /// Create a new line index from source text.
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, c) in text.char_indices() {
            if c == '\n' {
                line_starts.push((i + 1) as u32);
            }
        }
        Self {
            line_starts,
            len: text.len() as u32,
        }
    }

    /// Get the line and column for a byte offset.
    /// Line and column are 0-indexed.
    pub fn line_col(&self, offset: u32) -> LineCol {
        let offset = offset.min(self.len);
        let line = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        let line_start = self.line_starts[line];
        LineCol {
            line: line as u32,
            col: offset - line_start,
        }
    }

    /// Get the byte offset for a line and column.
    /// Returns None if the position is out of bounds.
    pub fn offset(&self, line_col: LineCol) -> Option<u32> {
        let line_start = self.line_starts.get(line_col.line as usize)?;
        let offset = line_start + line_col.col;
        if offset <= self.len {
            Some(offset)
        } else {
            None
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Get the start offset of a line.
    pub fn line_start(&self, line: u32) -> Option<u32> {
        self.line_starts.get(line as usize).copied()
    }
}

/// A line and column position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineCol {
    /// 0-indexed line number.
    pub line: u32,
    /// 0-indexed column (byte offset within line).
    pub col: u32,
}

impl LineCol {
    #[inline]
    pub const fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }

    /// Convert to 1-indexed for display.
    #[inline]
    pub const fn to_display(self) -> (u32, u32) {
        (self.line + 1, self.col + 1)
    }
}

const INDENT_UNIT: &str = "    ";

/// Line-oriented writer for generated code.
///
/// Every call to [`CodeWriter::line`] emits the current indentation, the text
/// and a newline; `open`/`close` bracket nested blocks.
#[derive(Debug, Default)]
pub struct CodeWriter {
    code: String,
    depth: usize,
}

impl CodeWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current nesting depth.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Append raw text without indentation.
    pub fn push_str(&mut self, code: &str) {
        self.code.push_str(code);
    }

    /// Write one indented line.
    pub fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if !text.is_empty() {
            for _ in 0..self.depth {
                self.code.push_str(INDENT_UNIT);
            }
            self.code.push_str(text);
        }
        self.code.push('\n');
    }

    /// Write a line and indent the following ones.
    pub fn open(&mut self, text: impl AsRef<str>) {
        self.line(text);
        self.depth += 1;
    }

    /// Dedent and write a closing line.
    pub fn close(&mut self, text: impl AsRef<str>) {
        self.depth = self.depth.saturating_sub(1);
        self.line(text);
    }

    pub fn indent(&mut self) {
        self.depth += 1;
    }

    pub fn dedent(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Append an empty line.
    pub fn newline(&mut self) {
        self.code.push('\n');
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn finish(self) -> String {
        self.code
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_span() {
        let span = Span::new(10, 20);
        assert_eq!(span.len(), 10);
        assert!(!span.is_empty());
        assert!(span.contains(Span::new(12, 18)));
        assert!(!span.contains(Span::new(5, 15)));
    }

    #[test]
    fn test_span_merge_and_shift() {
        let merged = Span::new(10, 20).merge(Span::new(15, 30));
        assert_eq!(merged, Span::new(10, 30));
        assert_eq!(Span::new(1, 4).shifted(100), Span::new(101, 104));
    }

    #[test]
    fn test_line_index() {
        let text = "hello\nworld\nfoo";
        let index = LineIndex::new(text);

        assert_eq!(index.line_count(), 3);
        assert_eq!(index.line_col(0), LineCol::new(0, 0));
        assert_eq!(index.line_col(5), LineCol::new(0, 5));
        assert_eq!(index.line_col(6), LineCol::new(1, 0));
        assert_eq!(index.line_col(11), LineCol::new(1, 5));
        assert_eq!(index.line_col(12), LineCol::new(2, 0));

        assert_eq!(index.offset(LineCol::new(1, 0)), Some(6));
        assert_eq!(index.offset(LineCol::new(2, 0)), Some(12));
        assert_eq!(index.offset(LineCol::new(7, 0)), None);
    }

    #[test]
    fn test_code_writer_blocks() {
        let mut writer = CodeWriter::new();
        writer.open("if (a) {");
        writer.line("b();");
        writer.close("}");
        writer.line("");
        assert_eq!(writer.finish(), "if (a) {\n    b();\n}\n\n");
    }
}
