/// Position tracking for AST nodes and diagnostics.
///
/// Lines and columns are 1-based (columns count characters, not bytes);
/// offsets are 0-based byte indices into the source text.
use serde::Serialize;

/// A single location in source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SourcePosition {
    pub line: u32,
    pub column: u32,
    pub offset: usize,
}

/// A half-open range `[start, end)` in source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SourceRange {
    pub start: SourcePosition,
    pub end: SourcePosition,
}

impl SourcePosition {
    /// The position of the first character of any file.
    pub const START: SourcePosition = SourcePosition {
        line: 1,
        column: 1,
        offset: 0,
    };

    pub fn new(line: u32, column: u32, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }

    /// Step over `text`, which must be the source slice starting at this position.
    pub fn advance(self, text: &str) -> Self {
        let mut pos = self;
        for ch in text.chars() {
            pos.offset += ch.len_utf8();
            if ch == '\n' {
                pos.line += 1;
                pos.column = 1;
            } else {
                pos.column += 1;
            }
        }
        pos
    }
}

impl Default for SourcePosition {
    fn default() -> Self {
        Self::START
    }
}

impl SourceRange {
    pub fn new(start: SourcePosition, end: SourcePosition) -> Self {
        Self { start, end }
    }

    /// Zero-width range at `pos`.
    pub fn empty(pos: SourcePosition) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// Byte length of the range.
    pub fn len(&self) -> usize {
        self.end.offset - self.start.offset
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check if a byte offset falls within this range
    pub fn contains_offset(&self, offset: usize) -> bool {
        offset >= self.start.offset && offset < self.end.offset
    }
}

impl std::fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
