use super::position::SourcePosition;

/// Maps byte offsets to line/column positions.
///
/// Built once per text; lookups are a binary search over line starts.
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    text: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub fn new(text: &'a str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            text.bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self { text, line_starts }
    }

    /// Position of `offset`. Offsets past the end clamp to the end of text;
    /// offsets inside a multi-byte character clamp to its start.
    pub fn position(&self, offset: usize) -> SourcePosition {
        let mut offset = offset.min(self.text.len());
        while !self.text.is_char_boundary(offset) {
            offset -= 1;
        }
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let line_start = self.line_starts[line];
        let column = self.text[line_start..offset].chars().count() + 1;
        SourcePosition::new(line as u32 + 1, column as u32, offset)
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}
