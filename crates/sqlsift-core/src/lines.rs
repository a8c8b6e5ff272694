//! Mapping between editor positions and global offsets
//!
//! Tokens carry per-line positions. Anything that slices the source text
//! needs global offsets, which this line table reconstructs.

use crate::error::Position;

/// Line table over a source string
#[derive(Debug, Clone)]
pub struct EditorLines<'a> {
    source: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> EditorLines<'a> {
    pub fn new(source: &'a str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            source,
            line_starts,
        }
    }

    pub fn len(&self) -> usize {
        self.line_starts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    /// Text of line `index` without its newline
    pub fn line(&self, index: usize) -> Option<&'a str> {
        let start = *self.line_starts.get(index)?;
        let end = self
            .line_starts
            .get(index + 1)
            .map_or(self.source.len(), |next| next - 1);
        Some(&self.source[start..end])
    }

    /// Global byte offset of a position, clamped to the source
    pub fn offset(&self, position: Position) -> usize {
        match self.line(position.line) {
            Some(line) => self.line_starts[position.line] + position.ch.min(line.len()),
            None => self.source.len(),
        }
    }

    /// Position of a global byte offset
    pub fn position(&self, offset: usize) -> Position {
        let offset = offset.min(self.source.len());
        let line = self
            .line_starts
            .partition_point(|start| *start <= offset)
            .saturating_sub(1);
        Position::new(line, offset - self.line_starts[line])
    }

    /// Source text between two positions
    pub fn slice(&self, from: Position, to: Position) -> &'a str {
        let start = self.offset(from);
        let end = self.offset(to).max(start);
        &self.source[start..end]
    }

    /// Number of line breaks between two positions
    pub fn newlines_between(&self, from: Position, to: Position) -> usize {
        self.slice(from, to).matches('\n').count()
    }
}

/// Lines of an editor buffer
pub fn get_editor_lines(source: &str) -> Vec<&str> {
    source.split('\n').collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets_round_trip() {
        let lines = EditorLines::new("select a\nfrom t\n\nwhere x");
        assert_eq!(lines.len(), 4);
        assert_eq!(lines.line(1), Some("from t"));
        assert_eq!(lines.line(2), Some(""));
        assert_eq!(lines.offset(Position::new(1, 5)), 14);
        assert_eq!(lines.position(14), Position::new(1, 5));
        assert_eq!(lines.position(9), Position::new(1, 0));
    }

    #[test]
    fn test_slice_and_newlines() {
        let lines = EditorLines::new("a;\n\n\nb");
        let from = Position::new(0, 2);
        let to = Position::new(3, 0);
        assert_eq!(lines.slice(from, to), "\n\n\n");
        assert_eq!(lines.newlines_between(from, to), 3);
    }

    #[test]
    fn test_offset_is_clamped() {
        let lines = EditorLines::new("abc");
        assert_eq!(lines.offset(Position::new(0, 10)), 3);
        assert_eq!(lines.offset(Position::new(5, 0)), 3);
    }

    #[test]
    fn test_get_editor_lines() {
        assert_eq!(get_editor_lines("a\nb"), vec!["a", "b"]);
    }
}
