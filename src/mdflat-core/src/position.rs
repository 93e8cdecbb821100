//! Positions and ranges within the flattened output buffer.
//!
//! Both coordinates are 1-indexed: the first byte of the first output line
//! is `{ line: 1, character: 1 }`. Columns count UTF-8 **bytes**, not
//! characters; consumers address the flattened text by byte offset, so a
//! multi-byte codepoint advances the column by its encoded length.

use serde::{Deserialize, Serialize};

/// A single position in the flattened text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pos {
    /// 1-indexed line.
    pub line: usize,
    /// 1-indexed byte column within `line`.
    pub character: usize,
}

impl Pos {
    pub fn new(line: usize, character: usize) -> Self {
        Self { line, character }
    }

    /// This position moved by a merge delta.
    pub(crate) fn shifted(self, lines: usize, characters: usize) -> Self {
        Self {
            line: self.line + lines,
            character: self.character + characters,
        }
    }
}

/// A span of flattened text.
///
/// `end` is one past the last byte the span covers; the consuming layer
/// treats it as exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub start: Pos,
    pub end: Pos,
}

impl Range {
    pub fn new(start: Pos, end: Pos) -> Self {
        Self { start, end }
    }

    /// Both endpoints moved by a merge delta.
    pub(crate) fn shifted(self, lines: usize, characters: usize) -> Self {
        Self {
            start: self.start.shifted(lines, characters),
            end: self.end.shifted(lines, characters),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_moves_both_endpoints() {
        let range = Range::new(Pos::new(1, 3), Pos::new(2, 1));
        let shifted = range.shifted(4, 2);
        assert_eq!(shifted.start, Pos::new(5, 5));
        assert_eq!(shifted.end, Pos::new(6, 3));
    }

    #[test]
    fn serializes_as_line_character() {
        let pos = Pos::new(1, 7);
        let json = serde_json::to_string(&pos).unwrap();
        assert_eq!(json, r#"{"line":1,"character":7}"#);
    }
}
