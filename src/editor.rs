//! The six editor operations generation needs, and an in-memory buffer
//! implementing them.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Zero-based line and character offset; `ch` counts chars, not bytes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Position {
    pub line: usize,
    pub ch: usize,
}

impl Position {
    pub const ZERO: Position = Position { line: 0, ch: 0 };

    pub fn new(line: usize, ch: usize) -> Self {
        Self { line, ch }
    }

    /// Where the cursor ends up after typing `text` at this position
    pub fn advance(self, text: &str) -> Position {
        match text.rfind('\n') {
            Some(last_newline) => Position {
                line: self.line + text.matches('\n').count(),
                ch: text[last_newline + 1..].chars().count(),
            },
            None => Position {
                line: self.line,
                ch: self.ch + text.chars().count(),
            },
        }
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.line
            .cmp(&other.line)
            .then_with(|| self.ch.cmp(&other.ch))
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.ch)
    }
}

impl FromStr for Position {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (line, ch) = s
            .split_once(':')
            .ok_or_else(|| format!("expected LINE:CH, got '{s}'"))?;
        let line = line
            .trim()
            .parse()
            .map_err(|_| format!("invalid line in '{s}'"))?;
        let ch = ch
            .trim()
            .parse()
            .map_err(|_| format!("invalid column in '{s}'"))?;
        Ok(Position { line, ch })
    }
}

/// Document access the generation flow depends on
pub trait Editor {
    fn get_value(&self) -> String;
    fn set_value(&mut self, value: &str);
    fn get_selection(&self) -> String;
    fn replace_selection(&mut self, replacement: &str);
    fn get_cursor(&self) -> Position;
    fn set_cursor(&mut self, pos: Position);
    fn replace_range(&mut self, replacement: &str, from: Position, to: Position);
}

/// Plain-text document with a single selection.
///
/// The cursor is the selection head; an empty selection has anchor == head.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    text: String,
    anchor: Position,
    head: Position,
}

impl TextBuffer {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            anchor: Position::ZERO,
            head: Position::ZERO,
        }
    }

    pub fn with_cursor(mut self, pos: Position) -> Self {
        self.set_cursor(pos);
        self
    }

    pub fn with_selection(mut self, from: Position, to: Position) -> Self {
        self.anchor = self.clamp(from);
        self.head = self.clamp(to);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    fn selection_range(&self) -> (usize, usize) {
        let a = self.offset(self.anchor);
        let b = self.offset(self.head);
        (a.min(b), a.max(b))
    }

    /// Byte offset of `pos`, clamped to the end of its line and of the text
    fn offset(&self, pos: Position) -> usize {
        let mut offset = 0;
        for (index, line) in self.text.split('\n').enumerate() {
            if index == pos.line {
                let within = line
                    .char_indices()
                    .nth(pos.ch)
                    .map(|(byte, _)| byte)
                    .unwrap_or(line.len());
                return offset + within;
            }
            offset += line.len() + 1;
        }
        self.text.len()
    }

    fn position_at(&self, offset: usize) -> Position {
        Position::ZERO.advance(&self.text[..offset])
    }

    fn clamp(&self, pos: Position) -> Position {
        self.position_at(self.offset(pos))
    }

    fn splice(&mut self, start: usize, end: usize, replacement: &str) {
        self.text.replace_range(start..end, replacement);
        self.anchor = self.clamp(self.anchor);
        self.head = self.clamp(self.head);
    }
}

impl Editor for TextBuffer {
    fn get_value(&self) -> String {
        self.text.clone()
    }

    fn set_value(&mut self, value: &str) {
        self.text = value.to_string();
        self.anchor = self.clamp(self.anchor);
        self.head = self.clamp(self.head);
    }

    fn get_selection(&self) -> String {
        let (start, end) = self.selection_range();
        self.text[start..end].to_string()
    }

    fn replace_selection(&mut self, replacement: &str) {
        let (start, end) = self.selection_range();
        let caret = self.position_at(start).advance(replacement);
        self.splice(start, end, replacement);
        self.set_cursor(caret);
    }

    fn get_cursor(&self) -> Position {
        self.head
    }

    fn set_cursor(&mut self, pos: Position) {
        let pos = self.clamp(pos);
        self.anchor = pos;
        self.head = pos;
    }

    fn replace_range(&mut self, replacement: &str, from: Position, to: Position) {
        let a = self.offset(from);
        let b = self.offset(to);
        self.splice(a.min(b), a.max(b), replacement);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_handles_newlines() {
        let start = Position::new(2, 4);
        assert_eq!(start.advance("abc"), Position::new(2, 7));
        assert_eq!(start.advance("ab\ncd\nxyz"), Position::new(4, 3));
        assert_eq!(start.advance("line\n"), Position::new(3, 0));
    }

    #[test]
    fn parses_line_and_column() {
        assert_eq!("3:14".parse::<Position>(), Ok(Position::new(3, 14)));
        assert!("3".parse::<Position>().is_err());
        assert!("a:b".parse::<Position>().is_err());
    }

    #[test]
    fn replace_selection_moves_cursor_after_insert() {
        let mut buffer =
            TextBuffer::new("Hello World").with_selection(Position::new(0, 6), Position::new(0, 11));
        assert_eq!(buffer.get_selection(), "World");

        buffer.replace_selection("WORLD");
        assert_eq!(buffer.text(), "Hello WORLD");
        assert_eq!(buffer.get_cursor(), Position::new(0, 11));
        assert_eq!(buffer.get_selection(), "");
    }

    #[test]
    fn backwards_selection_is_normalized() {
        let buffer =
            TextBuffer::new("one\ntwo").with_selection(Position::new(1, 3), Position::new(0, 1));
        assert_eq!(buffer.get_selection(), "ne\ntwo");
    }

    #[test]
    fn replace_range_inserts_at_point() {
        let mut buffer = TextBuffer::new("ab\ncd").with_cursor(Position::new(1, 1));
        let at = buffer.get_cursor();
        buffer.replace_range("XY", at, at);
        assert_eq!(buffer.text(), "ab\ncXYd");
    }

    #[test]
    fn positions_count_chars_not_bytes() {
        let mut buffer = TextBuffer::new("héllo").with_cursor(Position::new(0, 2));
        let at = buffer.get_cursor();
        buffer.replace_range("_", at, at);
        assert_eq!(buffer.text(), "hé_llo");
    }

    #[test]
    fn cursor_is_clamped_to_text() {
        let mut buffer = TextBuffer::new("short\nline");
        buffer.set_cursor(Position::new(9, 9));
        assert_eq!(buffer.get_cursor(), Position::new(1, 4));

        buffer.set_value("");
        assert_eq!(buffer.get_cursor(), Position::ZERO);
    }
}
