//! String-backed [`Editor`] with a single cursor.

use std::ops::Range;

use crate::host::Editor;

/// Note text plus one cursor.
///
/// The cursor starts at the end of the initial text and moves past every
/// inserted selection. Edits before the cursor shift it; edits spanning it
/// leave it at the end of the replacement.
#[derive(Debug, Default, Clone)]
pub struct TextBuffer {
    text: String,
    cursor: usize,
}

impl TextBuffer {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            cursor: text.len(),
            text,
        }
    }

    /// Move the cursor to byte offset `at`, clamped to the text.
    pub fn set_cursor(&mut self, at: usize) {
        self.cursor = at.min(self.text.len());
    }

    /// Move the cursor right after the first occurrence of `anchor`.
    ///
    /// Returns `false` and leaves the cursor alone if `anchor` is absent.
    pub fn place_cursor_after(&mut self, anchor: &str) -> bool {
        match self.text.find(anchor) {
            Some(start) => {
                self.cursor = start + anchor.len();
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

impl Editor for TextBuffer {
    fn text(&self) -> &str {
        &self.text
    }

    fn replace_selection(&mut self, text: &str) -> Range<usize> {
        let start = self.cursor;
        self.text.insert_str(start, text);
        self.cursor = start + text.len();
        start..self.cursor
    }

    fn replace_range(&mut self, range: Range<usize>, text: &str) {
        let (start, removed) = (range.start, range.len());
        self.text.replace_range(range, text);
        if self.cursor >= start + removed {
            self.cursor = self.cursor - removed + text.len();
        } else if self.cursor > start {
            self.cursor = start + text.len();
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_selection_appends_at_end() {
        let mut buffer = TextBuffer::new("# Title\n");
        assert_eq!(buffer.replace_selection("one\n"), 8..12);
        buffer.replace_selection("two\n");
        assert_eq!(buffer.text(), "# Title\none\ntwo\n");
    }

    #[test]
    fn test_edit_before_cursor_shifts_it() {
        let mut buffer = TextBuffer::new("abc");
        buffer.replace_range(0..1, "XYZ");
        assert_eq!(buffer.cursor(), 5);
        buffer.replace_selection("!");
        assert_eq!(buffer.text(), "XYZbc!");
    }

    #[test]
    fn test_edit_spanning_cursor_moves_it_to_replacement_end() {
        let mut buffer = TextBuffer::new("abcdef");
        buffer.set_cursor(3);
        buffer.replace_range(1..5, "-");
        assert_eq!(buffer.cursor(), 2);
        assert_eq!(buffer.text(), "a-f");
    }

    #[test]
    fn test_edit_after_cursor_leaves_it() {
        let mut buffer = TextBuffer::new("abcdef");
        buffer.set_cursor(1);
        buffer.replace_range(3..4, "XYZ");
        assert_eq!(buffer.cursor(), 1);
    }

    #[test]
    fn test_place_cursor_after_anchor() {
        let mut buffer = TextBuffer::new("# Title\n\nBody\n");
        assert!(buffer.place_cursor_after("# Title\n"));
        buffer.replace_selection("inserted\n");
        assert_eq!(buffer.text(), "# Title\ninserted\n\nBody\n");
        assert!(!buffer.place_cursor_after("missing"));
    }
}
