//! Editor buffer over a note file.

use std::ops::Range;

use cloudup_core::{Editor, TextBuffer, Vault, VaultError};

/// In-memory copy of a note with a single cursor, written back on [`save`](Self::save).
#[derive(Debug)]
pub struct FileEditor {
    path: String,
    buffer: TextBuffer,
}

impl FileEditor {
    /// Load `path` from `vault` with the cursor at the end of the note.
    pub fn open(vault: &impl Vault, path: &str) -> Result<Self, VaultError> {
        Ok(Self {
            path: path.to_owned(),
            buffer: TextBuffer::new(vault.read_note(path)?),
        })
    }

    /// Move the cursor right after the first occurrence of `anchor`.
    ///
    /// Returns `false` and leaves the cursor alone if `anchor` is absent.
    pub fn place_cursor_after(&mut self, anchor: &str) -> bool {
        self.buffer.place_cursor_after(anchor)
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Write the buffer back to the note.
    pub fn save(&self, vault: &impl Vault) -> Result<(), VaultError> {
        vault.write_note(&self.path, self.buffer.text())
    }
}

impl Editor for FileEditor {
    fn text(&self) -> &str {
        self.buffer.text()
    }

    fn replace_selection(&mut self, text: &str) -> Range<usize> {
        self.buffer.replace_selection(text)
    }

    fn replace_range(&mut self, range: Range<usize>, text: &str) {
        self.buffer.replace_range(range, text);
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::FsVault;

    #[test]
    fn test_insert_at_end_and_save() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.md"), "# Title\n").unwrap();
        let vault = FsVault::new(dir.path());

        let mut editor = FileEditor::open(&vault, "a.md").unwrap();
        let range = editor.replace_selection("one\n");
        assert_eq!(range, 8..12);
        editor.replace_selection("two\n");
        editor.save(&vault).unwrap();

        assert_eq!(
            fs::read_to_string(dir.path().join("a.md")).unwrap(),
            "# Title\none\ntwo\n"
        );
    }

    #[test]
    fn test_place_cursor_after_anchor() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.md"), "# Title\n\nBody\n").unwrap();
        let vault = FsVault::new(dir.path());

        let mut editor = FileEditor::open(&vault, "a.md").unwrap();
        assert!(editor.place_cursor_after("# Title\n"));
        editor.replace_selection("inserted\n");
        assert_eq!(editor.text(), "# Title\ninserted\n\nBody\n");

        assert!(!editor.place_cursor_after("missing"));
    }

    #[test]
    fn test_open_missing_note() {
        let dir = tempfile::tempdir().unwrap();
        let vault = FsVault::new(dir.path());
        assert!(matches!(
            FileEditor::open(&vault, "nope.md"),
            Err(VaultError::NotFound(_))
        ));
    }
}
