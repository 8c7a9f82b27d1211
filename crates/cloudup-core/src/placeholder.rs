//! Placeholder tokens marking in-flight uploads in the editor.
//!
//! A placeholder is inserted at the cursor when an upload starts and
//! replaced exactly once when it finishes. [`Placeholders`] remembers the
//! range each placeholder was inserted at and keeps the ranges valid across
//! replacements, so completion is a position lookup. If the text at the
//! remembered range no longer matches (the user edited around it), the first
//! literal occurrence of the full placeholder text is used instead.

use std::collections::HashMap;
use std::ops::Range;

use rand::RngExt;

use crate::error::UploadError;
use crate::host::Editor;

/// A unique marker for one in-flight upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    token: String,
}

impl Placeholder {
    /// Generate a fresh random token.
    #[must_use]
    pub fn generate() -> Self {
        Self {
            token: format!("cloudup-{:016x}", rand::rng().random::<u64>()),
        }
    }

    #[cfg(any(test, feature = "mock"))]
    #[must_use]
    pub fn with_token(token: &str) -> Self {
        Self {
            token: token.to_owned(),
        }
    }

    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Text replaced on completion.
    #[must_use]
    pub fn needle(&self) -> String {
        format!("![uploading...]({})", self.token)
    }

    /// Text inserted into the editor: the needle plus a newline.
    #[must_use]
    pub fn markup(&self) -> String {
        format!("{}\n", self.needle())
    }
}

/// Insertion ranges of outstanding placeholders.
#[derive(Debug, Default)]
pub struct Placeholders {
    ranges: HashMap<String, Range<usize>>,
}

impl Placeholders {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of placeholders not yet replaced.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.ranges.len()
    }

    /// Insert `placeholder` at the editor selection and remember where it went.
    pub fn insert(&mut self, editor: &mut impl Editor, placeholder: &Placeholder) {
        let inserted = editor.replace_selection(&placeholder.markup());
        let needle_range = inserted.start..inserted.start + placeholder.needle().len();
        self.shift_after(inserted.start, 0, inserted.len());
        self.ranges.insert(placeholder.token.clone(), needle_range);
    }

    /// Replace `placeholder` with `replacement`. Performs exactly one edit.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::Document`] if the placeholder is no longer in
    /// the editor; nothing is modified in that case.
    pub fn replace(
        &mut self,
        editor: &mut impl Editor,
        placeholder: &Placeholder,
        replacement: &str,
    ) -> Result<(), UploadError> {
        let needle = placeholder.needle();
        let remembered = self.ranges.remove(&placeholder.token);

        let range = remembered
            .filter(|r| editor.text().get(r.clone()) == Some(needle.as_str()))
            .or_else(|| {
                editor
                    .text()
                    .find(&needle)
                    .map(|start| start..start + needle.len())
            })
            .ok_or_else(|| {
                UploadError::Document(format!("placeholder {} not found", placeholder.token))
            })?;

        editor.replace_range(range.clone(), replacement);
        self.shift_after(range.start, range.len(), replacement.len());
        Ok(())
    }

    /// Adjust ranges starting at or after `at` for an edit that turned
    /// `removed` bytes into `inserted` bytes.
    fn shift_after(&mut self, at: usize, removed: usize, inserted: usize) {
        for range in self.ranges.values_mut() {
            if range.start >= at + removed {
                let start = range.start - removed + inserted;
                *range = start..start + range.len();
            }
        }
    }
}
