//! Capabilities the host application provides to the pipeline.
//!
//! All positions are byte offsets into the editor text.

use std::ops::Range;

use crate::error::VaultError;

/// Live text buffer of the active note.
pub trait Editor {
    /// Full current text.
    fn text(&self) -> &str;

    /// Replace the current selection (or insert at the cursor) and return
    /// the range the inserted text now occupies.
    fn replace_selection(&mut self, text: &str) -> Range<usize>;

    /// Replace `range` with `text`.
    fn replace_range(&mut self, range: Range<usize>, text: &str);
}

/// A file in the vault, identified by its vault-relative path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultFile {
    /// Path relative to the vault root, `/`-separated.
    pub path: String,
}

impl VaultFile {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// File name without directories.
    #[must_use]
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// Containing folder, `""` for the vault root.
    #[must_use]
    pub fn folder(&self) -> &str {
        self.path.rsplit_once('/').map_or("", |(dir, _)| dir)
    }

    /// Whether this is a markdown note.
    #[must_use]
    pub fn is_note(&self) -> bool {
        self.name()
            .rsplit_once('.')
            .is_some_and(|(_, ext)| ext.eq_ignore_ascii_case("md"))
    }
}

/// Vault file-system access.
pub trait Vault {
    /// Every file in the vault, in a stable order.
    fn files(&self) -> Result<Vec<VaultFile>, VaultError>;

    /// Read file bytes.
    fn read(&self, path: &str) -> Result<Vec<u8>, VaultError>;

    /// Read the latest text of a note.
    fn read_note(&self, path: &str) -> Result<String, VaultError>;

    /// Replace the text of a note.
    fn write_note(&self, path: &str, content: &str) -> Result<(), VaultError>;

    /// Resolve an embed link target written in `from_note` to a vault path.
    fn resolve_link(&self, target: &str, from_note: &str) -> Option<String>;

    /// MIME type for a vault path.
    fn mime(&self, path: &str) -> String;
}

/// Severity of a user notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A message surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

/// User notification surface.
pub trait Notifier {
    /// Show a terminal notice.
    fn notice(&self, notice: Notice);

    /// Set (`Some`) or clear (`None`) the transient status indicator.
    fn status(&self, message: Option<&str>);
}

/// Explicit yes/no confirmation.
pub trait Confirm {
    /// Ask the user; `true` means proceed.
    fn confirm(&self, title: &str, body: &str) -> bool;
}
