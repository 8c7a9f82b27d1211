//! On-disk vault for the cloudup upload pipeline.
//!
//! [`FsVault`] implements [`Vault`](cloudup_core::Vault) over a directory
//! and [`FileEditor`] implements [`Editor`](cloudup_core::Editor) over a
//! note loaded from it. Together they let the pipeline run outside a host
//! application.
//!
//! # Example
//!
//! ```ignore
//! use cloudup_core::Vault;
//! use cloudup_vault_fs::FsVault;
//!
//! let vault = FsVault::new("notes");
//! for file in vault.files()? {
//!     println!("{}", file.path);
//! }
//! ```

mod editor;
mod scanner;

use std::fs;
use std::path::{Component, Path, PathBuf};

use cloudup_core::{Vault, VaultError, VaultFile};
use tracing::debug;

pub use editor::FileEditor;

/// Vault rooted at a directory.
#[derive(Debug, Clone)]
pub struct FsVault {
    root: PathBuf,
}

impl FsVault {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Vault-relative `/`-separated path of `path`, if it lies inside the vault.
    #[must_use]
    pub fn relative(&self, path: &Path) -> Option<String> {
        let root = fs::canonicalize(&self.root).ok()?;
        let absolute = fs::canonicalize(path).ok()?;
        let relative = absolute.strip_prefix(root).ok()?;
        let parts: Vec<_> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        Some(parts.join("/"))
    }

    /// Absolute path for a vault path. Paths escaping the root are not found.
    fn full_path(&self, path: &str) -> Result<PathBuf, VaultError> {
        let relative = Path::new(path);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes || path.is_empty() {
            return Err(VaultError::NotFound(path.to_owned()));
        }
        Ok(self.root.join(relative))
    }

    fn is_file(&self, path: &str) -> bool {
        self.full_path(path).is_ok_and(|p| p.is_file())
    }
}

impl Vault for FsVault {
    fn files(&self) -> Result<Vec<VaultFile>, VaultError> {
        let paths = scanner::scan(&self.root)
            .map_err(|e| VaultError::io(self.root.display().to_string(), e))?;
        Ok(paths.into_iter().map(VaultFile::new).collect())
    }

    fn read(&self, path: &str) -> Result<Vec<u8>, VaultError> {
        fs::read(self.full_path(path)?).map_err(|e| VaultError::io(path, e))
    }

    fn read_note(&self, path: &str) -> Result<String, VaultError> {
        fs::read_to_string(self.full_path(path)?).map_err(|e| VaultError::io(path, e))
    }

    fn write_note(&self, path: &str, content: &str) -> Result<(), VaultError> {
        fs::write(self.full_path(path)?, content).map_err(|e| VaultError::io(path, e))
    }

    fn resolve_link(&self, target: &str, from_note: &str) -> Option<String> {
        let target = target.trim_start_matches('/');
        if self.is_file(target) {
            return Some(target.to_owned());
        }

        let folder = VaultFile::new(from_note).folder().to_owned();
        if !folder.is_empty() {
            let sibling = format!("{folder}/{target}");
            if self.is_file(&sibling) {
                return Some(sibling);
            }
        }

        // Shortest-form links only carry the file name.
        let name = target.rsplit('/').next().unwrap_or(target);
        let files = self.files().ok()?;
        let mut matches = files.into_iter().filter(|f| f.name() == name);
        match (matches.next(), matches.next()) {
            (Some(file), None) => Some(file.path),
            (Some(_), Some(_)) => {
                debug!("Link {target} in {from_note} is ambiguous");
                None
            }
            _ => None,
        }
    }

    fn mime(&self, path: &str) -> String {
        mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_owned()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn vault() -> (tempfile::TempDir, FsVault) {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("Notes/Media")).unwrap();
        fs::create_dir_all(dir.path().join("Other")).unwrap();
        fs::write(dir.path().join("Notes/a.md"), "![[cat.png]]").unwrap();
        fs::write(dir.path().join("Notes/cat.png"), "cat").unwrap();
        fs::write(dir.path().join("Notes/Media/song.mp3"), "song").unwrap();
        fs::write(dir.path().join("Notes/dup.png"), "1").unwrap();
        fs::write(dir.path().join("Other/dup.png"), "2").unwrap();
        let vault = FsVault::new(dir.path());
        (dir, vault)
    }

    #[test]
    fn test_files_lists_vault() {
        let (_dir, vault) = vault();
        let paths: Vec<_> = vault.files().unwrap().into_iter().map(|f| f.path).collect();
        assert_eq!(
            paths,
            vec![
                "Notes/Media/song.mp3",
                "Notes/a.md",
                "Notes/cat.png",
                "Notes/dup.png",
                "Other/dup.png",
            ]
        );
    }

    #[test]
    fn test_read_and_write_note() {
        let (_dir, vault) = vault();
        assert_eq!(vault.read_note("Notes/a.md").unwrap(), "![[cat.png]]");
        vault.write_note("Notes/a.md", "rewritten").unwrap();
        assert_eq!(vault.read_note("Notes/a.md").unwrap(), "rewritten");
        assert_eq!(vault.read("Notes/cat.png").unwrap(), b"cat");
    }

    #[test]
    fn test_read_missing_is_not_found() {
        let (_dir, vault) = vault();
        assert!(matches!(vault.read("nope.png"), Err(VaultError::NotFound(_))));
    }

    #[test]
    fn test_paths_escaping_root_are_rejected() {
        let (_dir, vault) = vault();
        assert!(matches!(vault.read("../secret"), Err(VaultError::NotFound(_))));
        assert!(matches!(vault.read("/etc/passwd"), Err(VaultError::NotFound(_))));
    }

    #[test]
    fn test_resolve_link_order() {
        let (_dir, vault) = vault();
        // Vault-relative
        assert_eq!(
            vault.resolve_link("Notes/cat.png", "Other/b.md").as_deref(),
            Some("Notes/cat.png")
        );
        // Relative to the note
        assert_eq!(
            vault.resolve_link("Media/song.mp3", "Notes/a.md").as_deref(),
            Some("Notes/Media/song.mp3")
        );
        // Unique file name
        assert_eq!(
            vault.resolve_link("song.mp3", "Other/b.md").as_deref(),
            Some("Notes/Media/song.mp3")
        );
        // Sibling wins over an ambiguous name
        assert_eq!(
            vault.resolve_link("dup.png", "Other/b.md").as_deref(),
            Some("Other/dup.png")
        );
        assert_eq!(vault.resolve_link("dup.png", "c.md"), None);
        assert_eq!(vault.resolve_link("missing.png", "Notes/a.md"), None);
    }

    #[test]
    fn test_mime_from_extension() {
        let (_dir, vault) = vault();
        assert_eq!(vault.mime("a/cat.PNG"), "image/png");
        assert_eq!(vault.mime("song.mp3"), "audio/mpeg");
        assert_eq!(vault.mime("clip.mp4"), "video/mp4");
        assert_eq!(vault.mime("blob.unknownext"), "application/octet-stream");
    }

    #[test]
    fn test_relative_path() {
        let (dir, vault) = vault();
        assert_eq!(
            vault.relative(&dir.path().join("Notes/a.md")).as_deref(),
            Some("Notes/a.md")
        );
        assert_eq!(vault.relative(Path::new("/")), None);
    }
}
