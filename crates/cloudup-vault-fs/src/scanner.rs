//! Vault file discovery by filesystem walking.

use std::fs;
use std::path::Path;

use tracing::debug;

/// Walk `root` and return every file as a vault-relative `/`-separated path.
///
/// Hidden files and directories (leading `.`) are skipped, which keeps
/// application state directories out of the vault. Output is sorted.
pub(crate) fn scan(root: &Path) -> std::io::Result<Vec<String>> {
    let mut paths = Vec::new();
    scan_directory(root, "", &mut paths)?;
    paths.sort();
    Ok(paths)
}

fn scan_directory(dir: &Path, prefix: &str, paths: &mut Vec<String>) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let Ok(entry) = entry else {
            continue;
        };
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        let relative = if prefix.is_empty() {
            name
        } else {
            format!("{prefix}/{name}")
        };

        let is_dir = entry.file_type().is_ok_and(|t| t.is_dir());
        if is_dir {
            // Unreadable subdirectories are skipped rather than failing the listing.
            if let Err(err) = scan_directory(&entry.path(), &relative, paths) {
                debug!("Skipping {relative}: {err}");
            }
        } else {
            paths.push(relative);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_scan_nested_and_sorted() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("Notes/Sub")).unwrap();
        fs::write(dir.path().join("b.png"), "").unwrap();
        fs::write(dir.path().join("Notes/a.md"), "").unwrap();
        fs::write(dir.path().join("Notes/Sub/c.mp3"), "").unwrap();

        assert_eq!(
            scan(dir.path()).unwrap(),
            vec!["Notes/Sub/c.mp3", "Notes/a.md", "b.png"]
        );
    }

    #[test]
    fn test_scan_skips_hidden() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join(".obsidian")).unwrap();
        fs::write(dir.path().join(".obsidian/workspace.json"), "{}").unwrap();
        fs::write(dir.path().join(".hidden.png"), "").unwrap();
        fs::write(dir.path().join("shown.png"), "").unwrap();

        assert_eq!(scan(dir.path()).unwrap(), vec!["shown.png"]);
    }

    #[test]
    fn test_scan_missing_root_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(scan(&dir.path().join("missing")).is_err());
    }
}
