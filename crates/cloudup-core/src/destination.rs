//! Upload destination (folder and preset) resolution.
//!
//! Resolution order:
//!
//! 1. When overrides are enabled, the entry whose `note_folder` is the
//!    deepest ancestor-or-equal of the active note's folder wins. `/` is the
//!    vault root and matches every note. Equal depth can only happen with
//!    duplicate keys, which config validation rejects; first-listed wins.
//! 2. Otherwise the global preset and folder apply.
//! 3. With segregation enabled, the kind's subfolder is appended. Empty
//!    segments are skipped, so an empty root folder yields just the subfolder.
//! 4. An empty folder is reported as `None` so the field is omitted.

use cloudup_config::{Config, FolderOverride, normalize_folder};
use tracing::debug;

use crate::format::MediaKind;

/// Resolved upload target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    /// Remote folder. `None` means the field is not sent.
    pub folder: Option<String>,
    /// Upload preset.
    pub preset: String,
}

/// Resolve the destination for a file of `kind` pasted into a note living in `note_folder`.
#[must_use]
pub fn resolve(config: &Config, kind: MediaKind, note_folder: Option<&str>) -> Destination {
    let (preset, folder) = match note_folder.and_then(|f| matching_override(config, f)) {
        Some(entry) => {
            debug!(
                "Using folder override '{}' for note folder {:?}",
                entry.note_folder, note_folder
            );
            (entry.preset.as_str(), entry.folder.as_str())
        }
        None => (
            config.cloudinary.upload_preset.as_str(),
            config.cloudinary.folder.as_str(),
        ),
    };

    let subfolder = if config.subfolders.enabled {
        subfolder_for(config, kind)
    } else {
        ""
    };

    Destination {
        folder: join_folder(&[folder, subfolder]),
        preset: preset.to_owned(),
    }
}

/// Resolve the destination of a vault backup upload for the file at `vault_path`.
///
/// Backups use the global preset, no segregation and no overrides.
#[must_use]
pub fn resolve_backup(config: &Config, vault_path: &str) -> Destination {
    let parent = if config.backup.preserve_paths {
        vault_path.rsplit_once('/').map_or("", |(dir, _)| dir)
    } else {
        ""
    };

    Destination {
        folder: join_folder(&[&config.backup.folder, parent]),
        preset: config.cloudinary.upload_preset.clone(),
    }
}

fn subfolder_for(config: &Config, kind: MediaKind) -> &str {
    let subfolders = &config.subfolders;
    match kind {
        MediaKind::Image => &subfolders.image,
        MediaKind::Video => &subfolders.video,
        MediaKind::Audio => &subfolders.audio,
        MediaKind::Raw => &subfolders.raw,
    }
}

fn matching_override<'a>(config: &'a Config, note_folder: &str) -> Option<&'a FolderOverride> {
    if !config.overrides.enabled {
        return None;
    }
    let note_folder = normalize_folder(note_folder);

    let mut best: Option<(usize, &FolderOverride)> = None;
    for entry in &config.overrides.folders {
        // Blank entries are unset rows; the root must be written as "/".
        if entry.note_folder.trim().is_empty() {
            continue;
        }
        let key = normalize_folder(&entry.note_folder);
        let matches = key.is_empty()
            || note_folder == key
            || note_folder
                .strip_prefix(key)
                .is_some_and(|rest| rest.starts_with('/'));
        if !matches {
            continue;
        }
        let depth = if key.is_empty() {
            0
        } else {
            key.split('/').count()
        };
        if best.is_none_or(|(best_depth, _)| depth > best_depth) {
            best = Some((depth, entry));
        }
    }
    best.map(|(_, entry)| entry)
}

/// Join non-empty folder segments with `/`. `None` if nothing remains.
fn join_folder(segments: &[&str]) -> Option<String> {
    let joined = segments
        .iter()
        .map(|s| s.trim_matches('/'))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/");
    (!joined.is_empty()).then_some(joined)
}
