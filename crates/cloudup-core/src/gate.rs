//! Confirmation before bulk operations.

use cloudup_config::Config;
use tracing::info;

use crate::batch::BatchMode;
use crate::host::Confirm;

/// Title and body of the prompt shown before running `mode`.
#[must_use]
pub fn prompt(mode: &BatchMode) -> (&'static str, String) {
    match mode {
        BatchMode::BackupVault => (
            "Mass Asset Backup - Warning",
            "Every non-note file in the vault will be uploaded to your Cloudinary account. \
             Large vaults can take a long time and use a lot of storage quota. Continue?"
                .to_owned(),
        ),
        BatchMode::AllNotes => (
            "Vault Media Upload - Warning",
            "Local media embedded in every note will be uploaded and the notes rewritten to \
             point at the remote copies. Back up your vault first. Continue?"
                .to_owned(),
        ),
        BatchMode::CurrentNote(note) => (
            "Note Media Upload - Warning",
            format!(
                "Local media embedded in {} will be uploaded and the note rewritten to point \
                 at the remote copies. Continue?",
                note.path
            ),
        ),
    }
}

/// Whether the batch may run: skipped prompts pass, otherwise the user decides.
pub fn confirm_batch(config: &Config, confirm: &impl Confirm, mode: &BatchMode) -> bool {
    if config.confirm.skip {
        return true;
    }
    let (title, body) = prompt(mode);
    let accepted = confirm.confirm(title, &body);
    if !accepted {
        info!("{title}: cancelled by user");
    }
    accepted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::VaultFile;
    use crate::mock::FixedConfirm;

    #[test]
    fn test_prompt_is_shown_by_default() {
        let config = Config::default();
        let confirm = FixedConfirm::new(false);

        assert!(!confirm_batch(&config, &confirm, &BatchMode::BackupVault));
        assert_eq!(confirm.asked(), 1);
        assert_eq!(confirm.last_title().as_deref(), Some("Mass Asset Backup - Warning"));
    }

    #[test]
    fn test_accepted_prompt_passes() {
        let config = Config::default();
        let confirm = FixedConfirm::new(true);
        let mode = BatchMode::CurrentNote(VaultFile::new("a.md"));

        assert!(confirm_batch(&config, &confirm, &mode));
        assert_eq!(confirm.last_title().as_deref(), Some("Note Media Upload - Warning"));
    }

    #[test]
    fn test_skip_setting_bypasses_prompt() {
        let mut config = Config::default();
        config.confirm.skip = true;
        let confirm = FixedConfirm::new(false);

        assert!(confirm_batch(&config, &confirm, &BatchMode::AllNotes));
        assert_eq!(confirm.asked(), 0);
    }

    #[test]
    fn test_note_prompt_names_the_note() {
        let (_, body) = prompt(&BatchMode::CurrentNote(VaultFile::new("Notes/a.md")));
        assert!(body.contains("Notes/a.md"));
    }
}
