//! Batch orchestration over vault files.
//!
//! A batch runs single-file tasks one after another. A failing task never
//! aborts the batch; its error is collected and the next file is attempted.
//! The batch ends with exactly one consolidated notice.

use tracing::{debug, info, warn};

use crate::destination::{self, Destination};
use crate::embed::{Embed, find_embeds};
use crate::error::UploadError;
use crate::format::{MediaSource, classify};
use crate::host::{Notice, NoticeLevel, Notifier, Vault, VaultFile};
use crate::task::Pipeline;
use crate::uploader::Uploader;

/// Which files a batch covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchMode {
    /// Every non-note file in the vault, uploaded as a backup.
    BackupVault,
    /// Local embeds of every note in the vault.
    AllNotes,
    /// Local embeds of one note.
    CurrentNote(VaultFile),
}

impl BatchMode {
    fn label(&self) -> &'static str {
        match self {
            Self::BackupVault => "Vault backup",
            Self::AllNotes => "Vault upload",
            Self::CurrentNote(_) => "Note upload",
        }
    }
}

/// One unit of work in a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchItem {
    /// Upload a vault file to the backup destination.
    Backup(VaultFile),
    /// Upload an embedded file and rewrite the embed in its note.
    Embed { note: VaultFile, embed: Embed },
}

impl BatchItem {
    /// Short description for logs and dry runs.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Backup(file) => file.path.clone(),
            Self::Embed { note, embed } => format!("{} ({})", embed.target, note.path),
        }
    }
}

/// Work discovered for a batch. Notes that could not be read are failures
/// of the batch, not reasons to stop planning.
#[derive(Debug, Default)]
pub struct BatchPlan {
    pub items: Vec<BatchItem>,
    pub failures: Vec<String>,
}

/// Per-file results of a batch or a multi-file event.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    successes: Vec<String>,
    failures: Vec<String>,
}

/// Classification of a finished batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchSummary {
    Nothing,
    AllSucceeded(usize),
    Partial { succeeded: usize, failed: usize },
    Failed(usize),
}

impl BatchOutcome {
    pub fn record_success(&mut self, message: String) {
        self.successes.push(message);
    }

    pub fn record_failure(&mut self, message: String) {
        self.failures.push(message);
    }

    #[must_use]
    pub fn successes(&self) -> &[String] {
        &self.successes
    }

    #[must_use]
    pub fn failures(&self) -> &[String] {
        &self.failures
    }

    #[must_use]
    pub fn summary(&self) -> BatchSummary {
        match (self.successes.len(), self.failures.len()) {
            (0, 0) => BatchSummary::Nothing,
            (succeeded, 0) => BatchSummary::AllSucceeded(succeeded),
            (0, failed) => BatchSummary::Failed(failed),
            (succeeded, failed) => BatchSummary::Partial { succeeded, failed },
        }
    }
}

/// Runs batches against a vault.
pub struct Orchestrator<'a, U, N, V> {
    pipeline: &'a Pipeline<'a, U, N>,
    vault: &'a V,
}

impl<'a, U: Uploader, N: Notifier, V: Vault> Orchestrator<'a, U, N, V> {
    #[must_use]
    pub fn new(pipeline: &'a Pipeline<'a, U, N>, vault: &'a V) -> Self {
        Self { pipeline, vault }
    }

    /// Discover the work for `mode` without uploading anything.
    pub fn plan(&self, mode: &BatchMode) -> Result<BatchPlan, UploadError> {
        let mut plan = BatchPlan::default();
        match mode {
            BatchMode::BackupVault => {
                plan.items = self
                    .vault
                    .files()?
                    .into_iter()
                    .filter(|file| !file.is_note())
                    .map(BatchItem::Backup)
                    .collect();
            }
            BatchMode::AllNotes => {
                for note in self.vault.files()?.into_iter().filter(VaultFile::is_note) {
                    self.plan_note(note, &mut plan);
                }
            }
            BatchMode::CurrentNote(note) => self.plan_note(note.clone(), &mut plan),
        }
        debug!(
            "Planned {} uploads ({} planning failures)",
            plan.items.len(),
            plan.failures.len()
        );
        Ok(plan)
    }

    fn plan_note(&self, note: VaultFile, plan: &mut BatchPlan) {
        let text = match self.vault.read_note(&note.path) {
            Ok(text) => text,
            Err(err) => {
                warn!("Could not read {}: {err}", note.path);
                plan.failures.push(format!("{}: {err}", note.path));
                return;
            }
        };
        for embed in find_embeds(&text) {
            let kind = classify(MediaSource::Remote(&embed.target));
            if !self.pipeline.kind_enabled(kind) {
                debug!("Skipping {} in {}: {kind} uploads are disabled", embed.target, note.path);
                continue;
            }
            plan.items.push(BatchItem::Embed {
                note: note.clone(),
                embed,
            });
        }
    }

    /// Where `item` would be uploaded. `None` if its embed does not resolve.
    #[must_use]
    pub fn destination(&self, item: &BatchItem) -> Option<Destination> {
        let config = self.pipeline.config();
        match item {
            BatchItem::Backup(file) => Some(destination::resolve_backup(config, &file.path)),
            BatchItem::Embed { note, embed } => {
                let path = self.vault.resolve_link(&embed.target, &note.path)?;
                let kind = classify(MediaSource::Remote(&path));
                Some(destination::resolve(config, kind, Some(note.folder())))
            }
        }
    }

    /// Run the batch for `mode` and emit its consolidated notice.
    ///
    /// Only missing configuration or an unreadable vault listing fail the
    /// whole run; per-file errors end up in the outcome.
    pub fn run(&self, mode: &BatchMode) -> Result<BatchOutcome, UploadError> {
        if let Err(err) = self.pipeline.check_ready() {
            self.notice(NoticeLevel::Error, format!("{err}. {}", err.guidance()));
            return Err(err);
        }
        let plan = self.plan(mode)?;

        let mut outcome = BatchOutcome::default();
        for failure in plan.failures {
            outcome.record_failure(failure);
        }
        for item in &plan.items {
            let result = match item {
                BatchItem::Backup(file) => self.pipeline.backup_file(self.vault, file),
                BatchItem::Embed { note, embed } => {
                    self.pipeline.upload_embed(self.vault, note, embed)
                }
            };
            match result {
                Ok(message) => {
                    info!("{message}");
                    outcome.record_success(message);
                }
                Err(err) => outcome.record_failure(format!("{}: {err}", item.describe())),
            }
        }

        self.report(mode, &outcome);
        Ok(outcome)
    }

    fn report(&self, mode: &BatchMode, outcome: &BatchOutcome) {
        let label = mode.label();
        for failure in outcome.failures() {
            warn!("{label}: {failure}");
        }
        match outcome.summary() {
            BatchSummary::Nothing => {
                self.notice(NoticeLevel::Info, format!("{label}: no local media to upload."));
            }
            BatchSummary::AllSucceeded(count) => self.notice(
                NoticeLevel::Success,
                format!("{label}: {count} uploads completed. No errors to report."),
            ),
            BatchSummary::Partial { succeeded, failed } => {
                self.notice(
                    NoticeLevel::Warning,
                    format!(
                        "{label}: {failed} of {} uploads failed. See the log for details.",
                        succeeded + failed
                    ),
                );
            }
            BatchSummary::Failed(count) => self.notice(
                NoticeLevel::Error,
                format!("{label}: all {count} uploads failed. Please check your settings and retry."),
            ),
        }
    }

    fn notice(&self, level: NoticeLevel, message: String) {
        self.pipeline.notifier().notice(Notice::new(level, message));
    }
}

#[cfg(test)]
mod tests {
    use cloudup_config::Config;
    use pretty_assertions::assert_eq;
    use tracing_test::traced_test;

    use super::*;
    use crate::mock::{MockVault, RecordingNotifier, ScriptedUploader};

    fn config() -> Config {
        let mut config = Config::default();
        config.cloudinary.cloud_name = "demo".to_owned();
        config.cloudinary.upload_preset = "unsigned".to_owned();
        config
    }

    fn three_file_vault() -> MockVault {
        MockVault::new()
            .with_file("a.png", b"a")
            .with_file("b.png", b"b")
            .with_file("c.png", b"c")
            .with_note("Index.md", "![[a.png]]")
    }

    #[test]
    fn test_failure_does_not_abort_batch() {
        let config = config();
        let uploader = ScriptedUploader::new().fail_with_status("b.png", 500);
        let notifier = RecordingNotifier::new();
        let pipeline = Pipeline::new(&config, &uploader, &notifier);
        let vault = three_file_vault();

        let outcome = Orchestrator::new(&pipeline, &vault)
            .run(&BatchMode::BackupVault)
            .unwrap();

        let names: Vec<_> = uploader.calls().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["a.png", "b.png", "c.png"]);
        assert_eq!(outcome.successes().len(), 2);
        assert_eq!(outcome.failures().len(), 1);
        assert!(outcome.failures()[0].starts_with("b.png: "));
        assert_eq!(outcome.summary(), BatchSummary::Partial { succeeded: 2, failed: 1 });

        let notices = notifier.notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Warning);
        assert_eq!(notices[0].message, "Vault backup: 1 of 3 uploads failed. See the log for details.");
    }

    #[test]
    fn test_all_success_notice() {
        let config = config();
        let uploader = ScriptedUploader::new();
        let notifier = RecordingNotifier::new();
        let pipeline = Pipeline::new(&config, &uploader, &notifier);
        let vault = three_file_vault();

        Orchestrator::new(&pipeline, &vault)
            .run(&BatchMode::BackupVault)
            .unwrap();

        let notices = notifier.notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Success);
        assert!(notices[0].message.contains("No errors"));
    }

    #[test]
    fn test_total_failure_suggests_retry() {
        let config = config();
        let uploader = ScriptedUploader::new().time_out("a.png").time_out("b.png");
        let notifier = RecordingNotifier::new();
        let pipeline = Pipeline::new(&config, &uploader, &notifier);
        let vault = MockVault::new().with_file("a.png", b"a").with_file("b.png", b"b");

        let outcome = Orchestrator::new(&pipeline, &vault)
            .run(&BatchMode::BackupVault)
            .unwrap();

        assert_eq!(outcome.summary(), BatchSummary::Failed(2));
        let notices = notifier.notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Error);
        assert!(notices[0].message.contains("retry"));
    }

    #[test]
    #[traced_test]
    fn test_total_failure_logs_each_file() {
        let config = config();
        let uploader = ScriptedUploader::new();
        let notifier = RecordingNotifier::new();
        let pipeline = Pipeline::new(&config, &uploader, &notifier);
        let vault = MockVault::new().with_note("a.md", "![[gone.png]]");

        let outcome = Orchestrator::new(&pipeline, &vault)
            .run(&BatchMode::CurrentNote(VaultFile::new("a.md")))
            .unwrap();

        assert_eq!(outcome.summary(), BatchSummary::Failed(1));
        assert_eq!(outcome.failures(), ["gone.png (a.md): not found: gone.png"]);
        assert!(logs_contain("Note upload: gone.png (a.md): not found: gone.png"));
        assert!(uploader.calls().is_empty());
    }

    #[test]
    fn test_missing_configuration_aborts_before_uploads() {
        let config = Config::default();
        let uploader = ScriptedUploader::new();
        let notifier = RecordingNotifier::new();
        let pipeline = Pipeline::new(&config, &uploader, &notifier);
        let vault = three_file_vault();

        let err = Orchestrator::new(&pipeline, &vault)
            .run(&BatchMode::BackupVault)
            .unwrap_err();

        assert!(matches!(err, UploadError::Configuration(_)));
        assert!(uploader.calls().is_empty());
        assert_eq!(notifier.notices().len(), 1);
    }

    #[test]
    fn test_all_notes_rewrites_each_note() {
        let config = config();
        let uploader = ScriptedUploader::new();
        let notifier = RecordingNotifier::new();
        let pipeline = Pipeline::new(&config, &uploader, &notifier);
        let vault = MockVault::new()
            .with_note("A/one.md", "![[cat.png]] ![[cat.png|200]]")
            .with_note("B/two.md", "![[B/dog.png]] ![[clip.mp4]] ![[Other note]]")
            .with_file("A/cat.png", b"cat")
            .with_file("B/dog.png", b"dog")
            .with_file("B/clip.mp4", b"clip");

        let outcome = Orchestrator::new(&pipeline, &vault)
            .run(&BatchMode::AllNotes)
            .unwrap();

        // Video uploads are disabled by default, so the clip stays local.
        assert_eq!(outcome.summary(), BatchSummary::AllSucceeded(3));
        assert_eq!(
            vault.note("A/one.md"),
            "![](https://res.example.com/demo/image/upload/cat.png) ![](https://res.example.com/demo/image/upload/cat.png)"
        );
        assert_eq!(
            vault.note("B/two.md"),
            "![](https://res.example.com/demo/image/upload/dog.png) ![[clip.mp4]] ![[Other note]]"
        );
    }

    #[test]
    fn test_current_note_unreadable_is_a_failure() {
        let config = config();
        let uploader = ScriptedUploader::new();
        let notifier = RecordingNotifier::new();
        let pipeline = Pipeline::new(&config, &uploader, &notifier);
        let vault = MockVault::new()
            .with_note("a.md", "![[x.png]]")
            .with_unreadable("a.md");

        let outcome = Orchestrator::new(&pipeline, &vault)
            .run(&BatchMode::CurrentNote(VaultFile::new("a.md")))
            .unwrap();

        assert_eq!(outcome.summary(), BatchSummary::Failed(1));
        assert!(uploader.calls().is_empty());
    }

    #[test]
    fn test_empty_batch_reports_nothing_to_do() {
        let config = config();
        let uploader = ScriptedUploader::new();
        let notifier = RecordingNotifier::new();
        let pipeline = Pipeline::new(&config, &uploader, &notifier);
        let vault = MockVault::new().with_note("a.md", "no embeds");

        let outcome = Orchestrator::new(&pipeline, &vault)
            .run(&BatchMode::CurrentNote(VaultFile::new("a.md")))
            .unwrap();

        assert_eq!(outcome.summary(), BatchSummary::Nothing);
        assert_eq!(notifier.notices()[0].level, NoticeLevel::Info);
    }

    #[test]
    fn test_plan_lists_work_without_uploading() {
        let config = config();
        let uploader = ScriptedUploader::new();
        let notifier = RecordingNotifier::new();
        let pipeline = Pipeline::new(&config, &uploader, &notifier);
        let vault = three_file_vault();

        let plan = Orchestrator::new(&pipeline, &vault)
            .plan(&BatchMode::BackupVault)
            .unwrap();

        let described: Vec<_> = plan.items.iter().map(BatchItem::describe).collect();
        assert_eq!(described, vec!["a.png", "b.png", "c.png"]);
        assert_eq!(
            Orchestrator::new(&pipeline, &vault).destination(&plan.items[0]),
            Some(Destination {
                folder: None,
                preset: "unsigned".to_owned(),
            })
        );
        assert!(uploader.calls().is_empty());
        assert!(notifier.notices().is_empty());
    }
}
