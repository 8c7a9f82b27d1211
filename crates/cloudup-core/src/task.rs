//! Single-file upload task.
//!
//! Each task makes exactly one remote call and at most one document
//! mutation. In the editor flow the steps are strictly ordered:
//! placeholder insertion, upload, URL rewrite, placeholder replacement.

use cloudup_config::Config;
use tracing::{debug, info, warn};

use crate::batch::BatchOutcome;
use crate::destination::{self, Destination};
use crate::embed::Embed;
use crate::error::{UploadError, VaultError};
use crate::format::{MediaKind, MediaSource, classify};
use crate::host::{Editor, Notice, NoticeLevel, Notifier, Vault, VaultFile};
use crate::markup::{local_link, markup};
use crate::placeholder::{Placeholder, Placeholders};
use crate::transform::transform_for;
use crate::uploader::{RemoteAsset, UploadRequest, Uploader};

/// Host event that delivered files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Paste,
    Drop,
}

/// A file blob carried by a paste or drop event.
#[derive(Debug, Clone)]
pub struct PastedFile {
    pub name: String,
    pub mime: String,
    pub data: Vec<u8>,
}

/// What the host should do with the event after the pipeline saw it.
#[derive(Debug)]
pub enum EventDisposition {
    /// Let the host's default paste/drop handling run.
    Default,
    /// Default handling was suppressed; per-file results.
    Handled(BatchOutcome),
}

/// Lifecycle of one editor upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Pending,
    PlaceholderInserted,
    Uploading,
    Succeeded,
    Failed,
}

struct TaskProgress<'a> {
    name: &'a str,
    state: TaskState,
}

impl<'a> TaskProgress<'a> {
    fn new(name: &'a str) -> Self {
        Self {
            name,
            state: TaskState::Pending,
        }
    }

    fn advance(&mut self, next: TaskState) {
        debug!("{}: {:?} -> {:?}", self.name, self.state, next);
        self.state = next;
    }
}

/// The upload pipeline bound to one configuration snapshot.
pub struct Pipeline<'a, U, N> {
    config: &'a Config,
    uploader: &'a U,
    notifier: &'a N,
}

impl<'a, U: Uploader, N: Notifier> Pipeline<'a, U, N> {
    #[must_use]
    pub fn new(config: &'a Config, uploader: &'a U, notifier: &'a N) -> Self {
        Self {
            config,
            uploader,
            notifier,
        }
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        self.config
    }

    pub(crate) fn notifier(&self) -> &N {
        self.notifier
    }

    /// Fail before any network call if the account settings are missing.
    pub fn check_ready(&self) -> Result<(), UploadError> {
        let cloud = &self.config.cloudinary;
        if cloud.cloud_name.trim().is_empty() {
            return Err(UploadError::Configuration("cloud name is not set".to_owned()));
        }
        if cloud.upload_preset.trim().is_empty() {
            return Err(UploadError::Configuration(
                "upload preset is not set".to_owned(),
            ));
        }
        Ok(())
    }

    /// Whether files of `kind` should be uploaded.
    #[must_use]
    pub fn kind_enabled(&self, kind: MediaKind) -> bool {
        let content = &self.config.content;
        match kind {
            MediaKind::Image => content.image,
            MediaKind::Audio => content.audio,
            MediaKind::Video => content.video,
            MediaKind::Raw => content.raw,
        }
    }

    fn trigger_enabled(&self, trigger: Trigger) -> bool {
        match trigger {
            Trigger::Paste => self.config.triggers.clipboard,
            Trigger::Drop => self.config.triggers.drop,
        }
    }

    /// Handle a paste or drop event carrying `files`.
    ///
    /// When no file qualifies the event is left to the host. Otherwise each
    /// qualifying file is uploaded in order and every other file is inserted
    /// as a plain local link.
    pub fn handle_event(
        &self,
        trigger: Trigger,
        files: &[PastedFile],
        editor: &mut impl Editor,
        placeholders: &mut Placeholders,
        note_folder: Option<&str>,
    ) -> EventDisposition {
        if !self.trigger_enabled(trigger) {
            return EventDisposition::Default;
        }
        let qualifies = |file: &PastedFile| {
            self.kind_enabled(classify(MediaSource::Local { mime: &file.mime }))
        };
        if !files.iter().any(qualifies) {
            return EventDisposition::Default;
        }
        if let Err(err) = self.check_ready() {
            self.notify_failure(None, &err);
            return EventDisposition::Default;
        }

        let mut outcome = BatchOutcome::default();
        for file in files {
            if !qualifies(file) {
                editor.replace_selection(&local_link(&file.name));
                continue;
            }
            match self.upload_to_editor(file, editor, placeholders, note_folder) {
                Ok(message) => outcome.record_success(message),
                Err(err) => {
                    self.notify_failure(Some(&file.name), &err);
                    outcome.record_failure(format!("{}: {err}", file.name));
                }
            }
        }
        EventDisposition::Handled(outcome)
    }

    /// Upload one pasted file into the editor at the current selection.
    ///
    /// On failure the placeholder is replaced with a plain local link.
    pub fn upload_to_editor(
        &self,
        file: &PastedFile,
        editor: &mut impl Editor,
        placeholders: &mut Placeholders,
        note_folder: Option<&str>,
    ) -> Result<String, UploadError> {
        let mut progress = TaskProgress::new(&file.name);
        let kind = classify(MediaSource::Local { mime: &file.mime });
        let destination = destination::resolve(self.config, kind, note_folder);

        let placeholder = Placeholder::generate();
        placeholders.insert(editor, &placeholder);
        progress.advance(TaskState::PlaceholderInserted);

        progress.advance(TaskState::Uploading);
        let result = self.send(&file.name, &file.data, &file.mime, &destination, kind);

        let err = match result {
            Ok(asset) => {
                let url = transform_for(self.config, kind, &asset.secure_url);
                let replacement = markup(markup_kind(kind, asset.kind), &url);
                match placeholders.replace(editor, &placeholder, &replacement) {
                    Ok(()) => {
                        progress.advance(TaskState::Succeeded);
                        return Ok(format!("{} uploaded to {url}", file.name));
                    }
                    Err(err) => err,
                }
            }
            Err(err) => {
                let fallback = local_link(&file.name);
                if let Err(replace_err) =
                    placeholders.replace(editor, &placeholder, fallback.trim_end())
                {
                    warn!("{}: could not restore local link: {replace_err}", file.name);
                }
                err
            }
        };
        progress.advance(TaskState::Failed);
        Err(err)
    }

    /// Upload the file behind `embed` and rewrite it in `note`.
    pub fn upload_embed(
        &self,
        vault: &impl Vault,
        note: &VaultFile,
        embed: &Embed,
    ) -> Result<String, UploadError> {
        let path = vault
            .resolve_link(&embed.target, &note.path)
            .ok_or_else(|| VaultError::NotFound(embed.target.clone()))?;
        let kind = classify(MediaSource::Remote(&path));
        let destination = destination::resolve(self.config, kind, Some(note.folder()));

        let data = vault.read(&path)?;
        let mime = vault.mime(&path);
        let name = path.rsplit('/').next().unwrap_or(&path);
        let asset = self.send(name, &data, &mime, &destination, kind)?;

        let url = transform_for(self.config, kind, &asset.secure_url);
        let replacement = markup(markup_kind(kind, asset.kind), &url);

        let mut text = vault.read_note(&note.path)?;
        let start = text.find(&embed.raw).ok_or_else(|| {
            UploadError::Document(format!("{} no longer contains {}", note.path, embed.raw))
        })?;
        text.replace_range(start..start + embed.raw.len(), &replacement);
        vault.write_note(&note.path, &text)?;

        Ok(format!("{} in {} uploaded to {url}", embed.target, note.path))
    }

    /// Upload a vault file to the backup destination. No document is touched.
    pub fn backup_file(&self, vault: &impl Vault, file: &VaultFile) -> Result<String, UploadError> {
        let destination = destination::resolve_backup(self.config, &file.path);
        let data = vault.read(&file.path)?;
        let mime = vault.mime(&file.path);
        let kind = classify(MediaSource::Local { mime: &mime });
        let asset = self.send(file.name(), &data, &mime, &destination, kind)?;
        Ok(format!("{} backed up as {}", file.path, asset.public_id))
    }

    fn send(
        &self,
        name: &str,
        data: &[u8],
        mime: &str,
        destination: &Destination,
        kind: MediaKind,
    ) -> Result<RemoteAsset, UploadError> {
        info!(
            "Uploading {name} as {kind} (preset '{}', folder {:?})",
            destination.preset, destination.folder
        );
        self.notifier.status(Some(&format!("Uploading {name}…")));
        let result = self.uploader.upload(&UploadRequest {
            name,
            data,
            mime,
            destination,
            kind_hint: kind,
        });
        self.notifier.status(None);
        match &result {
            Ok(asset) => info!("Uploaded {name} to {}", asset.secure_url),
            Err(err) => warn!("Upload of {name} failed: {err}"),
        }
        result
    }

    fn notify_failure(&self, name: Option<&str>, err: &UploadError) {
        let message = match name {
            Some(name) => format!("Upload of {name} failed: {err}. {}", err.guidance()),
            None => format!("{err}. {}", err.guidance()),
        };
        self.notifier.notice(Notice::new(NoticeLevel::Error, message));
    }
}

/// The endpoint's resource type only turns files that were raw locally into
/// audio or video players. It never changes the transformation.
fn markup_kind(local: MediaKind, uploaded: MediaKind) -> MediaKind {
    match (local, uploaded) {
        (MediaKind::Raw, MediaKind::Audio | MediaKind::Video) => uploaded,
        _ => local,
    }
}
