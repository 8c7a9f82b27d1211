//! In-memory host and uploader for tests.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use cloudup_cloudinary::{CloudinaryError, ResourceType};

use crate::error::{UploadError, VaultError};
use crate::format::{MediaKind, classify_uploaded};
use crate::host::{Confirm, Notice, Notifier, Vault, VaultFile};
use crate::uploader::{RemoteAsset, UploadRequest, Uploader};

/// In-memory vault.
#[derive(Debug, Default)]
pub struct MockVault {
    files: RwLock<BTreeMap<String, Vec<u8>>>,
    unreadable: Vec<String>,
    writes: RwLock<usize>,
}

impl MockVault {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_file(self, path: &str, data: &[u8]) -> Self {
        self.files
            .write()
            .unwrap()
            .insert(path.to_owned(), data.to_vec());
        self
    }

    #[must_use]
    pub fn with_note(self, path: &str, text: &str) -> Self {
        self.with_file(path, text.as_bytes())
    }

    /// Make reads of `path` fail with an I/O error.
    #[must_use]
    pub fn with_unreadable(mut self, path: &str) -> Self {
        self.unreadable.push(path.to_owned());
        self
    }

    /// Current text of a note. Panics if missing.
    #[must_use]
    pub fn note(&self, path: &str) -> String {
        let files = self.files.read().unwrap();
        String::from_utf8(files[path].clone()).unwrap()
    }

    /// Number of note writes so far.
    #[must_use]
    pub fn writes(&self) -> usize {
        *self.writes.read().unwrap()
    }

    fn check_readable(&self, path: &str) -> Result<(), VaultError> {
        if self.unreadable.iter().any(|p| p == path) {
            return Err(VaultError::io(
                path,
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "unreadable"),
            ));
        }
        Ok(())
    }
}

impl Vault for MockVault {
    fn files(&self) -> Result<Vec<VaultFile>, VaultError> {
        let files = self.files.read().unwrap();
        Ok(files.keys().map(VaultFile::new).collect())
    }

    fn read(&self, path: &str) -> Result<Vec<u8>, VaultError> {
        self.check_readable(path)?;
        let files = self.files.read().unwrap();
        files
            .get(path)
            .cloned()
            .ok_or_else(|| VaultError::NotFound(path.to_owned()))
    }

    fn read_note(&self, path: &str) -> Result<String, VaultError> {
        let data = self.read(path)?;
        Ok(String::from_utf8_lossy(&data).into_owned())
    }

    fn write_note(&self, path: &str, content: &str) -> Result<(), VaultError> {
        let mut files = self.files.write().unwrap();
        files.insert(path.to_owned(), content.as_bytes().to_vec());
        *self.writes.write().unwrap() += 1;
        Ok(())
    }

    fn resolve_link(&self, target: &str, from_note: &str) -> Option<String> {
        let files = self.files.read().unwrap();
        let folder = VaultFile::new(from_note).folder().to_owned();
        let relative = if folder.is_empty() {
            target.to_owned()
        } else {
            format!("{folder}/{target}")
        };
        if files.contains_key(target) {
            return Some(target.to_owned());
        }
        if files.contains_key(&relative) {
            return Some(relative);
        }
        let mut by_name = files.keys().filter(|p| VaultFile::new(p.as_str()).name() == target);
        match (by_name.next(), by_name.next()) {
            (Some(path), None) => Some(path.clone()),
            _ => None,
        }
    }

    fn mime(&self, path: &str) -> String {
        let ext = path.rsplit_once('.').map(|(_, e)| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("png") => "image/png",
            Some("jpg" | "jpeg") => "image/jpeg",
            Some("gif") => "image/gif",
            Some("mp3") => "audio/mpeg",
            Some("wav") => "audio/wav",
            Some("mp4") => "video/mp4",
            Some("pdf") => "application/pdf",
            Some("md") => "text/markdown",
            _ => "application/octet-stream",
        }
        .to_owned()
    }
}

/// Notifier that records everything it is shown.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: RefCell<Vec<Notice>>,
    statuses: RefCell<Vec<Option<String>>>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.borrow().clone()
    }

    #[must_use]
    pub fn statuses(&self) -> Vec<Option<String>> {
        self.statuses.borrow().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notice(&self, notice: Notice) {
        self.notices.borrow_mut().push(notice);
    }

    fn status(&self, message: Option<&str>) {
        self.statuses.borrow_mut().push(message.map(str::to_owned));
    }
}

/// What the uploader was asked to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedUpload {
    pub name: String,
    pub mime: String,
    pub preset: String,
    pub folder: Option<String>,
    pub kind_hint: MediaKind,
}

/// Uploader that succeeds unless told otherwise, recording every request.
///
/// Successful uploads get `https://res.example.com/demo/<type>/upload/<folder>/<name>`
/// where `<type>` is the resource type the real endpoint would report.
#[derive(Debug, Default)]
pub struct ScriptedUploader {
    failures: HashMap<String, u16>,
    timeouts: Vec<String>,
    reported: HashMap<String, ResourceType>,
    calls: RefCell<Vec<RecordedUpload>>,
}

impl ScriptedUploader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject uploads of `name` with an HTTP `status`.
    #[must_use]
    pub fn fail_with_status(mut self, name: &str, status: u16) -> Self {
        self.failures.insert(name.to_owned(), status);
        self
    }

    /// Time out uploads of `name`.
    #[must_use]
    pub fn time_out(mut self, name: &str) -> Self {
        self.timeouts.push(name.to_owned());
        self
    }

    /// Report `name` as `resource_type` instead of the type its kind implies.
    #[must_use]
    pub fn report_as(mut self, name: &str, resource_type: ResourceType) -> Self {
        self.reported.insert(name.to_owned(), resource_type);
        self
    }

    #[must_use]
    pub fn calls(&self) -> Vec<RecordedUpload> {
        self.calls.borrow().clone()
    }
}

impl Uploader for ScriptedUploader {
    fn upload(&self, request: &UploadRequest<'_>) -> Result<RemoteAsset, UploadError> {
        self.calls.borrow_mut().push(RecordedUpload {
            name: request.name.to_owned(),
            mime: request.mime.to_owned(),
            preset: request.destination.preset.clone(),
            folder: request.destination.folder.clone(),
            kind_hint: request.kind_hint,
        });

        if self.timeouts.iter().any(|n| n == request.name) {
            return Err(CloudinaryError::Timeout.into());
        }
        if let Some(&status) = self.failures.get(request.name) {
            return Err(CloudinaryError::HttpResponse {
                status,
                message: format!("rejected {}", request.name),
            }
            .into());
        }

        let resource_type = match (self.reported.get(request.name), request.kind_hint) {
            (Some(&reported), _) => reported,
            (None, MediaKind::Image) => ResourceType::Image,
            (None, MediaKind::Video | MediaKind::Audio) => ResourceType::Video,
            (None, MediaKind::Raw) => ResourceType::Raw,
        };
        let type_segment = match resource_type {
            ResourceType::Image => "image",
            ResourceType::Video => "video",
            ResourceType::Raw | ResourceType::Unknown => "raw",
        };
        let public_id = match &request.destination.folder {
            Some(folder) => format!("{folder}/{}", request.name),
            None => request.name.to_owned(),
        };
        let secure_url = format!("https://res.example.com/demo/{type_segment}/upload/{public_id}");
        Ok(RemoteAsset {
            kind: classify_uploaded(resource_type, &secure_url),
            secure_url,
            public_id,
        })
    }
}

/// Confirmation that always gives the same answer and counts prompts.
#[derive(Debug, Default)]
pub struct FixedConfirm {
    answer: bool,
    asked: Cell<usize>,
    last_title: RefCell<Option<String>>,
}

impl FixedConfirm {
    #[must_use]
    pub fn new(answer: bool) -> Self {
        Self {
            answer,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn asked(&self) -> usize {
        self.asked.get()
    }

    #[must_use]
    pub fn last_title(&self) -> Option<String> {
        self.last_title.borrow().clone()
    }
}

impl Confirm for FixedConfirm {
    fn confirm(&self, title: &str, _body: &str) -> bool {
        self.asked.set(self.asked.get() + 1);
        *self.last_title.borrow_mut() = Some(title.to_owned());
        self.answer
    }
}
