//! Error types for the upload pipeline.

use cloudup_cloudinary::{CloudinaryError, ErrorKind};

/// Error from vault access.
#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    /// Path does not exist in the vault.
    #[error("not found: {0}")]
    NotFound(String),

    /// I/O error on a vault path.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl VaultError {
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            return Self::NotFound(path.into());
        }
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Classified failure of one upload.
///
/// Every failure is caught at the task boundary and turned into an outcome;
/// none of these abort a batch.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// Required settings are missing; detected before any network call.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The remote side rejected the cloud name (401).
    #[error("cloud name is invalid or unauthorized: {0}")]
    InvalidCloudName(String),

    /// The remote side rejected the upload preset (400).
    #[error("upload preset is invalid: {0}")]
    InvalidPreset(String),

    /// The upload did not finish in time.
    #[error("upload timed out")]
    Timeout,

    /// Any other remote or transport failure.
    #[error("upload failed: {0}")]
    Failed(String),

    /// The placeholder or embed to replace is gone from the document.
    #[error("document changed: {0}")]
    Document(String),

    /// Reading the source file or writing the note failed.
    #[error(transparent)]
    Vault(#[from] VaultError),
}

impl UploadError {
    /// User-facing guidance for this failure.
    #[must_use]
    pub fn guidance(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "Set a cloud name and upload preset before uploading.",
            Self::InvalidCloudName(_) => "Check that the cloud name matches your account.",
            Self::InvalidPreset(_) => {
                "Check that the upload preset exists and is configured for unsigned uploads."
            }
            Self::Timeout => "The upload took too long. Please try again.",
            Self::Failed(_) => "There was something wrong with your upload. Please try again.",
            Self::Document(_) => "The note changed while uploading; the local link was kept.",
            Self::Vault(_) => "A local file could not be read or written.",
        }
    }
}

impl From<CloudinaryError> for UploadError {
    fn from(err: CloudinaryError) -> Self {
        let message = err
            .remote_message()
            .map_or_else(|| err.to_string(), str::to_owned);
        match err.kind() {
            ErrorKind::InvalidCloudName => Self::InvalidCloudName(message),
            ErrorKind::InvalidPreset => Self::InvalidPreset(message),
            ErrorKind::Timeout => Self::Timeout,
            ErrorKind::Other => Self::Failed(message),
        }
    }
}
