//! CLI error types.

use cloudup_config::ConfigError;
use cloudup_core::{UploadError, VaultError};

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Upload(#[from] UploadError),

    #[error("{0}")]
    Vault(#[from] VaultError),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Failed(String),
}
