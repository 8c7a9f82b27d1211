//! CLI command implementations.

mod batch;
mod config;
mod paste;

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Args;
use cloudup_cloudinary::CloudinaryClient;
use cloudup_config::{CliSettings, Config};
use cloudup_core::PastedFile;
use cloudup_vault_fs::FsVault;

use crate::error::CliError;

pub(crate) use batch::{BatchArgs, NoteArgs};
pub(crate) use config::ConfigCommand;
pub(crate) use paste::PasteArgs;

/// Options shared by every upload command.
#[derive(Args)]
pub(crate) struct CommonArgs {
    /// Path to configuration file (default: auto-discover cloudup.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Vault root directory.
    #[arg(long, env = "CLOUDUP_VAULT", default_value = ".")]
    vault: PathBuf,

    /// Cloud name (overrides config).
    #[arg(long)]
    cloud_name: Option<String>,

    /// Upload preset (overrides config).
    #[arg(long)]
    preset: Option<String>,

    /// Upload folder (overrides config).
    #[arg(long)]
    folder: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl CommonArgs {
    fn load_config(&self, skip_confirm: Option<bool>) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            cloud_name: self.cloud_name.clone(),
            upload_preset: self.preset.clone(),
            folder: self.folder.clone(),
            skip_confirm,
        };
        Ok(Config::load(self.config.as_deref(), Some(&cli_settings))?)
    }

    fn vault(&self) -> FsVault {
        FsVault::new(&self.vault)
    }
}

fn create_client(config: &Config) -> CloudinaryClient {
    let cloud = &config.cloudinary;
    CloudinaryClient::new(
        &cloud.api_base,
        &cloud.cloud_name,
        Duration::from_secs(cloud.timeout_secs),
    )
}

/// Vault-relative path of a note given on the command line.
fn note_path(vault: &FsVault, note: &Path) -> Result<String, CliError> {
    let candidate = if note.is_absolute() || note.exists() {
        note.to_path_buf()
    } else {
        vault.root().join(note)
    };
    if !candidate.is_file() {
        return Err(CliError::Validation(format!(
            "note not found: {}",
            note.display()
        )));
    }
    vault.relative(&candidate).ok_or_else(|| {
        CliError::Validation(format!(
            "{} is not inside the vault at {}",
            note.display(),
            vault.root().display()
        ))
    })
}

/// Read a file from disk the way a paste or drop event would carry it.
fn read_pasted(path: &Path) -> Result<PastedFile, CliError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| CliError::Validation(format!("not a file: {}", path.display())))?;
    let data = std::fs::read(path)?;
    let mime = mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_owned();
    Ok(PastedFile { name, mime, data })
}
