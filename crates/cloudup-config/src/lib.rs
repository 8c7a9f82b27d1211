//! Configuration management for cloudup.
//!
//! Parses `cloudup.toml` configuration files with serde over hard defaults
//! and provides auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `cloudinary.cloud_name`
//! - `cloudinary.upload_preset`
//! - `cloudinary.api_base`
//!
//! ## Persistence
//!
//! [`Config::open_for_edit`] loads a file without expansion so that
//! [`Config::set`] followed by [`Config::save`] writes back `${VAR}`
//! references untouched.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override cloud account name.
    pub cloud_name: Option<String>,
    /// Override default upload preset.
    pub upload_preset: Option<String>,
    /// Override default upload folder.
    pub folder: Option<String>,
    /// Override the confirmation bypass flag.
    pub skip_confirm: Option<bool>,
}

/// Configuration filename to search for.
pub const CONFIG_FILENAME: &str = "cloudup.toml";

/// Default upload API base URL.
const DEFAULT_API_BASE: &str = "https://api.cloudinary.com";

/// Default per-file upload timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Cloud account and endpoint settings.
    pub cloudinary: CloudinaryConfig,
    /// Which host events trigger uploads.
    pub triggers: TriggerConfig,
    /// Per-kind upload enable flags.
    pub content: ContentConfig,
    /// Per-kind subfolder segregation.
    pub subfolders: SubfolderConfig,
    /// URL transformation settings.
    pub transform: TransformConfig,
    /// Per-note-folder destination overrides.
    pub overrides: OverrideConfig,
    /// Vault backup destination.
    pub backup: BackupConfig,
    /// Batch confirmation settings.
    pub confirm: ConfirmConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Cloud account and endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CloudinaryConfig {
    /// Cloud account identifier.
    pub cloud_name: String,
    /// Default upload preset.
    pub upload_preset: String,
    /// Default upload folder.
    pub folder: String,
    /// Upload API base URL.
    pub api_base: String,
    /// Per-file upload timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for CloudinaryConfig {
    fn default() -> Self {
        Self {
            cloud_name: String::new(),
            upload_preset: String::new(),
            folder: String::new(),
            api_base: DEFAULT_API_BASE.to_owned(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Which host events trigger uploads.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TriggerConfig {
    /// Upload on clipboard paste.
    pub clipboard: bool,
    /// Upload on drag and drop.
    pub drop: bool,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            clipboard: true,
            drop: false,
        }
    }
}

/// Per-kind upload enable flags.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ContentConfig {
    pub image: bool,
    pub audio: bool,
    pub video: bool,
    pub raw: bool,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            image: true,
            audio: false,
            video: false,
            raw: false,
        }
    }
}

/// Per-kind subfolder segregation.
///
/// Raw files get no subfolder unless `raw` is set explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SubfolderConfig {
    /// Whether kind-specific subfolders are appended.
    pub enabled: bool,
    pub image: String,
    pub video: String,
    pub audio: String,
    pub raw: String,
}

impl Default for SubfolderConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            image: "images".to_owned(),
            video: "videos".to_owned(),
            audio: "audios".to_owned(),
            raw: String::new(),
        }
    }
}

/// URL transformation settings.
///
/// A non-empty per-kind string takes precedence over `params`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TransformConfig {
    /// Global transformation string (e.g. `w_100,h_100,c_fill`).
    pub params: String,
    pub image: String,
    pub video: String,
    pub audio: String,
    /// Inject `f_auto` into delivered URLs.
    pub auto_format: bool,
}

/// Per-note-folder destination overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct OverrideConfig {
    /// Whether overrides are consulted at all.
    pub enabled: bool,
    /// Ordered override entries. `note_folder` keys are unique.
    pub folders: Vec<FolderOverride>,
}

/// One folder override entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct FolderOverride {
    /// Vault folder the active note lives in (e.g. `Notes/A`, `/` for root).
    pub note_folder: String,
    /// Upload preset used for notes under `note_folder`.
    pub preset: String,
    /// Remote destination folder used for notes under `note_folder`.
    pub folder: String,
}

/// Vault backup destination.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct BackupConfig {
    /// Remote root folder for backups.
    pub folder: String,
    /// Append each file's vault-relative directory to `folder`.
    pub preserve_paths: bool,
}

/// Batch confirmation settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ConfirmConfig {
    /// Assume every batch operation is approved.
    pub skip: bool,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// TOML serialization error.
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`cloudinary.cloud_name`").
        field: String,
        /// Error message (e.g., "${`CLOUD_NAME`}: environment variable not found").
        message: String,
    },
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `cloudup.toml` in current directory and parents,
    /// falling back to defaults when none is found.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Load a config file for editing, without environment expansion.
    ///
    /// A missing file yields defaults bound to `path`, so the first
    /// [`Config::save`] creates it.
    pub fn open_for_edit(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            Self::parse_file(path)?
        } else {
            Self::default()
        };
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Path to the config file to edit: explicit, discovered, or `./cloudup.toml`.
    #[must_use]
    pub fn edit_path(config_path: Option<&Path>) -> PathBuf {
        config_path
            .map(Path::to_path_buf)
            .or_else(Self::discover_config)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME))
    }

    /// Write the whole configuration back to the file it came from.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the config has no backing path.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = self.config_path.as_ref().ok_or_else(|| {
            ConfigError::Validation("configuration has no file to save to".to_owned())
        })?;
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Render the configuration as TOML, the same way [`Config::save`] writes it.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Set one field by dotted key (e.g. `cloudinary.cloud_name`).
    ///
    /// The value is parsed according to the current type of the field, and
    /// the result is validated before being accepted.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut table: toml::Table = toml::to_string(self)?.parse()?;

        let (section, field) = key
            .split_once('.')
            .ok_or_else(|| ConfigError::Validation(format!("unknown setting: {key}")))?;
        let slot = table
            .get_mut(section)
            .and_then(toml::Value::as_table_mut)
            .and_then(|t| t.get_mut(field))
            .ok_or_else(|| ConfigError::Validation(format!("unknown setting: {key}")))?;

        let new_value = match &*slot {
            toml::Value::Boolean(_) => toml::Value::Boolean(value.parse().map_err(|_| {
                ConfigError::Validation(format!("{key} expects true or false"))
            })?),
            toml::Value::Integer(_) => toml::Value::Integer(value.parse().map_err(|_| {
                ConfigError::Validation(format!("{key} expects an integer"))
            })?),
            toml::Value::String(_) => toml::Value::String(value.to_owned()),
            _ => {
                return Err(ConfigError::Validation(format!(
                    "{key} cannot be set from the command line"
                )));
            }
        };
        *slot = new_value;

        let mut updated: Self = toml::from_str(&toml::to_string(&table)?)?;
        updated.validate()?;
        updated.config_path = self.config_path.take();
        *self = updated;
        Ok(())
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(cloud_name) = &settings.cloud_name {
            self.cloudinary.cloud_name.clone_from(cloud_name);
        }
        if let Some(preset) = &settings.upload_preset {
            self.cloudinary.upload_preset.clone_from(preset);
        }
        if let Some(folder) = &settings.folder {
            self.cloudinary.folder.clone_from(folder);
        }
        if let Some(skip) = settings.skip_confirm {
            self.confirm.skip = skip;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    fn parse_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::parse_file(path)?;
        config.expand_env_vars()?;
        config.config_path = Some(path.to_path_buf());
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Missing cloud name or preset is not a load-time error; the upload
    /// pipeline reports it before any network call.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_http_url(&self.cloudinary.api_base, "cloudinary.api_base")?;
        if self.cloudinary.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "cloudinary.timeout_secs must be greater than 0".to_owned(),
            ));
        }
        self.validate_overrides()
    }

    /// Override entries must have unique `note_folder` keys. Blank rows are unset.
    fn validate_overrides(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for entry in &self.overrides.folders {
            if entry.note_folder.trim().is_empty() {
                continue;
            }
            if !seen.insert(normalize_folder(&entry.note_folder)) {
                return Err(ConfigError::Validation(format!(
                    "overrides.folders: duplicate note_folder '{}'",
                    entry.note_folder
                )));
            }
        }
        Ok(())
    }

    /// Expand `${VAR}` references in the fields listed in the crate docs.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        let c = &mut self.cloudinary;
        for (value, field) in [
            (&mut c.cloud_name, "cloudinary.cloud_name"),
            (&mut c.upload_preset, "cloudinary.upload_preset"),
            (&mut c.api_base, "cloudinary.api_base"),
        ] {
            expand_in_place(value, field)?;
        }
        Ok(())
    }
}

/// Replace `${VAR}` and `${VAR:-default}` in `value`. Bare `$VAR` is kept.
fn expand_in_place(value: &mut String, field: &str) -> Result<(), ConfigError> {
    if !value.contains("${") {
        return Ok(());
    }
    let expanded = shellexpand::env_with_context(value.as_str(), |var| std::env::var(var).map(Some))
        .map_err(|e| ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{}}}: {}", e.var_name, e.cause),
        })?
        .into_owned();
    *value = expanded;
    Ok(())
}

/// Normalize a vault folder path: trims slashes, maps the root to `""`.
#[must_use]
pub fn normalize_folder(folder: &str) -> &str {
    folder.trim_matches('/')
}
