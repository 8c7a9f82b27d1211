//! `cloudup config` command implementation.

use std::path::PathBuf;

use clap::Subcommand;
use cloudup_config::Config;

use crate::error::CliError;
use crate::output::Output;

/// Configuration subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigCommand {
    /// Print the configuration file contents with defaults filled in.
    Show {
        /// Path to configuration file (default: auto-discover cloudup.toml).
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Set one value and save it, e.g. `cloudinary.cloud_name demo`.
    Set {
        /// Dotted key.
        key: String,
        /// New value.
        value: String,
        /// Path to configuration file (default: auto-discover cloudup.toml).
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

impl ConfigCommand {
    /// Execute the config command.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        match self {
            Self::Show { config } => {
                let path = Config::edit_path(config.as_deref());
                let config = Config::open_for_edit(&path)?;
                output.highlight(&format!("# {}", path.display()));
                output.info(&config.to_toml()?);
            }
            Self::Set { key, value, config } => {
                let path = Config::edit_path(config.as_deref());
                let mut config = Config::open_for_edit(&path)?;
                config.set(&key, &value)?;
                config.save()?;
                output.success(&format!("Set {key} in {}", path.display()));
            }
        }
        Ok(())
    }
}
