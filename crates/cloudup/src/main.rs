//! cloudup CLI - uploads note media to Cloudinary.
//!
//! Provides commands for:
//! - `paste` / `drop`: Insert files into a note, uploading the qualifying ones
//! - `upload-note`: Upload the local embeds of one note
//! - `upload-all`: Upload the local embeds of every note in the vault
//! - `backup`: Upload every non-note vault file
//! - `config`: Show or change settings

mod commands;
mod error;
mod host;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BatchArgs, ConfigCommand, NoteArgs, PasteArgs};
use output::Output;

/// cloudup - note media uploader.
#[derive(Parser)]
#[command(name = "cloudup", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Paste files into a note.
    Paste(PasteArgs),
    /// Drop files into a note.
    Drop(PasteArgs),
    /// Upload local media embedded in one note.
    UploadNote(NoteArgs),
    /// Upload local media embedded in every note.
    UploadAll(BatchArgs),
    /// Back up every non-note file in the vault.
    Backup(BatchArgs),
    /// Configuration commands.
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Commands {
    fn verbose(&self) -> bool {
        match self {
            Self::Paste(args) | Self::Drop(args) => args.common.verbose,
            Self::UploadNote(args) => args.batch.common.verbose,
            Self::UploadAll(args) | Self::Backup(args) => args.common.verbose,
            Self::Config(_) => false,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.command.verbose() {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Paste(args) => args.execute(cloudup_core::Trigger::Paste),
        Commands::Drop(args) => args.execute(cloudup_core::Trigger::Drop),
        Commands::UploadNote(args) => args.execute(),
        Commands::UploadAll(args) => args.execute(&cloudup_core::BatchMode::AllNotes),
        Commands::Backup(args) => args.execute(&cloudup_core::BatchMode::BackupVault),
        Commands::Config(cmd) => cmd.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
