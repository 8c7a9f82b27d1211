//! `cloudup upload-note`, `upload-all` and `backup` command implementation.

use std::path::PathBuf;

use clap::Args;
use cloudup_core::{
    BatchMode, BatchSummary, Notifier, Orchestrator, Pipeline, Uploader, Vault, VaultFile,
    confirm_batch,
};

use super::{CommonArgs, create_client, note_path};
use crate::error::CliError;
use crate::host::{TerminalConfirm, TerminalNotifier};
use crate::output::Output;

/// Arguments for the vault-wide batch commands.
#[derive(Args)]
pub(crate) struct BatchArgs {
    /// List what would be uploaded without uploading anything.
    #[arg(long)]
    dry_run: bool,

    /// Skip the confirmation prompt.
    #[arg(short, long)]
    yes: bool,

    #[command(flatten)]
    pub(crate) common: CommonArgs,
}

/// Arguments for the upload-note command.
#[derive(Args)]
pub(crate) struct NoteArgs {
    /// Note whose embeds to upload.
    note: PathBuf,

    #[command(flatten)]
    pub(crate) batch: BatchArgs,
}

impl NoteArgs {
    /// Execute the upload-note command.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let note = note_path(&self.batch.common.vault(), &self.note)?;
        self.batch
            .execute(&BatchMode::CurrentNote(VaultFile::new(note)))
    }
}

impl BatchArgs {
    /// Execute a batch command for `mode`.
    pub(crate) fn execute(self, mode: &BatchMode) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.common.load_config(self.yes.then_some(true))?;
        let vault = self.common.vault();
        let client = create_client(&config);
        let notifier = TerminalNotifier::new();
        let pipeline = Pipeline::new(&config, &client, &notifier);
        let orchestrator = Orchestrator::new(&pipeline, &vault);

        if self.dry_run {
            return print_plan(&output, &orchestrator, mode);
        }

        if !confirm_batch(&config, &TerminalConfirm::new(), mode) {
            output.warning("Cancelled.");
            return Ok(());
        }

        let outcome = orchestrator.run(mode)?;
        if let BatchSummary::Failed(count) = outcome.summary() {
            return Err(CliError::Failed(format!("all {count} uploads failed")));
        }
        Ok(())
    }
}

fn print_plan<U: Uploader, N: Notifier, V: Vault>(
    output: &Output,
    orchestrator: &Orchestrator<'_, U, N, V>,
    mode: &BatchMode,
) -> Result<(), CliError> {
    let plan = orchestrator.plan(mode)?;
    output.highlight("[DRY RUN] Nothing uploaded.");

    if plan.items.is_empty() {
        output.info("No local media to upload.");
    } else {
        output.info(&format!("\nUploads ({}):", plan.items.len()));
    }
    for item in &plan.items {
        match orchestrator.destination(item) {
            Some(destination) => output.info(&format!(
                "  -> {} => folder '{}', preset '{}'",
                item.describe(),
                destination.folder.as_deref().unwrap_or(""),
                destination.preset
            )),
            None => output.warning(&format!("  -> {} (not found in vault)", item.describe())),
        }
    }

    if !plan.failures.is_empty() {
        output.warning(&format!("\nUnreadable notes ({}):", plan.failures.len()));
        for failure in &plan.failures {
            output.info(&format!("  - {failure}"));
        }
    }
    Ok(())
}
