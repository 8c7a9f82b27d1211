//! `cloudup paste` and `cloudup drop` command implementation.

use std::path::PathBuf;

use clap::Args;
use cloudup_core::{
    Editor, EventDisposition, Pipeline, Placeholders, Trigger, VaultFile, local_link,
};
use cloudup_vault_fs::FileEditor;
use tracing::info;

use super::{CommonArgs, create_client, note_path, read_pasted};
use crate::error::CliError;
use crate::host::TerminalNotifier;
use crate::output::Output;

/// Arguments for the paste and drop commands.
#[derive(Args)]
pub(crate) struct PasteArgs {
    /// Note to insert into.
    note: PathBuf,

    /// Files carried by the event.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Insert after the first occurrence of this text instead of at the end.
    #[arg(long)]
    after: Option<String>,

    #[command(flatten)]
    pub(crate) common: CommonArgs,
}

impl PasteArgs {
    /// Execute the paste or drop command.
    pub(crate) fn execute(self, trigger: Trigger) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.common.load_config(None)?;
        let vault = self.common.vault();

        let note = note_path(&vault, &self.note)?;
        let mut editor = FileEditor::open(&vault, &note)?;
        if let Some(anchor) = &self.after
            && !editor.place_cursor_after(anchor)
        {
            return Err(CliError::Validation(format!(
                "text not found in {note}: {anchor}"
            )));
        }
        let files = self
            .files
            .iter()
            .map(|path| read_pasted(path))
            .collect::<Result<Vec<_>, _>>()?;

        let client = create_client(&config);
        let notifier = TerminalNotifier::new();
        let pipeline = Pipeline::new(&config, &client, &notifier);
        let mut placeholders = Placeholders::new();
        let folder = VaultFile::new(note.as_str()).folder().to_owned();

        match pipeline.handle_event(trigger, &files, &mut editor, &mut placeholders, Some(&folder)) {
            EventDisposition::Default => {
                info!("No upload for this event; inserting local links");
                for file in &files {
                    editor.replace_selection(&local_link(&file.name));
                }
                output.info(&format!("Inserted {} local link(s) into {note}", files.len()));
            }
            EventDisposition::Handled(outcome) => {
                for message in outcome.successes() {
                    output.success(message);
                }
            }
        }

        editor.save(&vault)?;
        Ok(())
    }
}
