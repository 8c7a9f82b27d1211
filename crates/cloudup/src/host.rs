//! Terminal implementations of the pipeline's user-facing capabilities.

use cloudup_core::{Confirm, Notice, NoticeLevel, Notifier};

use crate::output::Output;

/// Renders notices and the status indicator on stderr.
pub(crate) struct TerminalNotifier {
    output: Output,
}

impl TerminalNotifier {
    pub(crate) fn new() -> Self {
        Self {
            output: Output::new(),
        }
    }
}

impl Notifier for TerminalNotifier {
    fn notice(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Info => self.output.info(&notice.message),
            NoticeLevel::Success => self.output.success(&notice.message),
            NoticeLevel::Warning => self.output.warning(&notice.message),
            NoticeLevel::Error => self.output.error(&notice.message),
        }
    }

    fn status(&self, message: Option<&str>) {
        self.output.status(message);
    }
}

/// Asks for confirmation on the terminal.
pub(crate) struct TerminalConfirm {
    output: Output,
}

impl TerminalConfirm {
    pub(crate) fn new() -> Self {
        Self {
            output: Output::new(),
        }
    }
}

impl Confirm for TerminalConfirm {
    fn confirm(&self, title: &str, body: &str) -> bool {
        self.output.highlight(title);
        self.output.info(body);
        self.output.ask("Proceed?")
    }
}
