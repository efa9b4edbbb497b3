//! Native dialogs backing the shell: folder picker and message boxes.

use std::path::PathBuf;

use rfd::{FileDialog, MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};
use tracing::debug;
use webmail_shell::shell::download::CHOOSE_FOLDER_TITLE;
use webmail_shell::{APPLICATION_NAME, GuardError, SetupPrompter};

/// Question asked when the user cancels first-run setup.
pub const QUIT_QUESTION: &str = "Do you really want to close the program?";

/// Asks the user for a download folder; `None` when cancelled.
pub fn pick_download_folder() -> Option<PathBuf> {
    let folder = FileDialog::new().set_title(CHOOSE_FOLDER_TITLE).pick_folder();
    debug!(chosen = folder.is_some(), "download folder picker closed");
    folder
}

/// Setup prompts shown as blocking native message boxes.
pub struct NativePrompter;

impl SetupPrompter for NativePrompter {
    fn warn_invalid_url(&mut self, error: &GuardError) {
        MessageDialog::new()
            .set_level(MessageLevel::Warning)
            .set_title(APPLICATION_NAME)
            .set_description(error.user_message())
            .set_buttons(MessageButtons::Ok)
            .show();
    }

    fn confirm_quit(&mut self) -> bool {
        let answer = MessageDialog::new()
            .set_level(MessageLevel::Info)
            .set_title(APPLICATION_NAME)
            .set_description(QUIT_QUESTION)
            .set_buttons(MessageButtons::YesNo)
            .show();
        quit_confirmed(&answer)
    }
}

/// Only an explicit Yes quits; No, closing the box or any other answer keeps setup open.
fn quit_confirmed(answer: &MessageDialogResult) -> bool {
    matches!(answer, MessageDialogResult::Yes)
}
