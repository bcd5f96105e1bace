pub(super) mod config;
pub(super) mod core;

use crate::commands::CommandContext;
use crate::core::prompt::WELCOME_TEXT;
use crate::ui::presenter::Sender;

/// Show a fresh transcript that starts with the welcome line.
pub(super) fn restart_transcript(context: &mut CommandContext<'_>) {
    context.presenter.clear_messages();
    context.presenter.show_message(Sender::Assistant, WELCOME_TEXT);
    context.presenter.request_input();
}
