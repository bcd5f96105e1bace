use super::restart_transcript;
use crate::commands::registry::CommandInvocation;
use crate::commands::{all_commands, CommandContext, CommandResult};
use crate::ui::presenter::Sender;

pub(crate) fn help_text() -> String {
    let mut help = String::from("Type a message and press Enter to chat. Commands:\n");
    for command in all_commands() {
        for usage in command.usages {
            help.push_str(&format!("  {:<14} {}\n", usage.syntax, usage.description));
        }
    }
    help.push_str("Keys: PgUp/PgDn scroll, Ctrl+C quit.");
    help
}

pub(crate) fn handle_help(
    context: &mut CommandContext<'_>,
    _invocation: CommandInvocation<'_>,
) -> CommandResult {
    context.presenter.show_message(Sender::App, &help_text());
    CommandResult::Continue
}

pub(crate) fn handle_clear(
    context: &mut CommandContext<'_>,
    _invocation: CommandInvocation<'_>,
) -> CommandResult {
    context.coordinator.clear_history();
    restart_transcript(context);
    CommandResult::Continue
}

pub(crate) fn handle_bye(
    context: &mut CommandContext<'_>,
    invocation: CommandInvocation<'_>,
) -> CommandResult {
    handle_clear(context, invocation);
    CommandResult::HidePanel
}
