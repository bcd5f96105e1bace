mod handlers;
mod registry;

pub use registry::{all_commands, find_command, Command, CommandInvocation, CommandUsage};

use crate::core::config::ConfigKey;
use crate::core::coordinator::ChatCoordinator;
use crate::ui::presenter::Presenter;

/// What the presentation loop should do after a line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    Continue,
    /// Not a command; send the text to the model.
    ProcessAsMessage(String),
    /// Fetch the model list and open the settings overlay.
    OpenSettings,
    /// A setting changed; persist that key only.
    SettingsChanged(ConfigKey),
    /// Put the companion away until the next key press.
    HidePanel,
}

/// What a command handler may act on.
pub struct CommandContext<'a> {
    pub coordinator: &'a mut ChatCoordinator,
    pub presenter: &'a mut dyn Presenter,
}

pub fn process_input(context: &mut CommandContext<'_>, input: &str) -> CommandResult {
    let trimmed = input.trim();

    if !trimmed.starts_with('/') {
        return CommandResult::ProcessAsMessage(input.to_string());
    }

    let mut parts = trimmed[1..].splitn(2, char::is_whitespace);
    let command_name = match parts.next() {
        Some(name) if !name.is_empty() => name,
        _ => return CommandResult::ProcessAsMessage(input.to_string()),
    };
    let args = parts.next().unwrap_or("").trim();

    match registry::find_command(command_name) {
        Some(command) if command.takes_args || args.is_empty() => {
            let invocation = CommandInvocation {
                input: trimmed,
                args,
            };
            (command.handler)(context, invocation)
        }
        _ => CommandResult::ProcessAsMessage(input.to_string()),
    }
}

#[cfg(test)]
mod tests;
