use super::restart_transcript;
use crate::commands::registry::CommandInvocation;
use crate::commands::{CommandContext, CommandResult};
use crate::core::config::ConfigKey;

pub(crate) fn handle_settings(
    context: &mut CommandContext<'_>,
    _invocation: CommandInvocation<'_>,
) -> CommandResult {
    context.presenter.set_status("Loading models...");
    CommandResult::OpenSettings
}

pub(crate) fn handle_model(
    context: &mut CommandContext<'_>,
    invocation: CommandInvocation<'_>,
) -> CommandResult {
    let Some(model) = invocation.args_opt() else {
        return handle_settings(context, invocation);
    };

    if context.coordinator.identity().model_id == model {
        context.presenter.set_status(&format!("Already using {model}"));
        return CommandResult::Continue;
    }

    context.coordinator.set_model(model);
    restart_transcript(context);
    context
        .presenter
        .set_status(&format!("Switched to {model}; new conversation started"));
    CommandResult::SettingsChanged(ConfigKey::Model)
}

pub(crate) fn handle_name(
    context: &mut CommandContext<'_>,
    invocation: CommandInvocation<'_>,
) -> CommandResult {
    context
        .coordinator
        .set_user_name(invocation.args_opt().map(str::to_string));

    let status = match context.coordinator.identity().user_name.as_deref() {
        Some(name) => format!("I'll call you {name}"),
        None => "Name cleared".to_string(),
    };
    context.presenter.set_status(&status);
    CommandResult::SettingsChanged(ConfigKey::Name)
}
