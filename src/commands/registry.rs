use super::{CommandContext, CommandResult};

pub type CommandHandler = fn(&mut CommandContext<'_>, CommandInvocation<'_>) -> CommandResult;

pub struct CommandUsage {
    pub syntax: &'static str,
    pub description: &'static str,
}

pub struct Command {
    pub name: &'static str,
    pub usages: &'static [CommandUsage],
    /// Commands without arguments only match the bare token; anything
    /// after it makes the line an ordinary message.
    pub takes_args: bool,
    pub handler: CommandHandler,
}

#[derive(Clone, Copy)]
pub struct CommandInvocation<'a> {
    pub input: &'a str,
    pub args: &'a str,
}

impl<'a> CommandInvocation<'a> {
    pub fn args_opt(&self) -> Option<&'a str> {
        (!self.args.is_empty()).then_some(self.args)
    }
}

pub fn all_commands() -> &'static [Command] {
    COMMANDS
}

pub fn find_command(name: &str) -> Option<&'static Command> {
    all_commands()
        .iter()
        .find(|command| command.name == name)
}

const COMMANDS: &[Command] = &[
    Command {
        name: "help",
        usages: &[CommandUsage {
            syntax: "/help",
            description: "Show available commands.",
        }],
        takes_args: false,
        handler: super::handlers::core::handle_help,
    },
    Command {
        name: "clear",
        usages: &[CommandUsage {
            syntax: "/clear",
            description: "Forget the conversation and start over.",
        }],
        takes_args: false,
        handler: super::handlers::core::handle_clear,
    },
    Command {
        name: "bye",
        usages: &[CommandUsage {
            syntax: "/bye",
            description: "Clear the conversation and put the companion away until a key is pressed.",
        }],
        takes_args: false,
        handler: super::handlers::core::handle_bye,
    },
    Command {
        name: "settings",
        usages: &[CommandUsage {
            syntax: "/settings",
            description: "Choose the model and the name the assistant calls you.",
        }],
        takes_args: false,
        handler: super::handlers::config::handle_settings,
    },
    Command {
        name: "model",
        usages: &[
            CommandUsage {
                syntax: "/model",
                description: "Open the settings to pick a model.",
            },
            CommandUsage {
                syntax: "/model <id>",
                description: "Switch to an installed model. Starts a new conversation.",
            },
        ],
        takes_args: true,
        handler: super::handlers::config::handle_model,
    },
    Command {
        name: "name",
        usages: &[
            CommandUsage {
                syntax: "/name <name>",
                description: "Tell the assistant what to call you. Keeps the conversation.",
            },
            CommandUsage {
                syntax: "/name",
                description: "Stop using a name.",
            },
        ],
        takes_args: true,
        handler: super::handlers::config::handle_name,
    },
];
