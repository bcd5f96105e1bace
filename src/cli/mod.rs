//! Command-line interface parsing and handling
//!
//! Parses arguments, sets up logging and dispatches to the chat loop or to
//! one of the one-shot configuration commands.

pub mod model_list;

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{info, warn};

use crate::cli::model_list::list_models;
use crate::core::backend::{ChatBackend, OllamaBackend};
use crate::core::config::{path_display, Config, ConfigKey};
use crate::core::coordinator::{format_backend_error, ChatCoordinator};
use crate::core::startup::{load_installed_models, resolve_identity};
use crate::ui::chat_loop::{run_chat, ChatOptions};
use crate::utils::logging::{init_logging, LogTarget};
use crate::utils::url::{normalize_base_url, parse_base_url};

#[derive(Parser)]
#[command(name = "companion")]
#[command(about = "A terminal chat companion for local Ollama models")]
#[command(
    long_about = "Companion is a small terminal chat window that talks to a model served by a \
local Ollama instance. The conversation lives in memory only; the chosen model and your \
name are remembered between runs.\n\n\
Controls:\n\
  Enter             Send the message\n\
  PgUp/PgDn         Scroll through the conversation\n\
  Esc               Put the companion away (any key brings it back)\n\
  Ctrl+C            Quit\n\n\
Commands:\n\
  /clear            Start a new conversation\n\
  /bye              Start a new conversation and put the companion away\n\
  /settings         Choose the model and your name\n\
  /model <id>       Switch models\n\
  /name [name]      Set or clear your name\n\
  /help             Show help"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Model to chat with (defaults to the saved model, then the first installed one)
    #[arg(short = 'm', long, global = true, value_name = "MODEL")]
    pub model: Option<String>,

    /// Name the assistant should call you
    #[arg(short = 'n', long, global = true, value_name = "NAME")]
    pub name: Option<String>,

    /// Ollama server URL (default http://localhost:11434)
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Write diagnostic logs to the specified file
    #[arg(short = 'l', long, global = true, value_name = "FILE")]
    pub log: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat,
    /// List the models installed on the Ollama server
    Models,
    /// Set configuration values, or show them when no value is given
    Set {
        /// Configuration key to set (model, name, base-url)
        key: ConfigKey,
        /// Value to set for the key (can be multiple words)
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Option<Vec<String>>,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset (model, name, base-url)
        key: ConfigKey,
    },
}

pub fn main() -> Result<(), Box<dyn Error>> {
    tokio::runtime::Runtime::new()?.block_on(async_main())
}

fn log_target<'a>(command: &Commands, log: Option<&'a std::path::Path>) -> LogTarget<'a> {
    match (command, log) {
        (_, Some(path)) => LogTarget::File(path),
        (Commands::Chat, None) => LogTarget::Disabled,
        (_, None) => LogTarget::Stderr,
    }
}

/// Base URL from the command line, else the config, else the default.
fn resolve_base_url(cli_value: Option<&str>, config: &Config) -> Result<String, Box<dyn Error>> {
    match cli_value {
        Some(url) => Ok(parse_base_url(url)?),
        None => Ok(normalize_base_url(config.base_url_or_default())),
    }
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let command = args.command.unwrap_or(Commands::Chat);

    if let Err(e) = init_logging(log_target(&command, args.log.as_deref())) {
        eprintln!("⚠️  Logging disabled: {e}");
    }

    match command {
        Commands::Chat => start_chat(args.model, args.name, args.base_url).await,
        Commands::Models => {
            let config = Config::load_or_default();
            let base_url = resolve_base_url(args.base_url.as_deref(), &config)?;
            let configured = args.model.or(config.model);
            if let Err(e) = list_models(&base_url, configured.as_deref()).await {
                eprintln!("❌ {e}");
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Set { key, value } => {
            let mut config = Config::load()?;
            let value = value
                .map(|parts| parts.join(" "))
                .filter(|joined| !joined.trim().is_empty());

            match value {
                Some(value) => {
                    let value = if key == ConfigKey::BaseUrl {
                        match parse_base_url(&value) {
                            Ok(url) => url,
                            Err(e) => {
                                eprintln!("❌ {e}");
                                std::process::exit(1);
                            }
                        }
                    } else {
                        value.trim().to_string()
                    };
                    config.set(key, &value);
                    config.save()?;
                    println!("✅ Set {key} to: {value}");
                }
                None => config.print_all(),
            }
            Ok(())
        }
        Commands::Unset { key } => {
            let mut config = Config::load()?;
            config.unset(key);
            config.save()?;
            println!("✅ Unset {key}");
            Ok(())
        }
    }
}

async fn start_chat(
    model: Option<String>,
    name: Option<String>,
    base_url: Option<String>,
) -> Result<(), Box<dyn Error>> {
    let config_path = match Config::get_config_path() {
        Ok(path) => Some(path),
        Err(e) => {
            warn!(error = %e, "Settings will not be saved");
            None
        }
    };
    let config = config_path
        .as_deref()
        .map(Config::load_from_path_or_default)
        .unwrap_or_default();
    if let Some(path) = config_path.as_deref() {
        info!(path = %path_display(path), "Using config");
    }

    let base_url = resolve_base_url(base_url.as_deref(), &config)?;
    let backend: Arc<dyn ChatBackend> = Arc::new(OllamaBackend::new(base_url));

    let installed = match load_installed_models(Arc::clone(&backend)).await {
        Ok(models) => models,
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };

    let preferred_model = model.or(config.model);
    let user_name = name.or(config.name);
    let identity = resolve_identity(&installed, preferred_model.as_deref(), user_name)?;
    info!(model = %identity.model_id, "Starting chat");

    let mut coordinator = ChatCoordinator::new(backend, identity);
    let startup_notice = match coordinator.initialize().await {
        Ok(()) => None,
        Err(err) => {
            warn!(error = %err, "Could not preload model");
            Some(format_backend_error(&err))
        }
    };

    run_chat(
        coordinator,
        ChatOptions {
            config_path,
            startup_notice,
        },
    )
    .await
}
