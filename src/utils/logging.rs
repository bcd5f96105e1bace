//! Diagnostic logging setup.
//!
//! The chat view owns the terminal, so interactive sessions only log when a
//! file is given. One-shot subcommands log to stderr.

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the filter directives, e.g. `companion=debug`.
pub const LOG_ENV: &str = "COMPANION_LOG";

const DEFAULT_DIRECTIVES: &str = "info";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget<'a> {
    Stderr,
    File(&'a Path),
    Disabled,
}

pub fn env_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|value| EnvFilter::try_new(value).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVES))
}

fn open_log_file(path: &Path) -> std::io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Install the global subscriber for `target`.
pub fn init_logging(target: LogTarget<'_>) -> Result<(), Box<dyn std::error::Error>> {
    let directives = std::env::var(LOG_ENV).ok();
    let filter = env_filter(directives.as_deref());

    let result = match target {
        LogTarget::Disabled => return Ok(()),
        LogTarget::Stderr => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init(),
        LogTarget::File(path) => {
            let file = open_log_file(path)
                .map_err(|e| format!("Failed to open log file {}: {e}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
    };

    result.map_err(|e| -> Box<dyn std::error::Error> { e })
}
