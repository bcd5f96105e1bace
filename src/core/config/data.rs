use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::core::backend::DEFAULT_BASE_URL;

/// Settings that survive a restart. Conversation history is never stored.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Config {
    /// Model selected in the settings; validated against the installed list at startup
    pub model: Option<String>,
    /// Name the assistant should call the user
    pub name: Option<String>,
    /// Ollama server, e.g. "http://localhost:11434"
    pub base_url: Option<String>,
}

/// Keys accepted by `companion set` and `companion unset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    Model,
    Name,
    BaseUrl,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 3] = [ConfigKey::Model, ConfigKey::Name, ConfigKey::BaseUrl];

    pub fn as_str(self) -> &'static str {
        match self {
            ConfigKey::Model => "model",
            ConfigKey::Name => "name",
            ConfigKey::BaseUrl => "base-url",
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigKey {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ConfigKey::ALL
            .into_iter()
            .find(|key| key.as_str() == value)
            .ok_or_else(|| {
                let known: Vec<&str> = ConfigKey::ALL.iter().map(|key| key.as_str()).collect();
                format!(
                    "Unknown config key: {value} (expected one of: {})",
                    known.join(", ")
                )
            })
    }
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}

fn clean(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl Config {
    pub fn get(&self, key: ConfigKey) -> Option<&str> {
        match key {
            ConfigKey::Model => self.model.as_deref(),
            ConfigKey::Name => self.name.as_deref(),
            ConfigKey::BaseUrl => self.base_url.as_deref(),
        }
    }

    /// Store a trimmed value; a blank value clears the key.
    pub fn set(&mut self, key: ConfigKey, value: &str) {
        let value = clean(value);
        match key {
            ConfigKey::Model => self.model = value,
            ConfigKey::Name => self.name = value,
            ConfigKey::BaseUrl => self.base_url = value,
        }
    }

    pub fn unset(&mut self, key: ConfigKey) {
        match key {
            ConfigKey::Model => self.model = None,
            ConfigKey::Name => self.name = None,
            ConfigKey::BaseUrl => self.base_url = None,
        }
    }

    pub fn base_url_or_default(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }
}
