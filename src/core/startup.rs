use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::core::backend::{BackendError, ChatBackend};
use crate::core::coordinator::list_sorted_models;
use crate::core::prompt::SessionIdentity;

/// Model suggested to users who have nothing installed yet.
pub const SUGGESTED_MODEL: &str = "llama3.2:3b";

/// Conditions that stop the companion before the chat opens.
#[derive(Debug)]
pub enum StartupError {
    /// The model list could not be obtained.
    Unavailable(BackendError),
    /// The server answered but has no models installed.
    NoModelsInstalled,
}

impl fmt::Display for StartupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartupError::Unavailable(err) => write!(f, "{err}"),
            StartupError::NoModelsInstalled => write!(
                f,
                "No models found. Install one with `ollama pull <model_name>` (for example `ollama pull {SUGGESTED_MODEL}`)."
            ),
        }
    }
}

impl StdError for StartupError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            StartupError::Unavailable(err) => Some(err),
            StartupError::NoModelsInstalled => None,
        }
    }
}

impl From<BackendError> for StartupError {
    fn from(err: BackendError) -> Self {
        StartupError::Unavailable(err)
    }
}

/// Fetch the sorted model list, treating an empty list as fatal.
pub async fn load_installed_models(
    backend: Arc<dyn ChatBackend>,
) -> Result<Vec<String>, StartupError> {
    let models = list_sorted_models(backend).await?;
    if models.is_empty() {
        return Err(StartupError::NoModelsInstalled);
    }
    debug!(count = models.len(), "Found installed models");
    Ok(models)
}

/// Pick the session identity from the installed models and the user's
/// preferred model and name.
///
/// The preferred model is used when it is installed; otherwise the first
/// installed model is.
pub fn resolve_identity(
    installed: &[String],
    preferred_model: Option<&str>,
    user_name: Option<String>,
) -> Result<SessionIdentity, StartupError> {
    let first = installed.first().ok_or(StartupError::NoModelsInstalled)?;

    let model = match preferred_model {
        Some(preferred) if installed.iter().any(|m| m == preferred) => preferred,
        Some(preferred) => {
            warn!(
                preferred = %preferred,
                fallback = %first,
                "Preferred model is not installed; using the first available model"
            );
            first.as_str()
        }
        None => first.as_str(),
    };

    Ok(SessionIdentity::new(model, user_name))
}
