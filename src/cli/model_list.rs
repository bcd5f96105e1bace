//! Listing the models installed on the Ollama server.

use std::error::Error;
use std::sync::Arc;

use crate::core::backend::OllamaBackend;
use crate::core::coordinator::list_sorted_models;
use crate::core::startup::SUGGESTED_MODEL;

pub async fn list_models(base_url: &str, configured: Option<&str>) -> Result<(), Box<dyn Error>> {
    let models = list_sorted_models(Arc::new(OllamaBackend::new(base_url))).await?;

    println!("🤖 Installed models at {base_url}");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!();

    for line in format_model_list(&models, configured) {
        println!("{line}");
    }
    Ok(())
}

/// One line per model, marking the configured one.
pub fn format_model_list(models: &[String], configured: Option<&str>) -> Vec<String> {
    if models.is_empty() {
        return vec![format!(
            "No models installed. Try `ollama pull {SUGGESTED_MODEL}`."
        )];
    }

    models
        .iter()
        .map(|model| {
            if Some(model.as_str()) == configured {
                format!("  • {model} (default)")
            } else {
                format!("  • {model}")
            }
        })
        .collect()
}
