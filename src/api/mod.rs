//! Request and response payloads for the Ollama REST API.

pub mod models;

use serde::{Deserialize, Serialize};

use crate::core::message::Message;

/// `keep_alive` value that keeps a model resident until it is released.
pub const KEEP_RESIDENT: i64 = -1;

/// `keep_alive` value that asks the server to unload a model immediately.
pub const UNLOAD_NOW: i64 = 0;

#[derive(Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [Message],
    pub stream: bool,
    pub keep_alive: i64,
}

impl<'a> ChatRequest<'a> {
    pub fn new(model: &'a str, messages: &'a [Message]) -> Self {
        Self {
            model,
            messages,
            stream: false,
            keep_alive: KEEP_RESIDENT,
        }
    }

    /// An empty chat loads the model without generating anything.
    pub fn warm(model: &'a str) -> Self {
        Self::new(model, &[])
    }
}

#[derive(Serialize)]
pub struct GenerateRequest<'a> {
    pub model: &'a str,
    pub keep_alive: i64,
}

impl<'a> GenerateRequest<'a> {
    pub fn release(model: &'a str) -> Self {
        Self {
            model,
            keep_alive: UNLOAD_NOW,
        }
    }
}

#[derive(Deserialize)]
pub struct ChatResponseMessage {
    #[serde(default)]
    pub content: String,
}

#[derive(Deserialize)]
pub struct ChatResponse {
    pub message: ChatResponseMessage,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ModelTag {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl ModelTag {
    pub fn id(&self) -> Option<&str> {
        self.model
            .as_deref()
            .or(self.name.as_deref())
            .filter(|id| !id.is_empty())
    }
}

#[derive(Deserialize, Debug)]
pub struct TagsResponse {
    #[serde(default)]
    pub models: Vec<ModelTag>,
}
