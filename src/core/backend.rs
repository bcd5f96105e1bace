use std::error::Error as StdError;
use std::fmt;

use async_trait::async_trait;
use tracing::debug;

use crate::api::models::fetch_models;
use crate::api::{ChatRequest, ChatResponse, GenerateRequest};
use crate::core::message::Message;
use crate::utils::url::{construct_api_url, normalize_base_url};

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Failures reported by a chat backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The backend could not be reached at all.
    Unavailable { url: String, message: String },
    /// The backend was reached but this call failed.
    RequestFailed(String),
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Unavailable { url, message } => {
                write!(f, "Failed to connect to Ollama at {url}: {message}")
            }
            BackendError::RequestFailed(message) => write!(f, "{message}"),
        }
    }
}

impl StdError for BackendError {}

impl BackendError {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, BackendError::Unavailable { .. })
    }

    pub(crate) fn from_transport(base_url: &str, err: reqwest::Error) -> Self {
        if err.is_connect() {
            BackendError::Unavailable {
                url: normalize_base_url(base_url),
                message: err.to_string(),
            }
        } else {
            BackendError::RequestFailed(err.to_string())
        }
    }
}

/// The four operations the coordinator needs from a model server.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send the whole conversation and return the assistant reply.
    async fn chat_once(&self, model: &str, history: &[Message]) -> Result<String, BackendError>;

    /// Ids of the installed models, in server order.
    async fn list_models(&self) -> Result<Vec<String>, BackendError>;

    /// Hint the server to load `model` and keep it resident.
    async fn warm(&self, model: &str) -> Result<(), BackendError>;

    /// Hint the server to unload `model`.
    async fn release(&self, model: &str) -> Result<(), BackendError>;
}

/// [`ChatBackend`] over Ollama's HTTP API.
#[derive(Clone)]
pub struct OllamaBackend {
    client: reqwest::Client,
    base_url: String,
}

impl OllamaBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: normalize_base_url(&base_url.into()),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<T: serde::Serialize + Sync>(
        &self,
        endpoint: &str,
        body: &T,
    ) -> Result<reqwest::Response, BackendError> {
        let url = construct_api_url(&self.base_url, endpoint);
        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|err| BackendError::from_transport(&self.base_url, err))?;
        check_status(response).await
    }
}

#[async_trait]
impl ChatBackend for OllamaBackend {
    async fn chat_once(&self, model: &str, history: &[Message]) -> Result<String, BackendError> {
        debug!(model = %model, messages = history.len(), "Sending chat request");
        let response = self.post("api/chat", &ChatRequest::new(model, history)).await?;
        let body = response
            .json::<ChatResponse>()
            .await
            .map_err(|err| BackendError::RequestFailed(format!("Malformed chat response: {err}")))?;
        Ok(body.message.content)
    }

    async fn list_models(&self) -> Result<Vec<String>, BackendError> {
        fetch_models(&self.client, &self.base_url).await
    }

    async fn warm(&self, model: &str) -> Result<(), BackendError> {
        debug!(model = %model, "Warming model");
        self.post("api/chat", &ChatRequest::warm(model)).await?;
        Ok(())
    }

    async fn release(&self, model: &str) -> Result<(), BackendError> {
        debug!(model = %model, "Releasing model");
        self.post("api/generate", &GenerateRequest::release(model)).await?;
        Ok(())
    }
}

/// Turn a non-2xx response into a [`BackendError::RequestFailed`].
pub(crate) async fn check_status(
    response: reqwest::Response,
) -> Result<reqwest::Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<no body>".to_string());
    Err(BackendError::RequestFailed(format!(
        "{} (HTTP {})",
        summarize_error_body(&body),
        status.as_u16()
    )))
}

fn extract_error_summary(value: &serde_json::Value) -> Option<String> {
    let summary = value
        .get("error")
        .and_then(|v| match v {
            serde_json::Value::String(s) => Some(s.to_string()),
            serde_json::Value::Object(map) => map
                .get("message")
                .and_then(|message| message.as_str().map(str::to_owned)),
            _ => None,
        })
        .or_else(|| {
            value
                .get("message")
                .and_then(|v| v.as_str().map(str::to_owned))
        });

    summary.map(|text| text.split_whitespace().collect::<Vec<_>>().join(" "))
}

/// Short, single-line description of an error response body.
pub(crate) fn summarize_error_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty response>".to_string();
    }

    serde_json::from_str::<serde_json::Value>(trimmed)
        .ok()
        .and_then(|value| extract_error_summary(&value))
        .filter(|summary| !summary.is_empty())
        .unwrap_or_else(|| trimmed.split_whitespace().collect::<Vec<_>>().join(" "))
}
