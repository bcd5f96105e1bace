use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::core::backend::{BackendError, ChatBackend};
use crate::core::message::Message;
use crate::ui::presenter::{Presenter, Sender};

/// Scripted in-memory backend for coordinator and dispatcher tests.
///
/// Replies are consumed in order; once the script runs out every chat call
/// answers `"ok"`. A gated stub holds each chat call until
/// [`StubBackend::open_gate`] is called once per call.
pub struct StubBackend {
    replies: Mutex<VecDeque<Result<String, BackendError>>>,
    models: Mutex<Result<Vec<String>, BackendError>>,
    warm_error: Option<BackendError>,
    release_error: Option<BackendError>,
    gate: Option<Arc<Notify>>,
    chat_histories: Mutex<Vec<Vec<Message>>>,
    calls: Mutex<Vec<String>>,
}

impl StubBackend {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            models: Mutex::new(Ok(Vec::new())),
            warm_error: None,
            release_error: None,
            gate: None,
            chat_histories: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn replying<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let stub = Self::new();
        {
            let mut queue = stub.replies.lock().unwrap();
            queue.extend(replies.into_iter().map(|reply| Ok(reply.into())));
        }
        stub
    }

    pub fn failing(message: &str) -> Self {
        let stub = Self::new();
        stub.replies
            .lock()
            .unwrap()
            .push_back(Err(BackendError::RequestFailed(message.to_string())));
        stub
    }

    pub fn with_models(self, models: &[&str]) -> Self {
        *self.models.lock().unwrap() = Ok(models.iter().map(|m| m.to_string()).collect());
        self
    }

    pub fn unreachable() -> Self {
        let stub = Self::new();
        let error = BackendError::Unavailable {
            url: "http://localhost:11434".to_string(),
            message: "connection refused".to_string(),
        };
        *stub.models.lock().unwrap() = Err(error.clone());
        stub.replies.lock().unwrap().push_back(Err(error));
        stub
    }

    pub fn with_warm_error(mut self, message: &str) -> Self {
        self.warm_error = Some(BackendError::RequestFailed(message.to_string()));
        self
    }

    pub fn with_release_error(mut self, message: &str) -> Self {
        self.release_error = Some(BackendError::RequestFailed(message.to_string()));
        self
    }

    pub fn gated(mut self) -> Self {
        self.gate = Some(Arc::new(Notify::new()));
        self
    }

    pub fn open_gate(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    pub fn chat_histories(&self) -> Vec<Vec<Message>> {
        self.chat_histories.lock().unwrap().clone()
    }

    /// Every call made so far, as `"chat:<model>"`, `"warm:<model>"`,
    /// `"release:<model>"` or `"list"`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ChatBackend for StubBackend {
    async fn chat_once(&self, model: &str, history: &[Message]) -> Result<String, BackendError> {
        self.record(format!("chat:{model}"));
        self.chat_histories.lock().unwrap().push(history.to_vec());
        let gate = self.gate.clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        let next = self.replies.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok("ok".to_string()))
    }

    async fn list_models(&self) -> Result<Vec<String>, BackendError> {
        self.record("list".to_string());
        self.models.lock().unwrap().clone()
    }

    async fn warm(&self, model: &str) -> Result<(), BackendError> {
        self.record(format!("warm:{model}"));
        match &self.warm_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    async fn release(&self, model: &str) -> Result<(), BackendError> {
        self.record(format!("release:{model}"));
        match &self.release_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

/// Presenter that records every call for later assertions.
#[derive(Default)]
pub struct RecordingPresenter {
    pub messages: Vec<(Sender, String)>,
    pub statuses: Vec<String>,
    pub settings: Option<(String, Option<String>, Vec<String>)>,
    pub input_requests: usize,
    pub clears: usize,
}

impl Presenter for RecordingPresenter {
    fn show_message(&mut self, sender: Sender, text: &str) {
        self.messages.push((sender, text.to_string()));
    }

    fn request_input(&mut self) {
        self.input_requests += 1;
    }

    fn show_settings(&mut self, current_model: &str, current_name: Option<&str>, models: Vec<String>) {
        self.settings = Some((
            current_model.to_string(),
            current_name.map(str::to_string),
            models,
        ));
    }

    fn clear_messages(&mut self) {
        self.clears += 1;
        self.messages.clear();
    }

    fn set_status(&mut self, status: &str) {
        self.statuses.push(status.to_string());
    }
}
