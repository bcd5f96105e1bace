//! Conversation session coordinator.
//!
//! [`ChatCoordinator`] is the single authority for what gets sent to the
//! backend. It owns the [`ConversationStore`] and the [`SessionIdentity`],
//! runs at most one chat request at a time on a background task, and
//! applies completions only when the presentation loop asks for them via
//! [`ChatCoordinator::process_events`] or [`ChatCoordinator::next_event`].
//! The response callback therefore always runs on the loop that owns the
//! coordinator, never on a background task.

use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::api::models::sort_models;
use crate::core::backend::{BackendError, ChatBackend};
use crate::core::conversation::ConversationStore;
use crate::core::dispatch::{ChatParams, DispatchEvent, DispatchReceiver, RequestDispatcher};
use crate::core::message::Role;
use crate::core::prompt::{SessionIdentity, WELCOME_TEXT};

/// Outcome of a background call, as delivered to the response callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatResponse {
    pub ok: bool,
    pub text: String,
}

impl ChatResponse {
    pub fn reply(text: impl Into<String>) -> Self {
        Self {
            ok: true,
            text: text.into(),
        }
    }

    pub fn error(err: &BackendError) -> Self {
        Self {
            ok: false,
            text: format_backend_error(err),
        }
    }
}

pub fn format_backend_error(err: &BackendError) -> String {
    format!("⚠️ Error: {err}")
}

/// Query `backend` for installed models, sorted case-insensitively.
pub fn list_sorted_models(
    backend: Arc<dyn ChatBackend>,
) -> impl Future<Output = Result<Vec<String>, BackendError>> + Send + 'static {
    async move {
        let mut models = backend.list_models().await?;
        sort_models(&mut models);
        Ok(models)
    }
}

pub type ResponseCallback = Box<dyn FnMut(ChatResponse)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendError {
    /// Input was empty after trimming.
    Empty,
    /// A reply is still outstanding.
    Busy,
}

impl fmt::Display for SendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SendError::Empty => write!(f, "Nothing to send"),
            SendError::Busy => write!(f, "Still waiting for the previous reply"),
        }
    }
}

impl StdError for SendError {}

struct PendingRequest {
    id: u64,
    cancel_token: CancellationToken,
}

pub struct ChatCoordinator {
    backend: Arc<dyn ChatBackend>,
    identity: SessionIdentity,
    conversation: ConversationStore,
    dispatcher: RequestDispatcher,
    events: DispatchReceiver,
    pending: Option<PendingRequest>,
    next_request_id: u64,
    shutdown_token: CancellationToken,
    on_response: Option<ResponseCallback>,
}

impl ChatCoordinator {
    pub fn new(backend: Arc<dyn ChatBackend>, identity: SessionIdentity) -> Self {
        let (dispatcher, events) = RequestDispatcher::new();
        let conversation = ConversationStore::new(identity.system_prompt());
        Self {
            backend,
            identity,
            conversation,
            dispatcher,
            events,
            pending: None,
            next_request_id: 0,
            shutdown_token: CancellationToken::new(),
            on_response: None,
        }
    }

    /// Register the callback that receives every reply and error. Replaces
    /// any previously registered callback.
    pub fn set_response_callback<F>(&mut self, callback: F)
    where
        F: FnMut(ChatResponse) + 'static,
    {
        self.on_response = Some(Box::new(callback));
    }

    /// Refresh the system prompt and preload the configured model.
    ///
    /// The prompt is replaced even when the warm call fails; the error is
    /// returned for the caller to report and the session stays usable.
    pub async fn initialize(&mut self) -> Result<(), BackendError> {
        self.conversation
            .replace_system_prompt(self.identity.system_prompt());
        self.backend.warm(&self.identity.model_id).await
    }

    /// Append `text` as a user turn and request a reply in the background.
    ///
    /// Callers handle the reserved `/clear` and `/bye` tokens before this.
    pub fn send(&mut self, text: &str) -> Result<(), SendError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SendError::Empty);
        }
        if self.pending.is_some() {
            return Err(SendError::Busy);
        }

        self.conversation.append(Role::User, text);

        let request_id = self.allocate_request_id();
        let cancel_token = self.shutdown_token.child_token();
        debug!(
            request_id,
            model = %self.identity.model_id,
            messages = self.conversation.len(),
            "Dispatching chat request"
        );
        self.dispatcher.spawn_chat(ChatParams {
            backend: Arc::clone(&self.backend),
            model: self.identity.model_id.clone(),
            history: self.conversation.snapshot(),
            cancel_token: cancel_token.clone(),
            request_id,
        });
        self.pending = Some(PendingRequest {
            id: request_id,
            cancel_token,
        });
        Ok(())
    }

    /// Apply every completion that has already arrived. Returns whether
    /// anything was received.
    pub fn process_events(&mut self) -> bool {
        let mut received = false;
        while let Ok((event, request_id)) = self.events.try_recv() {
            self.apply_event(event, request_id);
            received = true;
        }
        received
    }

    /// Wait for the next completion, apply it, then apply anything else
    /// already queued.
    pub async fn next_event(&mut self) -> bool {
        match self.events.recv().await {
            Some((event, request_id)) => {
                self.apply_event(event, request_id);
                self.process_events();
                true
            }
            None => false,
        }
    }

    /// Switch models. History is discarded and the new model is warmed in
    /// the background; a warm failure arrives later through the callback.
    pub fn set_model(&mut self, model_id: impl Into<String>) {
        let model_id = model_id.into();
        debug!(model = %model_id, "Switching model");
        self.identity.set_model(model_id.clone());
        self.abandon_pending();
        self.conversation
            .reset(self.identity.system_prompt(), WELCOME_TEXT);

        let request_id = self.allocate_request_id();
        self.dispatcher.spawn_warm(
            Arc::clone(&self.backend),
            model_id,
            self.shutdown_token.child_token(),
            request_id,
        );
    }

    /// Change how the assistant addresses the user. History is kept.
    pub fn set_user_name(&mut self, name: Option<String>) {
        self.identity.set_user_name(name);
        self.conversation
            .replace_system_prompt(self.identity.system_prompt());
    }

    pub fn clear_history(&mut self) {
        self.abandon_pending();
        self.conversation
            .reset(self.identity.system_prompt(), WELCOME_TEXT);
    }

    /// Installed model ids, sorted case-insensitively.
    ///
    /// The returned future does not borrow the coordinator, so it can be
    /// awaited at startup or spawned from the presentation loop.
    pub fn list_available_models(
        &self,
    ) -> impl Future<Output = Result<Vec<String>, BackendError>> + Send + 'static {
        list_sorted_models(Arc::clone(&self.backend))
    }

    /// Cancel outstanding work and ask the backend to unload the model.
    /// Failures are logged and otherwise ignored.
    pub async fn shutdown(&mut self) {
        if let Some(pending) = self.pending.take() {
            debug!(request_id = pending.id, "Cancelling pending request");
            pending.cancel_token.cancel();
        }
        self.shutdown_token.cancel();

        if let Err(err) = self.backend.release(&self.identity.model_id).await {
            warn!(model = %self.identity.model_id, error = %err, "Failed to release model");
        }
    }

    pub fn identity(&self) -> &SessionIdentity {
        &self.identity
    }

    pub fn conversation(&self) -> &ConversationStore {
        &self.conversation
    }

    pub fn is_waiting(&self) -> bool {
        self.pending.is_some()
    }

    fn allocate_request_id(&mut self) -> u64 {
        self.next_request_id += 1;
        self.next_request_id
    }

    fn abandon_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            debug!(request_id = pending.id, "Abandoning pending request");
        }
    }

    fn apply_event(&mut self, event: DispatchEvent, request_id: u64) {
        match event {
            DispatchEvent::Reply(result) => {
                let is_current = self
                    .pending
                    .as_ref()
                    .is_some_and(|pending| pending.id == request_id);
                if !is_current {
                    debug!(request_id, "Discarding stale reply");
                    return;
                }
                self.pending = None;

                let response = match result {
                    Ok(reply) => {
                        self.conversation.append(Role::Assistant, reply.clone());
                        ChatResponse::reply(reply)
                    }
                    Err(err) => {
                        debug!(request_id, error = %err, "Chat request failed");
                        ChatResponse::error(&err)
                    }
                };
                self.notify(response);
            }
            DispatchEvent::Warmed { model, result } => match result {
                Ok(()) => debug!(request_id, model = %model, "Model warmed"),
                Err(err) if model == self.identity.model_id => {
                    warn!(model = %model, error = %err, "Failed to warm model");
                    self.notify(ChatResponse::error(&err));
                }
                Err(err) => {
                    debug!(model = %model, error = %err, "Ignoring warm failure for inactive model");
                }
            },
        }
    }

    fn notify(&mut self, response: ChatResponse) {
        if let Some(callback) = self.on_response.as_mut() {
            callback(response);
        }
    }
}
