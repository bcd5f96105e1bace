use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::core::backend::{BackendError, ChatBackend};
use crate::core::message::Message;

/// Result of one background backend call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DispatchEvent {
    Reply(Result<String, BackendError>),
    Warmed {
        model: String,
        result: Result<(), BackendError>,
    },
}

pub type DispatchReceiver = mpsc::UnboundedReceiver<(DispatchEvent, u64)>;

pub struct ChatParams {
    pub backend: Arc<dyn ChatBackend>,
    pub model: String,
    pub history: Vec<Message>,
    pub cancel_token: CancellationToken,
    pub request_id: u64,
}

/// Runs backend calls on tokio tasks and hands each result back through a
/// channel tagged with the id of the request that produced it.
#[derive(Clone)]
pub struct RequestDispatcher {
    tx: mpsc::UnboundedSender<(DispatchEvent, u64)>,
}

impl RequestDispatcher {
    pub fn new() -> (Self, DispatchReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn spawn_chat(&self, params: ChatParams) {
        let tx_clone = self.tx.clone();
        tokio::spawn(async move {
            let ChatParams {
                backend,
                model,
                history,
                cancel_token,
                request_id,
            } = params;

            tokio::select! {
                result = backend.chat_once(&model, &history) => {
                    let _ = tx_clone.send((DispatchEvent::Reply(result), request_id));
                }
                _ = cancel_token.cancelled() => {
                    debug!(request_id, "Chat request cancelled");
                }
            }
        });
    }

    pub fn spawn_warm(
        &self,
        backend: Arc<dyn ChatBackend>,
        model: String,
        cancel_token: CancellationToken,
        request_id: u64,
    ) {
        let tx_clone = self.tx.clone();
        tokio::spawn(async move {
            tokio::select! {
                result = backend.warm(&model) => {
                    let _ = tx_clone.send((DispatchEvent::Warmed { model, result }, request_id));
                }
                _ = cancel_token.cancelled() => {
                    debug!(request_id, model = %model, "Warm request cancelled");
                }
            }
        });
    }

    #[cfg(test)]
    pub fn send_for_test(&self, event: DispatchEvent, request_id: u64) {
        let _ = self.tx.send((event, request_id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::StubBackend;

    #[tokio::test]
    async fn chat_result_is_tagged_with_request_id() {
        let (dispatcher, mut rx) = RequestDispatcher::new();
        let backend = Arc::new(StubBackend::replying(["hello"]));

        dispatcher.spawn_chat(ChatParams {
            backend: backend.clone(),
            model: "m".into(),
            history: vec![Message::system("s"), Message::user("hi")],
            cancel_token: CancellationToken::new(),
            request_id: 7,
        });

        let (event, id) = rx.recv().await.expect("expected reply");
        assert_eq!(id, 7);
        assert_eq!(event, DispatchEvent::Reply(Ok("hello".into())));
        assert_eq!(backend.chat_histories()[0].len(), 2);
    }

    #[tokio::test]
    async fn warm_failure_carries_model() {
        let (dispatcher, mut rx) = RequestDispatcher::new();
        let backend = Arc::new(StubBackend::new().with_warm_error("not found"));

        dispatcher.spawn_warm(backend, "ghost".into(), CancellationToken::new(), 3);

        let (event, id) = rx.recv().await.expect("expected warm result");
        assert_eq!(id, 3);
        assert_eq!(
            event,
            DispatchEvent::Warmed {
                model: "ghost".into(),
                result: Err(BackendError::RequestFailed("not found".into())),
            }
        );
    }

    #[tokio::test]
    async fn cancelled_request_sends_nothing() {
        let (dispatcher, mut rx) = RequestDispatcher::new();
        let backend = Arc::new(StubBackend::replying(["late"]).gated());
        let token = CancellationToken::new();

        dispatcher.spawn_chat(ChatParams {
            backend: backend.clone(),
            model: "m".into(),
            history: Vec::new(),
            cancel_token: token.clone(),
            request_id: 1,
        });
        token.cancel();
        tokio::task::yield_now().await;

        dispatcher.send_for_test(DispatchEvent::Reply(Ok("marker".into())), 2);
        let (event, id) = rx.recv().await.expect("expected marker");
        assert_eq!(id, 2);
        assert_eq!(event, DispatchEvent::Reply(Ok("marker".into())));
    }
}
