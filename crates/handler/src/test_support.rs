//! In-memory fakes for the port traits.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pipeline::{
    ChatNotifier, CompletionError, CompletionProvider, CompletionRequest, CompletionResponse,
    DeliveryStatus, NotificationError, NotificationMessage,
};

/// Replays scripted replies in order and records every request.
#[derive(Clone, Default)]
pub struct ScriptedCompletion {
    replies: Arc<Mutex<VecDeque<Result<CompletionResponse, CompletionError>>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl ScriptedCompletion {
    pub fn replying(replies: Vec<Result<CompletionResponse, CompletionError>>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(replies.into())),
            requests: Arc::default(),
        }
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedCompletion {
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, CompletionError> {
        self.requests.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(CompletionError::Transport {
                    message: "no scripted reply left".to_string(),
                })
            })
    }
}

/// Records every posted message and answers with a fixed status, or fails
/// every post when built with [`RecordingNotifier::unreachable`].
#[derive(Clone)]
pub struct RecordingNotifier {
    posted: Arc<Mutex<Vec<NotificationMessage>>>,
    status: Option<u16>,
}

impl RecordingNotifier {
    pub fn answering(status: u16) -> Self {
        Self {
            posted: Arc::default(),
            status: Some(status),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            posted: Arc::default(),
            status: None,
        }
    }

    pub fn messages(&self) -> Vec<NotificationMessage> {
        self.posted.lock().unwrap().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.messages()
            .iter()
            .map(|message| message.text().to_string())
            .collect()
    }
}

#[async_trait]
impl ChatNotifier for RecordingNotifier {
    async fn post(&self, message: &NotificationMessage) -> Result<DeliveryStatus, NotificationError> {
        self.posted.lock().unwrap().push(message.clone());
        match self.status {
            Some(status) => Ok(DeliveryStatus::new(status)),
            None => Err(NotificationError::Transport {
                message: "connection refused".to_string(),
            }),
        }
    }
}
