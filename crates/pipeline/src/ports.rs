//! Port traits implemented by the infrastructure crates.
//!
//! The handler only ever talks to the completion service and the chat webhook
//! through these traits, which keeps every routing and failure path testable
//! with in-memory fakes.

use async_trait::async_trait;

use crate::{
    CompletionError, CompletionRequest, CompletionResponse, NotificationError,
    NotificationMessage,
};

/// The LLM completion service.
///
/// Implementations own transport details, including the bounded retry on
/// rate-limiting; a returned error is final.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Sends `request` and returns the parsed reply.
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, CompletionError>;
}

/// The team chat webhook.
#[async_trait]
pub trait ChatNotifier: Send + Sync {
    /// Posts `message`. A response with any status is `Ok`; only a request
    /// that produced no response is an error.
    async fn post(&self, message: &NotificationMessage) -> Result<DeliveryStatus, NotificationError>;
}

/// HTTP status observed when a webhook request was delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryStatus(u16);

impl DeliveryStatus {
    /// Wraps a raw HTTP status code.
    pub fn new(status: u16) -> Self {
        Self(status)
    }

    /// Returns the raw status code.
    pub fn as_u16(self) -> u16 {
        self.0
    }

    /// Returns `true` for 2xx statuses.
    pub fn is_success(self) -> bool {
        (200..300).contains(&self.0)
    }
}

impl std::fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
