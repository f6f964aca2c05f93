//! Error and retry-policy types for the cifix invocation domain.
//!
//! Only conditions that escape a component are modelled here. Input problems
//! never surface as errors: the extractor degrades them to an empty
//! [`crate::LogText`]. Routing rejections are ordinary [`crate::Outcome`]s.
//!
//! [`RetryPolicy`] is the bridge between a failed completion attempt and the
//! retry loop in the `llm` crate: any error that may be retried says so via
//! [`CompletionError::retry_policy`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Retry semantics
// ---------------------------------------------------------------------------

/// Whether an error condition is safe to retry.
///
/// Only rate-limiting (HTTP 429) from the completion service is retryable.
/// Every other failure ends the attempt loop immediately. The wait between
/// attempts belongs to the caller's back-off schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RetryPolicy {
    /// The operation may be retried.
    Retryable,
    /// The operation must not be retried.
    NonRetryable,
}

impl RetryPolicy {
    /// Returns `true` for [`RetryPolicy::Retryable`].
    pub fn is_retryable(&self) -> bool {
        matches!(self, RetryPolicy::Retryable)
    }
}

// ---------------------------------------------------------------------------
// Completion errors
// ---------------------------------------------------------------------------

/// HTTP status the completion service uses to signal rate limiting.
pub const RATE_LIMITED_STATUS: u16 = 429;

/// Failures of the completion service call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompletionError {
    /// The request never produced an HTTP response (DNS, connect, TLS, timeout).
    #[error("Completion request failed: {message}")]
    Transport {
        /// Description of the transport failure.
        message: String,
    },

    /// Every attempt was answered with HTTP 429.
    #[error("429 Too Many Requests: completion service still rate limited after {attempts} attempts")]
    RateLimitExhausted {
        /// Number of attempts made.
        attempts: u32,
    },

    /// The service answered with a non-success status.
    #[error("{status} error from completion service: {body}")]
    UpstreamStatus {
        /// HTTP status code.
        status: u16,
        /// Response body, as returned.
        body: String,
    },

    /// The service answered 2xx but the body did not have the expected shape.
    #[error("Malformed completion response: {reason}")]
    MalformedResponse {
        /// What was wrong with the body.
        reason: String,
    },

    /// The client could not be built from the supplied settings.
    #[error("Invalid completion client configuration: {message}")]
    InvalidConfiguration {
        /// Description of the problem.
        message: String,
    },
}

impl CompletionError {
    /// Whether the attempt that produced this error may be retried.
    pub fn retry_policy(&self) -> RetryPolicy {
        match self {
            CompletionError::UpstreamStatus { status, .. } if *status == RATE_LIMITED_STATUS => {
                RetryPolicy::Retryable
            }
            _ => RetryPolicy::NonRetryable,
        }
    }
}

// ---------------------------------------------------------------------------
// Notification errors
// ---------------------------------------------------------------------------

/// Failures of the chat webhook call itself.
///
/// A delivered request answered with a non-2xx status is not an error; see
/// [`crate::DeliveryStatus`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotificationError {
    /// The webhook request never produced an HTTP response.
    #[error("Webhook request failed: {message}")]
    Transport {
        /// Description of the transport failure.
        message: String,
    },

    /// The notifier could not be built from the supplied settings.
    #[error("Invalid webhook configuration: {message}")]
    InvalidConfiguration {
        /// Description of the problem.
        message: String,
    },
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Required configuration was absent or unusable.
///
/// Detected when [`crate::Settings`] are built, before any pipeline step runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// A required key was not set, or was blank.
    #[error("missing required setting {key}")]
    Missing {
        /// Name of the missing key.
        key: &'static str,
    },

    /// A key was set to an unusable value.
    #[error("invalid value for {key}: {message}")]
    Invalid {
        /// Name of the offending key.
        key: &'static str,
        /// Why the value was rejected.
        message: String,
    },
}
