//! cifix completion service adapter.
//!
//! Implements the [`pipeline::CompletionProvider`] trait for an OpenAI-style
//! chat-completions endpoint.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** HTTP transport, bearer authentication, response
//! parsing, and the bounded retry on rate-limiting all live here. The
//! [`pipeline`] crate sees only [`pipeline::CompletionProvider`].
//!
//! ## Retry
//!
//! At most [`RetrySchedule::max_attempts`] requests are made per completion.
//! Only HTTP 429 is retried, after a linear wait of `backoff_step * attempt`
//! (2 s, then 4 s by default). Any other outcome ends the loop at once.

mod openai;
mod retry;

pub use openai::{OpenAiClient, OpenAiConfig, ATTEMPT_HEADER};
pub use retry::{RetrySchedule, DEFAULT_BACKOFF_STEP, DEFAULT_MAX_ATTEMPTS};
