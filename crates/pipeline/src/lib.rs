//! Core invocation domain for cifix.
//!
//! This crate contains every domain concept used while handling one CI/CD
//! failure event: the triggering event and the log text pulled out of it, the
//! routing decision, the completion request/response shapes, the chat message
//! shapes, the invocation outcome, and the port traits that infrastructure
//! crates implement.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no network I/O.
//! It defines *what* is needed; the `llm` and `slack` crates define *how* to
//! supply it, and the `handler` crate sequences the calls.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`InvocationId`, `ModelName`) |
//! | [`types`] | Value types (`InvocationEvent`, `LogText`, `Outcome`, `InvocationResult`, `NotificationMessage`) |
//! | [`extract`] | Input Extractor: event → [`LogText`] |
//! | [`routing`] | Router: [`LogText`] → [`Route`] |
//! | [`completion`] | Completion request/response wire shapes and prompt construction |
//! | [`ports`] | Port traits: [`CompletionProvider`], [`ChatNotifier`] |
//! | [`errors`] | Error taxonomy and retry-policy type |
//! | [`config`] | Read-only invocation [`Settings`] |

pub mod completion;
pub mod config;
pub mod errors;
pub mod extract;
pub mod identifiers;
pub mod ports;
pub mod routing;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use completion::{
    ChatMessage, ChatRole, CompletionRequest, CompletionResponse, MAX_PROMPT_LOG_CHARS,
    SYSTEM_INSTRUCTION,
};
pub use config::{Settings, DEFAULT_API_BASE, DEFAULT_MODEL};
pub use errors::{CompletionError, ConfigurationError, NotificationError, RetryPolicy};
pub use extract::extract_logs;
pub use identifiers::{InvocationId, ModelName};
pub use ports::{ChatNotifier, CompletionProvider, DeliveryStatus};
pub use routing::{route, Route, ACTIONABLE_KEYWORDS, DEMO_KEYWORDS};
pub use types::{
    FailureReason, InvocationEvent, InvocationResult, LogText, NotificationMessage, Outcome,
    FALLBACK_LOG_EXCERPT_CHARS,
};
