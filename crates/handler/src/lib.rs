//! cifix invocation handler.
//!
//! [`InvocationHandler`] runs the whole pipeline for one triggering event:
//!
//! ```text
//! extract_logs ─► route ─┬─ Empty ──────────────────────────► 400
//!                        ├─ Demo ─────────► notify ─────────► 200
//!                        ├─ NotActionable ► notify ─────────► 400
//!                        └─ Analyze ─► analyze ─┬─ Ok ► notify ► 200
//!                                               └─ Err ► report_failure ► 500
//! ```
//!
//! ## Architectural Layer
//!
//! **Orchestration layer.** The handler sequences calls between business
//! logic in the [`pipeline`] crate and the port traits
//! ([`pipeline::CompletionProvider`], [`pipeline::ChatNotifier`]). It owns
//! exactly one policy of its own: notification is best-effort, and a failed
//! delivery never changes the returned result.

mod analyzer;
mod invocation;
mod notify;

#[cfg(test)]
mod test_support;

pub use analyzer::analyze;
pub use invocation::{configuration_failure, InvocationHandler};
pub use notify::deliver;
