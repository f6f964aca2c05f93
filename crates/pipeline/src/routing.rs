//! Router: decides what to do with the extracted logs before any external
//! call is made.

use crate::LogText;

/// Substrings that mark a demo or simulation run.
pub const DEMO_KEYWORDS: &[&str] = &["simulate", "demo"];

/// Substrings indicating the logs plausibly describe a diagnosable failure.
pub const ACTIONABLE_KEYWORDS: &[&str] = &["error", "failed", "exception", "traceback"];

/// The routing decision for one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Nothing to process.
    Empty,
    /// Post the canned demo solution; skip analysis.
    Demo,
    /// Post the "insufficient detail" notice; skip analysis.
    NotActionable,
    /// Send the logs to the completion service.
    Analyze,
}

/// Classifies `logs`. Matching is case-insensitive, and the demo check runs
/// before the actionable-keyword check.
pub fn route(logs: &LogText) -> Route {
    if logs.is_empty() {
        Route::Empty
    } else if logs.contains_any_ignore_case(DEMO_KEYWORDS) {
        Route::Demo
    } else if logs.contains_any_ignore_case(ACTIONABLE_KEYWORDS) {
        Route::Analyze
    } else {
        Route::NotActionable
    }
}
