//! Value types for one invocation.
//!
//! Nothing here outlives an invocation: the event is read once, the log text
//! is derived from it and only ever sliced (never mutated), and the outcome
//! decides both the chat message and the structured result handed back to the
//! host.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// The triggering event delivered by the host.
///
/// Treated as opaque JSON. The only field the pipeline reads is `body`; see
/// [`crate::extract_logs`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvocationEvent(Value);

impl InvocationEvent {
    /// Wraps an arbitrary JSON value as an event.
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Returns the `body` field, if the event is a mapping that has one.
    pub fn body(&self) -> Option<&Value> {
        self.0.as_object().and_then(|map| map.get("body"))
    }

    /// Returns the raw event value.
    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl From<Value> for InvocationEvent {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

// ---------------------------------------------------------------------------

/// The raw failure transcript extracted from an event. May be empty.
///
/// Length limits are expressed in characters (Unicode scalar values); the
/// slicing helpers never split a character.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LogText(String);

impl LogText {
    /// Wraps extracted log content.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Creates an empty [`LogText`].
    pub fn empty() -> Self {
        Self(String::new())
    }

    /// Returns the full text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if there is no text at all.
    ///
    /// Whitespace-only text is *not* empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of characters in the text.
    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }

    /// Returns the last `max_chars` characters, or the whole text if shorter.
    pub fn tail(&self, max_chars: usize) -> &str {
        let total = self.char_count();
        if total <= max_chars {
            return &self.0;
        }
        match self.0.char_indices().nth(total - max_chars) {
            Some((start, _)) => &self.0[start..],
            None => "",
        }
    }

    /// Returns the first `max_chars` characters, or the whole text if shorter.
    pub fn head(&self, max_chars: usize) -> &str {
        match self.0.char_indices().nth(max_chars) {
            Some((end, _)) => &self.0[..end],
            None => &self.0,
        }
    }

    /// Returns `true` if any of `needles` occurs in the text, ignoring case.
    ///
    /// Needles are expected to be lowercase already.
    pub fn contains_any_ignore_case(&self, needles: &[&str]) -> bool {
        let lowered = self.0.to_lowercase();
        needles.iter().any(|needle| lowered.contains(needle))
    }
}

impl std::fmt::Display for LogText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Chat messages
// ---------------------------------------------------------------------------

/// Number of leading log characters included in the analysis-failure fallback.
pub const FALLBACK_LOG_EXCERPT_CHARS: usize = 500;

const DEMO_SOLUTION_TEXT: &str = "CI/CD Failure Solution:\n\
The pipeline failed during the `Install dependencies` step due to a version conflict with `pydantic`.\n\n\
Suggested Fix:\n\
Update `requirements.txt` to specify a compatible version:\n\
```\npydantic>=1.10.0,<2.0.0\n```\n\
Then re-run the pipeline to resolve the dependency error.";

const INSUFFICIENT_DETAIL_TEXT: &str =
    "*CI/CD failure detected, but the logs didn't contain enough detail to suggest a fix.*";

/// A chat message, serialised exactly as the webhook payload `{"text": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationMessage {
    text: String,
}

impl NotificationMessage {
    /// Creates a message with arbitrary text.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// The fixed, pre-written fix posted for demo/simulation runs.
    pub fn demo_solution() -> Self {
        Self::new(DEMO_SOLUTION_TEXT)
    }

    /// The fixed notice posted when logs carry no actionable keyword.
    pub fn insufficient_detail() -> Self {
        Self::new(INSUFFICIENT_DETAIL_TEXT)
    }

    /// The message carrying an analyzed solution.
    pub fn solution(solution: &str) -> Self {
        Self::new(format!("*CI/CD Failure Solution:*\n{solution}"))
    }

    /// The fallback posted when analysis fails, with the first
    /// [`FALLBACK_LOG_EXCERPT_CHARS`] characters of the logs.
    pub fn analysis_fallback(logs: &LogText) -> Self {
        Self::new(format!(
            "*OpenAI couldn't analyze the logs.*\nPartial logs:\n{}",
            logs.head(FALLBACK_LOG_EXCERPT_CHARS)
        ))
    }

    /// Returns the message text.
    pub fn text(&self) -> &str {
        &self.text
    }
}

// ---------------------------------------------------------------------------
// Outcome and result
// ---------------------------------------------------------------------------

/// Why an invocation ended without a solution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The event carried no log text.
    NoContent,
    /// The completion service could not produce a solution.
    Analysis {
        /// Display text of the underlying failure.
        reason: String,
    },
    /// Required configuration was missing or invalid.
    Configuration {
        /// Description of the configuration problem.
        reason: String,
    },
}

/// The terminal state of one invocation.
///
/// Determines the chat message (if any) and the status code returned to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Demo/simulation logs: the fixed fix text is posted.
    DemoSolution,
    /// Logs present but without any actionable keyword.
    NoActionableContent,
    /// The completion service produced a solution.
    AnalyzedSolution {
        /// Solution text extracted from the completion response.
        solution: String,
    },
    /// The invocation failed; see [`FailureReason`].
    Failure(FailureReason),
}

impl Outcome {
    /// HTTP-style status code reported to the host.
    pub fn status_code(&self) -> u16 {
        match self {
            Outcome::DemoSolution | Outcome::AnalyzedSolution { .. } => 200,
            Outcome::NoActionableContent | Outcome::Failure(FailureReason::NoContent) => 400,
            Outcome::Failure(_) => 500,
        }
    }

    /// Short human-readable body reported to the host.
    pub fn body(&self) -> String {
        match self {
            Outcome::DemoSolution => "Demo solution sent successfully".to_string(),
            Outcome::NoActionableContent => "Logs lacked actionable detail".to_string(),
            Outcome::AnalyzedSolution { .. } => "Solution shared on Slack".to_string(),
            Outcome::Failure(FailureReason::NoContent) => "No logs to process".to_string(),
            Outcome::Failure(FailureReason::Analysis { reason }) => reason.clone(),
            Outcome::Failure(FailureReason::Configuration { reason }) => {
                format!("Configuration error: {reason}")
            }
        }
    }

    /// The chat message this outcome posts on its own.
    ///
    /// Failures return `None`: the no-content and configuration paths post
    /// nothing, and the analysis-failure fallback is built by the failure
    /// handler from the log excerpt it is given.
    pub fn notification(&self) -> Option<NotificationMessage> {
        match self {
            Outcome::DemoSolution => Some(NotificationMessage::demo_solution()),
            Outcome::NoActionableContent => Some(NotificationMessage::insufficient_detail()),
            Outcome::AnalyzedSolution { solution } => Some(NotificationMessage::solution(solution)),
            Outcome::Failure(_) => None,
        }
    }

    /// Converts the outcome into the structured result returned to the host.
    pub fn to_result(&self) -> InvocationResult {
        InvocationResult {
            status_code: self.status_code(),
            body: self.body(),
        }
    }
}

/// The structured result of an invocation: `{"statusCode": .., "body": ..}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationResult {
    /// HTTP-style status code (200, 400 or 500).
    pub status_code: u16,
    /// Short human-readable message.
    pub body: String,
}

impl InvocationResult {
    /// Returns `true` for 2xx status codes.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}
