//! Completion request/response shapes and prompt construction.
//!
//! The wire format is the chat-completions contract:
//! `{"model": .., "messages": [{"role": .., "content": ..}]}` in, and
//! `choices[0].message.content` out.

use serde::{Deserialize, Serialize};

use crate::{CompletionError, LogText, ModelName};

/// Maximum number of trailing log characters embedded in the prompt.
///
/// The end of a transcript is where the terminal failure is reported, so the
/// tail is kept and the head dropped.
pub const MAX_PROMPT_LOG_CHARS: usize = 3000;

/// System instruction sent with every analysis request.
pub const SYSTEM_INSTRUCTION: &str = "You are a helpful DevOps assistant.";

const USER_INSTRUCTION: &str = "You are a DevOps assistant helping engineers resolve CI/CD build failures. \
Analyze the following GitHub Actions logs and provide a direct, specific solution. \
Focus on identifying the error and suggesting a concrete fix.\n\n";

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    /// Sets the assistant's behaviour.
    System,
    /// Carries the logs to analyze.
    User,
}

/// One message of a completion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who authored the message.
    pub role: ChatRole,
    /// Message text.
    pub content: String,
}

impl ChatMessage {
    /// Creates a [`ChatRole::System`] message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    /// Creates a [`ChatRole::User`] message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// Payload sent to the completion service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Model the request is directed at.
    pub model: ModelName,
    /// Conversation sent to the model, system instruction first.
    pub messages: Vec<ChatMessage>,
}

impl CompletionRequest {
    /// Builds the analysis request for `logs`, embedding at most the last
    /// [`MAX_PROMPT_LOG_CHARS`] characters.
    pub fn for_logs(model: &ModelName, logs: &LogText) -> Self {
        let trimmed = logs.tail(MAX_PROMPT_LOG_CHARS);
        Self {
            model: model.clone(),
            messages: vec![
                ChatMessage::system(SYSTEM_INSTRUCTION),
                ChatMessage::user(format!("{USER_INSTRUCTION}{trimmed}")),
            ],
        }
    }

    /// Returns the content of the first user message, if any.
    pub fn user_prompt(&self) -> Option<&str> {
        self.messages
            .iter()
            .find(|message| message.role == ChatRole::User)
            .map(|message| message.content.as_str())
    }
}

// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct ResponseChoice {
    message: ResponseMessage,
}

/// Parsed reply from the completion service.
///
/// Only the fields needed to reach `choices[0].message.content` are modelled;
/// everything else in the reply is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CompletionResponse {
    choices: Vec<ResponseChoice>,
}

impl CompletionResponse {
    /// Parses a raw response body.
    pub fn from_json(body: &str) -> Result<Self, CompletionError> {
        serde_json::from_str(body).map_err(|err| CompletionError::MalformedResponse {
            reason: err.to_string(),
        })
    }

    /// Builds a response with a single choice. Intended for fakes and tests.
    pub fn with_content(content: impl Into<String>) -> Self {
        Self {
            choices: vec![ResponseChoice {
                message: ResponseMessage {
                    content: Some(content.into()),
                },
            }],
        }
    }

    /// Extracts the first choice's message content as the solution text.
    pub fn into_solution(self) -> Result<String, CompletionError> {
        let choice = self.choices.into_iter().next().ok_or_else(|| {
            CompletionError::MalformedResponse {
                reason: "response contained no choices".to_string(),
            }
        })?;
        choice
            .message
            .content
            .ok_or_else(|| CompletionError::MalformedResponse {
                reason: "first choice has no message content".to_string(),
            })
    }
}
