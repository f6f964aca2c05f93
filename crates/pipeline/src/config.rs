//! Read-only invocation settings.
//!
//! Settings are resolved once, at invocation start, through a key lookup
//! function so the process environment is only touched by the composition
//! root. Missing required keys fail fast with a [`ConfigurationError`] before
//! any pipeline step runs.

use std::time::Duration;

use crate::{ConfigurationError, ModelName};

/// Default base URL of the completion service.
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Default completion model.
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Environment keys read by [`Settings::from_lookup`].
pub mod keys {
    /// Chat webhook URL. Required.
    pub const SLACK_WEBHOOK: &str = "SLACK_WEBHOOK";
    /// Completion service API key. Required.
    pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
    /// Completion service base URL. Defaults to [`super::DEFAULT_API_BASE`].
    pub const OPENAI_API_BASE: &str = "OPENAI_API_BASE";
    /// Completion model. Defaults to [`super::DEFAULT_MODEL`].
    pub const OPENAI_MODEL: &str = "OPENAI_MODEL";
    /// Per-request HTTP timeout in whole seconds. Unset means no timeout.
    pub const HTTP_TIMEOUT_SECS: &str = "CIFIX_HTTP_TIMEOUT_SECS";
}

/// Configuration for one invocation.
///
/// The webhook URL and API key are secrets; [`Settings`]'s `Debug` output
/// redacts them.
#[derive(Clone, PartialEq, Eq)]
pub struct Settings {
    webhook_url: String,
    api_key: String,
    api_base: String,
    model: ModelName,
    http_timeout: Option<Duration>,
}

impl Settings {
    /// Resolves settings through `lookup`, which returns the value of a key
    /// or `None` when it is unset. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigurationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let webhook_url = get(keys::SLACK_WEBHOOK).ok_or(ConfigurationError::Missing {
            key: keys::SLACK_WEBHOOK,
        })?;
        let api_key = get(keys::OPENAI_API_KEY).ok_or(ConfigurationError::Missing {
            key: keys::OPENAI_API_KEY,
        })?;
        let api_base = get(keys::OPENAI_API_BASE).unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let model = get(keys::OPENAI_MODEL)
            .and_then(ModelName::new)
            .or_else(|| ModelName::new(DEFAULT_MODEL))
            .ok_or(ConfigurationError::Missing {
                key: keys::OPENAI_MODEL,
            })?;
        let http_timeout = get(keys::HTTP_TIMEOUT_SECS)
            .map(|raw| parse_timeout_secs(&raw))
            .transpose()?;

        Ok(Self {
            webhook_url,
            api_key,
            api_base,
            model,
            http_timeout,
        })
    }

    /// Chat webhook URL.
    pub fn webhook_url(&self) -> &str {
        &self.webhook_url
    }

    /// Completion service API key (sent as a bearer token).
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Completion service base URL, e.g. `https://api.openai.com/v1`.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Completion model requests are directed at.
    pub fn model(&self) -> &ModelName {
        &self.model
    }

    /// Per-request HTTP timeout. `None` leaves the client's default in place.
    pub fn http_timeout(&self) -> Option<Duration> {
        self.http_timeout
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("webhook_url", &"<redacted>")
            .field("api_key", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("http_timeout", &self.http_timeout)
            .finish()
    }
}

fn parse_timeout_secs(raw: &str) -> Result<Duration, ConfigurationError> {
    match raw.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigurationError::Invalid {
            key: keys::HTTP_TIMEOUT_SECS,
            message: format!("expected a positive number of seconds, got `{raw}`"),
        }),
    }
}
