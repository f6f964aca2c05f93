use std::time::Duration;

use async_trait::async_trait;
use pipeline::{
    CompletionError, CompletionProvider, CompletionRequest, CompletionResponse, RetryPolicy,
    Settings,
};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::RetrySchedule;

/// Request header carrying the 1-based attempt number.
pub const ATTEMPT_HEADER: &str = "x-cifix-attempt";

/// Connection settings for [`OpenAiClient`].
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// Base URL, e.g. `https://api.openai.com/v1`. `/chat/completions` is
    /// appended unless already present.
    pub api_base: String,
    /// Bearer token sent in the `Authorization` header.
    pub api_key: String,
    /// Per-request timeout. `None` means no timeout.
    pub request_timeout: Option<Duration>,
    /// Back-off applied to rate-limited attempts.
    pub retry: RetrySchedule,
}

impl OpenAiConfig {
    /// Builds a config from invocation settings with the default retry schedule.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            api_base: settings.api_base().to_string(),
            api_key: settings.api_key().to_string(),
            request_timeout: settings.http_timeout(),
            retry: RetrySchedule::default(),
        }
    }
}

/// Chat-completions client with bounded retry on HTTP 429.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    config: OpenAiConfig,
}

impl OpenAiClient {
    /// Builds the HTTP client with the bearer and content-type headers set.
    ///
    /// Fails with [`CompletionError::InvalidConfiguration`] when the API key
    /// is blank or cannot be sent as a header value.
    pub fn new(config: OpenAiConfig) -> Result<Self, CompletionError> {
        if config.api_key.trim().is_empty() {
            return Err(CompletionError::InvalidConfiguration {
                message: "missing API key".to_string(),
            });
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let bearer = format!("Bearer {}", config.api_key.trim());
        let mut auth = HeaderValue::from_str(&bearer).map_err(|e| {
            CompletionError::InvalidConfiguration {
                message: format!("invalid API key header: {e}"),
            }
        })?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| CompletionError::InvalidConfiguration {
                message: e.to_string(),
            })?;

        Ok(Self { client, config })
    }

    fn chat_completions_url(&self) -> String {
        let base = self.config.api_base.trim_end_matches('/');
        if base.ends_with("/chat/completions") {
            return base.to_string();
        }

        format!("{base}/chat/completions")
    }

    async fn send_once(
        &self,
        request: &CompletionRequest,
        attempt: u32,
    ) -> Result<CompletionResponse, CompletionError> {
        let response = self
            .client
            .post(self.chat_completions_url())
            .header(ATTEMPT_HEADER, attempt.to_string())
            .json(request)
            .send()
            .await
            .map_err(|e| CompletionError::Transport {
                message: e.without_url().to_string(),
            })?;

        let status = response.status();
        info!(
            attempt,
            status = status.as_u16(),
            "Completion service responded"
        );

        let body = response
            .text()
            .await
            .map_err(|e| CompletionError::Transport {
                message: e.without_url().to_string(),
            })?;

        if !status.is_success() {
            return Err(CompletionError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        CompletionResponse::from_json(&body)
    }
}

#[async_trait]
impl CompletionProvider for OpenAiClient {
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, CompletionError> {
        let schedule = self.config.retry;
        let mut attempt = 1;
        loop {
            debug!(attempt, model = %request.model, "Calling completion service");
            let error = match self.send_once(request, attempt).await {
                Ok(response) => return Ok(response),
                Err(error) => error,
            };

            match error.retry_policy() {
                RetryPolicy::Retryable if schedule.allows_attempt_after(attempt) => {
                    let wait = schedule.delay_after(attempt);
                    warn!(
                        attempt,
                        wait_secs = wait.as_secs_f64(),
                        "Rate limited; waiting before retrying"
                    );
                    sleep(wait).await;
                    attempt += 1;
                }
                RetryPolicy::Retryable => {
                    warn!(attempt, "Rate limited on final attempt; giving up");
                    return Err(CompletionError::RateLimitExhausted { attempts: attempt });
                }
                RetryPolicy::NonRetryable => return Err(error),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(api_base: &str) -> OpenAiClient {
        OpenAiClient::new(OpenAiConfig {
            api_base: api_base.to_string(),
            api_key: "sk-test".to_string(),
            request_timeout: None,
            retry: RetrySchedule::default(),
        })
        .expect("client")
    }

    #[test]
    fn url_appends_chat_completions_once() {
        assert_eq!(
            client("https://api.openai.com/v1").chat_completions_url(),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(
            client("https://api.openai.com/v1/").chat_completions_url(),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(
            client("http://proxy.local/v1/chat/completions").chat_completions_url(),
            "http://proxy.local/v1/chat/completions"
        );
    }

    #[test]
    fn blank_api_key_is_rejected() {
        let result = OpenAiClient::new(OpenAiConfig {
            api_base: "https://api.openai.com/v1".to_string(),
            api_key: "  ".to_string(),
            request_timeout: None,
            retry: RetrySchedule::default(),
        });
        assert!(matches!(
            result,
            Err(CompletionError::InvalidConfiguration { .. })
        ));
    }
}
