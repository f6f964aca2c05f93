//! cifix chat webhook adapter.
//!
//! Implements the [`pipeline::ChatNotifier`] trait for Slack incoming
//! webhooks: every message is a `POST` of `{"text": ...}` to the configured
//! URL.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** The adapter reports what happened on the wire and
//! nothing more. A delivered request is `Ok` whatever its status; the
//! best-effort policy (log and carry on) belongs to the `handler` crate.

use std::time::Duration;

use async_trait::async_trait;
use pipeline::{ChatNotifier, DeliveryStatus, NotificationError, NotificationMessage, Settings};
use tracing::debug;

/// Posts notification messages to a Slack incoming webhook.
#[derive(Debug, Clone)]
pub struct SlackWebhookNotifier {
    client: reqwest::Client,
    webhook_url: reqwest::Url,
}

impl SlackWebhookNotifier {
    /// Creates a notifier for `webhook_url` with an optional per-request timeout.
    pub fn new(webhook_url: &str, timeout: Option<Duration>) -> Result<Self, NotificationError> {
        let webhook_url = reqwest::Url::parse(webhook_url).map_err(|e| {
            NotificationError::InvalidConfiguration {
                message: format!("webhook URL is not a valid URL: {e}"),
            }
        })?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| NotificationError::InvalidConfiguration {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            webhook_url,
        })
    }

    /// Creates a notifier from invocation settings.
    pub fn from_settings(settings: &Settings) -> Result<Self, NotificationError> {
        Self::new(settings.webhook_url(), settings.http_timeout())
    }
}

#[async_trait]
impl ChatNotifier for SlackWebhookNotifier {
    async fn post(&self, message: &NotificationMessage) -> Result<DeliveryStatus, NotificationError> {
        debug!(chars = message.text().chars().count(), "Posting webhook message");
        let response = self
            .client
            .post(self.webhook_url.clone())
            .json(message)
            .send()
            .await
            // The webhook URL embeds its credential, so it is stripped from the error.
            .map_err(|e| NotificationError::Transport {
                message: e.without_url().to_string(),
            })?;

        Ok(DeliveryStatus::new(response.status().as_u16()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unparseable_webhook_urls() {
        assert!(matches!(
            SlackWebhookNotifier::new("not a url", None),
            Err(NotificationError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn accepts_https_webhook_urls() {
        assert!(SlackWebhookNotifier::new(
            "https://hooks.slack.com/services/T000/B000/XXXX",
            Some(Duration::from_secs(5))
        )
        .is_ok());
    }
}
