//! Delivery of rendered payloads to a Slack-compatible incoming webhook.

use std::time::Duration;
use tracing::{error, info};

use crate::error::{NotifyError, Result};
use crate::payload::Payload;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Thin wrapper around a shared `reqwest::Client`. One instance lives
/// in the app state and is reused for every delivery.
pub struct SlackClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl SlackClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// POSTs the payload as JSON to the hook URL. Non-2xx responses
    /// count as delivery failures.
    pub async fn send(&self, hook_url: &str, payload: &Payload) -> Result<()> {
        let response = self
            .client
            .post(hook_url)
            .json(payload)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            info!("Delivered notification to Slack webhook");
            Ok(())
        } else {
            error!("Slack webhook responded with status {}", status);
            Err(NotifyError::DeliveryFailed(format!(
                "webhook responded with status {}",
                status
            )))
        }
    }
}

impl Default for SlackClient {
    fn default() -> Self {
        Self::new()
    }
}
