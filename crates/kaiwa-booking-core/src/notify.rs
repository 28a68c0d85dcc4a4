//! Notification channel abstraction
//!
//! Fire-and-forget; delivery is never part of booking correctness.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::{debug, error};

use crate::BookingError;

const LINE_PUSH_URL: &str = "https://api.line.me/v2/bot/message/push";

/// Notification channel trait
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send a text message to a recipient
    async fn send_text(&self, recipient: &str, text: &str) -> Result<(), BookingError>;
}

/// Notifier backed by the LINE push message API
#[derive(Clone)]
pub struct LineNotifier {
    client: Client,
    channel_access_token: String,
}

impl LineNotifier {
    /// Create a new LINE notifier
    pub fn new(channel_access_token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            channel_access_token: channel_access_token.into(),
        }
    }
}

#[async_trait]
impl Notifier for LineNotifier {
    async fn send_text(&self, recipient: &str, text: &str) -> Result<(), BookingError> {
        debug!(recipient = %recipient, "Sending confirmation message");

        let body = json!({
            "to": recipient,
            "messages": [ { "type": "text", "text": text } ],
        });

        let response = self
            .client
            .post(LINE_PUSH_URL)
            .bearer_auth(&self.channel_access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "LINE push request failed");
                BookingError::Notify(e.to_string())
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "LINE push error");
            return Err(BookingError::Notify(format!("push failed: {status}")));
        }

        Ok(())
    }
}

impl std::fmt::Debug for LineNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineNotifier").finish_non_exhaustive()
    }
}
