//! Outbound reply delivery
//!
//! Prompts, rejections and report output all leave the service through a
//! [`ReplySink`]. The production implementation POSTs each reply to the
//! transport's webhook endpoint.

use async_trait::async_trait;
use serde::Serialize;

use super::ChatError;

/// Destination for outbound chat messages.
#[async_trait]
pub trait ReplySink: Send + Sync {
    async fn send(&self, channel_id: i64, content: &str) -> Result<(), ChatError>;
}

/// Wire format of one outbound reply.
#[derive(Debug, Serialize)]
struct OutboundReply<'a> {
    channel_id: i64,
    content: &'a str,
}

/// POSTs replies to a configured webhook URL.
pub struct WebhookReplySink {
    client: reqwest::Client,
    url: String,
}

impl WebhookReplySink {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl ReplySink for WebhookReplySink {
    async fn send(&self, channel_id: i64, content: &str) -> Result<(), ChatError> {
        let reply = OutboundReply { channel_id, content };

        let response = self
            .client
            .post(&self.url)
            .json(&reply)
            .send()
            .await
            .map_err(|e| ChatError::Delivery(e.to_string()))?;

        response
            .error_for_status()
            .map_err(|e| ChatError::Delivery(e.to_string()))?;

        tracing::debug!(channel_id, "reply delivered");
        Ok(())
    }
}
