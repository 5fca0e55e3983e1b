//! Chat channel abstraction
//!
//! The intake flow talks to the outside world through [`ChatChannel`]: it
//! can say something into the conversation and wait (with a deadline) for
//! the next message from the participant it is bound to. The transport
//! behind it is out of scope; this crate ships a webhook-backed
//! implementation built on [`gateway::MessageGateway`].

pub mod gateway;
pub mod webhook;

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use gateway::{GatewayChannel, MessageGateway};
pub use webhook::{ReplySink, WebhookReplySink};

/// A chat message delivered to the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomingMessage {
    pub guild_id: i64,
    pub channel_id: i64,
    pub author_id: i64,
    pub content: String,
}

/// Chat transport errors
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// The inbound side of the channel is gone; no further replies can arrive.
    #[error("chat channel closed")]
    Closed,

    #[error("failed to deliver reply: {0}")]
    Delivery(String),
}

/// A bidirectional conversation bound to one participant in one channel.
#[async_trait]
pub trait ChatChannel: Send + Sync {
    /// Send a message into the bound conversation.
    async fn say(&self, content: &str) -> Result<(), ChatError>;

    /// Wait for the next message from the bound participant.
    ///
    /// Returns `Ok(None)` when the deadline elapses first. Waiting suspends
    /// this flow only; other flows keep running.
    async fn next_reply(&mut self, timeout: Duration) -> Result<Option<IncomingMessage>, ChatError>;
}
