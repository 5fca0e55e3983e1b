//! Intake Context
//!
//! Identifies who triggered an intake flow and where, so every step waits
//! on the same participant in the same channel. Passed explicitly rather
//! than captured in closures.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Context for one intake invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntakeContext {
    /// Guild the currency will belong to
    pub guild_id: i64,

    /// Channel the triggering command was sent in
    pub channel_id: i64,

    /// Participant whose replies the flow waits for
    pub user_id: i64,

    /// Correlation ID for tracing this flow across log lines
    pub correlation_id: Uuid,
}

impl IntakeContext {
    /// Create a context with a fresh correlation ID
    pub fn new(guild_id: i64, channel_id: i64, user_id: i64) -> Self {
        Self {
            guild_id,
            channel_id,
            user_id,
            correlation_id: Uuid::new_v4(),
        }
    }

    /// Override the correlation ID (e.g. to carry one from the transport)
    pub fn with_correlation_id(mut self, correlation_id: Uuid) -> Self {
        self.correlation_id = correlation_id;
        self
    }
}
