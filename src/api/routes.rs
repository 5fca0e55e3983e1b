//! API Routes
//!
//! Inbound chat messages arrive here as webhook POSTs and are handed to
//! the dispatcher; replies leave through the configured reply webhook.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use crate::chat::IncomingMessage;
use crate::commands::Dispatcher;
use crate::error::AppError;

/// Shared state for the message routes
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
}

/// One inbound chat message, as delivered by the transport's webhook.
#[derive(Debug, Deserialize)]
pub struct InboundMessageRequest {
    pub guild_id: i64,
    pub channel_id: i64,
    pub author_id: i64,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct InboundMessageResponse {
    pub disposition: String,
}

/// Create the message-ingest router
pub fn create_router() -> Router<AppState> {
    Router::new().route("/messages", post(ingest_message))
}

/// Accept one inbound message and route it.
///
/// Always acknowledges quickly: intake flows run as their own tasks, so a
/// participant mid-conversation never holds this handler open.
pub async fn ingest_message(
    State(state): State<AppState>,
    Json(request): Json<InboundMessageRequest>,
) -> Result<(StatusCode, Json<InboundMessageResponse>), AppError> {
    let message = IncomingMessage {
        guild_id: request.guild_id,
        channel_id: request.channel_id,
        author_id: request.author_id,
        content: request.content,
    };

    let disposition = state.dispatcher.handle(message).await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(InboundMessageResponse {
            disposition: disposition.as_str().to_string(),
        }),
    ))
}
