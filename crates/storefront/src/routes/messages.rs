//! Conversation message handlers.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use shopfront_core::{ChatMessage, ChatRole, ConversationId};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// `POST /api/messages/{conversation_id}` body.
#[derive(Debug, Deserialize)]
pub struct NewMessage {
    #[serde(default = "default_role")]
    pub role: ChatRole,
    pub content: String,
}

const fn default_role() -> ChatRole {
    ChatRole::User
}

#[derive(Debug, Serialize)]
pub struct MessageList {
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
pub struct CreatedMessage {
    pub message: ChatMessage,
}

/// All messages of a conversation, oldest first.
///
/// # Errors
///
/// Returns 500 if the message store fails.
#[instrument(skip(state), fields(conversation = %conversation_id))]
pub async fn list(
    State(state): State<AppState>,
    Path(conversation_id): Path<ConversationId>,
) -> Result<Json<MessageList>> {
    let messages = state.messages().get(&conversation_id).await?;
    Ok(Json(MessageList { messages }))
}

/// Append a message to a conversation.
///
/// # Errors
///
/// - 400 for malformed JSON, an unknown role or empty content
/// - 500 if the message store fails
#[instrument(skip(state, body), fields(conversation = %conversation_id))]
pub async fn append(
    State(state): State<AppState>,
    Path(conversation_id): Path<ConversationId>,
    body: std::result::Result<Json<NewMessage>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedMessage>)> {
    let Json(new) = body.map_err(|e| AppError::Validation(e.body_text()))?;
    if new.content.trim().is_empty() {
        return Err(AppError::Validation("content is required".to_string()));
    }

    let message = ChatMessage::new(new.role, new.content);
    state
        .messages()
        .append(&conversation_id, message.clone())
        .await?;

    Ok((StatusCode::CREATED, Json(CreatedMessage { message })))
}
