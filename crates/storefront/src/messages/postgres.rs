//! `PostgreSQL`-backed message store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shopfront_core::{ChatMessage, ChatRole, ConversationId};
use sqlx::PgPool;
use tracing::instrument;

use super::{MessageStore, StoreError};

/// Message store persisting to the `chat_messages` table.
#[derive(Debug, Clone)]
pub struct PgMessageStore {
    pool: PgPool,
}

impl PgMessageStore {
    /// Create a store using the given pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageStore for PgMessageStore {
    #[instrument(skip(self), fields(conversation = %conversation))]
    async fn get(&self, conversation: &ConversationId) -> Result<Vec<ChatMessage>, StoreError> {
        let rows: Vec<(String, String, DateTime<Utc>)> = sqlx::query_as(
            r"
            SELECT role, content, created_at
            FROM chat_messages
            WHERE conversation_id = $1
            ORDER BY id
            ",
        )
        .bind(conversation.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(role, content, created_at)| {
                let role = role.parse::<ChatRole>().map_err(|e| {
                    StoreError::DataCorruption(format!("invalid role in database: {e}"))
                })?;
                Ok(ChatMessage {
                    role,
                    content,
                    created_at,
                })
            })
            .collect()
    }

    #[instrument(skip(self, message), fields(conversation = %conversation, role = %message.role))]
    async fn append(
        &self,
        conversation: &ConversationId,
        message: ChatMessage,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r"
            INSERT INTO chat_messages (conversation_id, role, content, created_at)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(conversation.as_str())
        .bind(message.role.as_str())
        .bind(&message.content)
        .bind(message.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
