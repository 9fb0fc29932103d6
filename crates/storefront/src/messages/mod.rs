//! Chat message storage.
//!
//! Messages are best-effort state keyed by a [`ConversationId`]. Handlers
//! only see the [`MessageStore`] trait; the backing store is picked at
//! startup (Postgres when a database is configured, memory otherwise).

mod postgres;

pub use postgres::PgMessageStore;

use std::collections::HashMap;

use async_trait::async_trait;
use shopfront_core::{ChatMessage, ConversationId};
use thiserror::Error;
use tokio::sync::RwLock;

/// Errors from a message store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Append-only message log per conversation.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// All messages of a conversation in append order. Unknown
    /// conversations are empty.
    async fn get(&self, conversation: &ConversationId) -> Result<Vec<ChatMessage>, StoreError>;

    /// Append a message to a conversation.
    async fn append(
        &self,
        conversation: &ConversationId,
        message: ChatMessage,
    ) -> Result<(), StoreError>;
}

/// Process-local message store. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryMessageStore {
    conversations: RwLock<HashMap<ConversationId, Vec<ChatMessage>>>,
}

impl InMemoryMessageStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn get(&self, conversation: &ConversationId) -> Result<Vec<ChatMessage>, StoreError> {
        Ok(self
            .conversations
            .read()
            .await
            .get(conversation)
            .cloned()
            .unwrap_or_default())
    }

    async fn append(
        &self,
        conversation: &ConversationId,
        message: ChatMessage,
    ) -> Result<(), StoreError> {
        self.conversations
            .write()
            .await
            .entry(conversation.clone())
            .or_default()
            .push(message);
        Ok(())
    }
}
