//! Chat messages kept alongside a storefront conversation.
//!
//! Messages are best-effort state keyed by an external conversation ID. They
//! are append-only and ordered by append order within a conversation.

use core::fmt;
use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown [`ChatRole`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid chat role: {0}")]
pub struct ChatRoleError(pub String);

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Assistant,
    System,
}

impl ChatRole {
    /// Storage name of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::System => "system",
        }
    }
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChatRole {
    type Err = ChatRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "assistant" => Ok(Self::Assistant),
            "system" => Ok(Self::System),
            _ => Err(ChatRoleError(s.to_owned())),
        }
    }
}

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Create a message stamped with the current time.
    #[must_use]
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_role_roundtrip() {
        for role in [ChatRole::User, ChatRole::Assistant, ChatRole::System] {
            assert_eq!(role.as_str().parse::<ChatRole>().unwrap(), role);
        }
        assert!("tool".parse::<ChatRole>().is_err());
    }

    #[test]
    fn test_message_serializes_camel_case() {
        let msg = ChatMessage::new(ChatRole::User, "hello");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "user");
        assert_eq!(json["content"], "hello");
        assert!(json.get("createdAt").is_some());
    }
}
