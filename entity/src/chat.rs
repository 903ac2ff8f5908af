//! Chat session and message data types.
//!
//! Unlike `api_keys`, chat data is process-memory-resident only and carries no
//! persistence guarantee, so these are plain serde structs rather than SeaORM
//! entities. The domain layer owns their storage discipline.

use crate::Id;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Who authored a chat message.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

/// A single message owned by exactly one session. Messages are append-only
/// and are removed only when their session is deleted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ChatMessage {
    #[schema(value_type = Uuid)]
    pub id: Id,
    pub role: MessageRole,
    pub content: String,
    #[schema(value_type = String, format = DateTime)]
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

/// A chat session. `message_count` is derived and recomputed after every
/// append; `updated_at` is refreshed on every message exchange.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ChatSession {
    #[schema(value_type = Uuid)]
    pub id: Id,
    pub title: Option<String>,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<Utc>,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTime<Utc>,
    pub message_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_role_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&MessageRole::User).unwrap(),
            "\"user\""
        );
        assert_eq!(
            serde_json::to_string(&MessageRole::Assistant).unwrap(),
            "\"assistant\""
        );
        assert_eq!(
            serde_json::to_string(&MessageRole::System).unwrap(),
            "\"system\""
        );
    }

    #[test]
    fn message_metadata_is_omitted_when_absent() {
        let message = ChatMessage {
            id: Id::new_v4(),
            role: MessageRole::User,
            content: "hello".to_string(),
            timestamp: Utc::now(),
            metadata: None,
        };
        let value = serde_json::to_value(&message).unwrap();
        assert!(value.get("metadata").is_none());
    }
}
