//! Parameters and response shapes for chat endpoints.

use chrono::{DateTime, Utc};
use domain::chat::ChatReply;
use domain::Id;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Body for sending a chat message. A missing `session_id` makes the server
/// create a new session for the exchange.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ChatRequest {
    /// User message
    pub message: String,
    /// Session ID for conversation continuity
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Uuid>)]
    pub session_id: Option<Id>,
    /// Additional context attached to the user message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<serde_json::Value>,
}

/// The assistant's reply to a processed message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ChatResponse {
    /// Assistant response
    pub message: String,
    #[schema(value_type = Uuid)]
    pub session_id: Id,
    #[schema(value_type = Uuid)]
    pub message_id: Id,
    #[schema(value_type = String, format = DateTime)]
    pub timestamp: DateTime<Utc>,
}

impl From<ChatReply> for ChatResponse {
    fn from(reply: ChatReply) -> Self {
        Self {
            message: reply.message,
            session_id: reply.session_id,
            message_id: reply.message_id,
            timestamp: reply.timestamp,
        }
    }
}

/// Body for explicitly creating a chat session.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateSessionParams {
    /// Session title; defaulted from the session id when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Opaque session metadata bag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

/// Pagination query parameters for listing sessions. Offset is applied
/// before limit.
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListSessionsParams {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}
