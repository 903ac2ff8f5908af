//! The Chat Service: session and message lifecycle plus a placeholder
//! response generator.
//!
//! Chat data is volatile and process-lifetime only. The service is an
//! explicitly constructed object handed to the HTTP layer at startup; all
//! state lives behind the [`SessionStore`] trait so a durable backend can
//! later satisfy the same contract without touching callers.

mod store;

pub use entity_api::chat::{ChatMessage, ChatSession, MessageRole};
pub use store::{InMemorySessionStore, SessionStore};

use crate::error::{DomainErrorKind, EntityErrorKind, Error, InternalErrorKind};
use crate::Id;
use chrono::{DateTime, Utc};
use log::*;
use std::sync::Arc;

/// Default page size for session listings.
pub const DEFAULT_SESSION_LIMIT: usize = 10;

/// Outcome of processing a chat message, referencing the generated
/// assistant message.
#[derive(Clone, Debug, PartialEq)]
pub struct ChatReply {
    pub message: String,
    pub session_id: Id,
    pub message_id: Id,
    pub timestamp: DateTime<Utc>,
}

#[derive(Clone)]
pub struct ChatService {
    store: Arc<dyn SessionStore>,
}

impl ChatService {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Convenience constructor backed by the default in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemorySessionStore::new()))
    }

    /// Creates a new session with an empty message list. A missing title is
    /// defaulted from the allocated id.
    pub async fn create_session(
        &self,
        title: Option<String>,
        metadata: Option<serde_json::Value>,
    ) -> ChatSession {
        let id = Id::new_v4();
        let now = Utc::now();

        let session = ChatSession {
            id,
            title: Some(title.unwrap_or_else(|| default_title(id))),
            created_at: now,
            updated_at: now,
            message_count: 0,
            metadata,
        };

        debug!("Creating chat session: {id}");

        self.store.insert(session.clone()).await;
        session
    }

    /// Processes a user message and produces the assistant's reply.
    ///
    /// When no session id is supplied, exactly one new session is created and
    /// its id is reused for the message append, so the returned session id
    /// always references the session that received the exchange. A supplied
    /// but unknown session id is NotFound.
    pub async fn process_message(
        &self,
        content: &str,
        session_id: Option<Id>,
        context: Option<serde_json::Value>,
    ) -> Result<ChatReply, Error> {
        let session = match session_id {
            Some(id) => self.store.get(id).await.ok_or_else(session_not_found)?,
            None => self.create_session(None, context.clone()).await,
        };

        let user_message = ChatMessage {
            id: Id::new_v4(),
            role: MessageRole::User,
            content: content.to_string(),
            timestamp: Utc::now(),
            metadata: context,
        };
        self.store
            .append_message(session.id, user_message)
            .await
            .ok_or_else(session_not_found)?;

        let response_content = generate_response(content);

        let assistant_message = ChatMessage {
            id: Id::new_v4(),
            role: MessageRole::Assistant,
            content: response_content.clone(),
            timestamp: Utc::now(),
            metadata: None,
        };
        let message_id = assistant_message.id;
        let timestamp = assistant_message.timestamp;
        self.store
            .append_message(session.id, assistant_message)
            .await
            .ok_or_else(session_not_found)?;

        Ok(ChatReply {
            message: response_content,
            session_id: session.id,
            message_id,
            timestamp,
        })
    }

    pub async fn get_session(&self, id: Id) -> Result<ChatSession, Error> {
        self.store.get(id).await.ok_or_else(session_not_found)
    }

    /// Lists sessions sorted by `updated_at` descending, sliced by
    /// offset-then-limit. An offset past the end yields an empty list.
    pub async fn list_sessions(&self, limit: usize, offset: usize) -> Vec<ChatSession> {
        let mut sessions = self.store.list().await;
        sessions.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        sessions.into_iter().skip(offset).take(limit).collect()
    }

    /// Deletes a session and its message list together. Returns false when
    /// the session does not exist.
    pub async fn delete_session(&self, id: Id) -> bool {
        debug!("Deleting chat session: {id}");
        self.store.delete(id).await
    }

    /// All messages of one session in chronological order. Unknown ids yield
    /// an empty list, not an error.
    pub async fn get_messages(&self, id: Id) -> Vec<ChatMessage> {
        self.store.messages(id).await
    }
}

/// Placeholder response generator deriving output solely from the input
/// text, standing in for a real model integration.
fn generate_response(message: &str) -> String {
    format!(
        "Echo: {message}. (This is a placeholder response. \
         Integrate with your AI model or MCP here.)"
    )
}

fn default_title(id: Id) -> String {
    let id = id.simple().to_string();
    format!("Chat Session {}", &id[..8])
}

fn session_not_found() -> Error {
    Error {
        source: None,
        error_kind: DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::NotFound)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn create_session_starts_empty_with_default_title() {
        let service = ChatService::in_memory();
        let session = service.create_session(None, None).await;

        assert_eq!(session.message_count, 0);
        let title = session.title.as_deref().unwrap();
        assert!(title.starts_with("Chat Session "));
        assert_eq!(title.len(), "Chat Session ".len() + 8);
        assert!(service.get_messages(session.id).await.is_empty());
    }

    #[tokio::test]
    async fn create_session_keeps_a_supplied_title_and_metadata() {
        let service = ChatService::in_memory();
        let session = service
            .create_session(
                Some("My Chat Session".to_string()),
                Some(json!({"user_id": "user-456"})),
            )
            .await;

        assert_eq!(session.title.as_deref(), Some("My Chat Session"));
        assert_eq!(session.metadata, Some(json!({"user_id": "user-456"})));
    }

    #[tokio::test]
    async fn process_message_appends_a_user_and_assistant_pair() {
        let service = ChatService::in_memory();
        let session = service.create_session(None, None).await;

        let reply = service
            .process_message("Hello, world!", Some(session.id), None)
            .await
            .unwrap();

        assert_eq!(reply.session_id, session.id);
        assert!(reply.message.contains("Echo: Hello, world!"));

        let messages = service.get_messages(session.id).await;
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, MessageRole::User);
        assert_eq!(messages[0].content, "Hello, world!");
        assert_eq!(messages[1].role, MessageRole::Assistant);
        assert_eq!(messages[1].id, reply.message_id);
    }

    #[tokio::test]
    async fn three_exchanges_leave_six_messages_in_order() {
        let service = ChatService::in_memory();
        let session = service.create_session(None, None).await;

        for content in ["one", "two", "three"] {
            service
                .process_message(content, Some(session.id), None)
                .await
                .unwrap();
        }

        let messages = service.get_messages(session.id).await;
        assert_eq!(messages.len(), 6);
        for pair in messages.windows(2) {
            assert!(pair[0].timestamp <= pair[1].timestamp);
        }
        let roles: Vec<MessageRole> = messages.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![
                MessageRole::User,
                MessageRole::Assistant,
                MessageRole::User,
                MessageRole::Assistant,
                MessageRole::User,
                MessageRole::Assistant,
            ]
        );

        let session = service.get_session(session.id).await.unwrap();
        assert_eq!(session.message_count, 6);
    }

    #[tokio::test]
    async fn implicit_session_creation_allocates_exactly_one_session() {
        let service = ChatService::in_memory();

        let reply = service
            .process_message("Hello", None, Some(json!({"user_id": "user-456"})))
            .await
            .unwrap();

        let sessions = service.list_sessions(DEFAULT_SESSION_LIMIT, 0).await;
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].id, reply.session_id);

        // The user message landed in the session the caller was told about.
        let messages = service.get_messages(reply.session_id).await;
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].content, "Hello");
        assert_eq!(messages[0].metadata, Some(json!({"user_id": "user-456"})));
    }

    #[tokio::test]
    async fn unknown_session_id_is_not_found_and_creates_nothing() {
        let service = ChatService::in_memory();

        let result = service.process_message("Hello", Some(Id::new_v4()), None).await;
        assert!(matches!(
            result.unwrap_err().error_kind,
            DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::NotFound))
        ));
        assert!(service.list_sessions(DEFAULT_SESSION_LIMIT, 0).await.is_empty());
    }

    #[tokio::test]
    async fn list_sessions_sorts_by_most_recently_updated() {
        let service = ChatService::in_memory();
        let first = service.create_session(Some("first".to_string()), None).await;
        let second = service
            .create_session(Some("second".to_string()), None)
            .await;

        // Touch the first session so it becomes the most recently updated.
        service
            .process_message("bump", Some(first.id), None)
            .await
            .unwrap();

        let sessions = service.list_sessions(1, 0).await;
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].id, first.id);

        let rest = service.list_sessions(1, 1).await;
        assert_eq!(rest[0].id, second.id);
    }

    #[tokio::test]
    async fn list_sessions_with_offset_past_the_end_is_empty() {
        let service = ChatService::in_memory();
        service.create_session(None, None).await;

        assert!(service.list_sessions(10, 5).await.is_empty());
    }

    #[tokio::test]
    async fn delete_session_removes_messages_with_it() {
        let service = ChatService::in_memory();
        let session = service.create_session(None, None).await;
        service
            .process_message("Hello", Some(session.id), None)
            .await
            .unwrap();

        assert!(service.delete_session(session.id).await);
        assert!(!service.delete_session(session.id).await);

        // Unknown id after deletion: empty list, not an error.
        assert!(service.get_messages(session.id).await.is_empty());
        assert!(service.get_session(session.id).await.is_err());
    }
}
