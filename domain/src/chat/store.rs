//! Session storage contract and the default in-memory implementation.

use async_trait::async_trait;
use chrono::Utc;
use entity_api::chat::{ChatMessage, ChatSession};
use entity_api::Id;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Capability set required to back the chat service: create/get/list/delete
/// sessions plus ordered message appends. A durable backend can satisfy this
/// contract later without touching the service or its callers.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn insert(&self, session: ChatSession);

    async fn get(&self, id: Id) -> Option<ChatSession>;

    async fn list(&self) -> Vec<ChatSession>;

    /// Removes a session and its message list together. False when absent.
    async fn delete(&self, id: Id) -> bool;

    /// Appends a message to an existing session, refreshing its
    /// `message_count` and `updated_at` atomically with the append. Returns
    /// the updated session, or None when the session does not exist.
    async fn append_message(&self, session_id: Id, message: ChatMessage) -> Option<ChatSession>;

    /// Messages of one session in append order; empty when the id is unknown.
    async fn messages(&self, session_id: Id) -> Vec<ChatMessage>;
}

#[derive(Default)]
struct Inner {
    sessions: HashMap<Id, ChatSession>,
    messages: HashMap<Id, Vec<ChatMessage>>,
}

/// Process-memory store. A single lock guards both maps, which keeps the
/// session/message mappings consistent (an id is in both or in neither) and
/// serializes concurrent appends to the same session so `message_count` and
/// `updated_at` updates are never lost.
#[derive(Default)]
pub struct InMemorySessionStore {
    inner: RwLock<Inner>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn insert(&self, session: ChatSession) {
        let mut inner = self.inner.write().await;
        inner.messages.insert(session.id, Vec::new());
        inner.sessions.insert(session.id, session);
    }

    async fn get(&self, id: Id) -> Option<ChatSession> {
        self.inner.read().await.sessions.get(&id).cloned()
    }

    async fn list(&self) -> Vec<ChatSession> {
        self.inner.read().await.sessions.values().cloned().collect()
    }

    async fn delete(&self, id: Id) -> bool {
        let mut inner = self.inner.write().await;
        inner.messages.remove(&id);
        inner.sessions.remove(&id).is_some()
    }

    async fn append_message(&self, session_id: Id, message: ChatMessage) -> Option<ChatSession> {
        let mut inner = self.inner.write().await;

        // Refuse appends to unknown sessions so the two maps stay consistent.
        if !inner.sessions.contains_key(&session_id) {
            return None;
        }

        let messages = inner.messages.entry(session_id).or_default();
        messages.push(message);
        let message_count = messages.len();

        let session = inner.sessions.get_mut(&session_id)?;
        session.message_count = message_count;
        session.updated_at = Utc::now();
        Some(session.clone())
    }

    async fn messages(&self, session_id: Id) -> Vec<ChatMessage> {
        self.inner
            .read()
            .await
            .messages
            .get(&session_id)
            .cloned()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use entity_api::chat::MessageRole;
    use std::sync::Arc;

    fn session() -> ChatSession {
        let now = Utc::now();
        ChatSession {
            id: Id::new_v4(),
            title: None,
            created_at: now,
            updated_at: now,
            message_count: 0,
            metadata: None,
        }
    }

    fn message(content: &str) -> ChatMessage {
        ChatMessage {
            id: Id::new_v4(),
            role: MessageRole::User,
            content: content.to_string(),
            timestamp: Utc::now(),
            metadata: None,
        }
    }

    #[tokio::test]
    async fn append_to_unknown_session_is_refused() {
        let store = InMemorySessionStore::new();
        assert!(store.append_message(Id::new_v4(), message("hi")).await.is_none());
        assert!(store.list().await.is_empty());
    }

    #[tokio::test]
    async fn append_updates_count_and_timestamp() {
        let store = InMemorySessionStore::new();
        let session = session();
        let created = session.updated_at;
        store.insert(session.clone()).await;

        let updated = store
            .append_message(session.id, message("hi"))
            .await
            .unwrap();
        assert_eq!(updated.message_count, 1);
        assert!(updated.updated_at >= created);
    }

    #[tokio::test]
    async fn concurrent_appends_are_not_lost() {
        let store = Arc::new(InMemorySessionStore::new());
        let session = session();
        store.insert(session.clone()).await;

        let mut handles = Vec::new();
        for i in 0..16 {
            let store = Arc::clone(&store);
            let session_id = session.id;
            handles.push(tokio::spawn(async move {
                store
                    .append_message(session_id, message(&format!("m{i}")))
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(store.messages(session.id).await.len(), 16);
        assert_eq!(store.get(session.id).await.unwrap().message_count, 16);
    }
}
