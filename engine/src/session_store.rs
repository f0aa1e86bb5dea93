use crate::error::EngineError;
use crate::models::{ChatRecord, SessionRecord};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Append-only persistence boundary for sessions and their chat history.
/// Records are written once at request completion and never mutated.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn record_session(
        &self,
        session: SessionRecord,
        chats: Vec<ChatRecord>,
    ) -> Result<(), EngineError>;

    /// `None` when the session id is unknown.
    async fn history(&self, session_id: &str) -> Result<Option<Vec<ChatRecord>>, EngineError>;

    async fn ping(&self) -> bool;
}

/// Process-local store backing the service by default. An external store
/// honoring `SessionStore` can be swapped in at the composition root.
#[derive(Default)]
pub struct InMemoryStore {
    sessions: RwLock<HashMap<String, SessionRecord>>,
    chats: RwLock<HashMap<String, Vec<ChatRecord>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemoryStore {
    async fn record_session(
        &self,
        session: SessionRecord,
        chats: Vec<ChatRecord>,
    ) -> Result<(), EngineError> {
        self.chats
            .write()
            .await
            .entry(session.session_id.clone())
            .or_default()
            .extend(chats);
        self.sessions
            .write()
            .await
            .insert(session.session_id.clone(), session);
        Ok(())
    }

    async fn history(&self, session_id: &str) -> Result<Option<Vec<ChatRecord>>, EngineError> {
        Ok(self.chats.read().await.get(session_id).cloned())
    }

    async fn ping(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn session(id: &str) -> SessionRecord {
        SessionRecord {
            session_id: id.to_string(),
            document_name: "doc.pdf".to_string(),
            processing_time: 1.5,
            created_at: Utc::now(),
        }
    }

    fn chat(id: &str, question: &str, answer: &str) -> ChatRecord {
        ChatRecord {
            session_id: id.to_string(),
            question: question.to_string(),
            answer: answer.to_string(),
            timestamp: Utc::now(),
        }
    }

    #[tokio::test]
    async fn records_round_trip_in_order() {
        let store = InMemoryStore::new();
        store
            .record_session(
                session("s1"),
                vec![chat("s1", "q1", "a1"), chat("s1", "q2", "a2")],
            )
            .await
            .unwrap();

        let history = store.history("s1").await.unwrap().unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].question, "q1");
        assert_eq!(history[1].answer, "a2");
    }

    #[tokio::test]
    async fn unknown_session_yields_none() {
        let store = InMemoryStore::new();
        assert!(store.history("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn in_memory_store_is_always_reachable() {
        assert!(InMemoryStore::new().ping().await);
    }
}
