//! In-memory form sessions.
//!
//! Every visitor of `/` gets a fresh `SymptomChecker` keyed by a random id.
//! The store is capped: creating a session beyond capacity evicts the oldest.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use uuid::Uuid;

use crate::checker::SymptomChecker;

pub use crate::checker::SharedChecker;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Session store lock poisoned")]
    LockPoisoned,
}

struct SessionEntry {
    checker: SharedChecker,
    created_at: Instant,
}

pub struct SessionStore {
    sessions: Mutex<HashMap<Uuid, SessionEntry>>,
    capacity: usize,
}

impl SessionStore {
    /// A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Create a new idle session, evicting the oldest one when full.
    pub fn create(&self) -> Result<(Uuid, SharedChecker), SessionError> {
        let mut sessions = self.sessions.lock().map_err(|_| SessionError::LockPoisoned)?;

        while sessions.len() >= self.capacity {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, entry)| entry.created_at)
                .map(|(id, _)| *id);
            match oldest {
                Some(id) => {
                    sessions.remove(&id);
                    tracing::debug!(session_id = %id, "Evicted oldest session");
                }
                None => break,
            }
        }

        let id = Uuid::new_v4();
        let checker: SharedChecker = Arc::new(tokio::sync::Mutex::new(SymptomChecker::new()));
        sessions.insert(
            id,
            SessionEntry {
                checker: checker.clone(),
                created_at: Instant::now(),
            },
        );
        tracing::debug!(session_id = %id, active = sessions.len(), "Session created");

        Ok((id, checker))
    }

    pub fn get(&self, id: &Uuid) -> Result<Option<SharedChecker>, SessionError> {
        let sessions = self.sessions.lock().map_err(|_| SessionError::LockPoisoned)?;
        Ok(sessions.get(id).map(|entry| entry.checker.clone()))
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Severity;

    #[test]
    fn created_session_can_be_fetched() {
        let store = SessionStore::new(4);
        let (id, _) = store.create().unwrap();
        assert!(store.get(&id).unwrap().is_some());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn unknown_session_is_none() {
        let store = SessionStore::new(4);
        assert!(store.get(&Uuid::new_v4()).unwrap().is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn oldest_session_is_evicted_at_capacity() {
        let store = SessionStore::new(2);
        let (first, _) = store.create().unwrap();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let (second, _) = store.create().unwrap();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let (third, _) = store.create().unwrap();

        assert_eq!(store.len(), 2);
        assert!(store.get(&first).unwrap().is_none());
        assert!(store.get(&second).unwrap().is_some());
        assert!(store.get(&third).unwrap().is_some());
    }

    #[test]
    fn zero_capacity_keeps_one_session() {
        let store = SessionStore::new(0);
        assert_eq!(store.capacity(), 1);
        store.create().unwrap();
        store.create().unwrap();
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn sessions_are_independent() {
        let store = SessionStore::new(4);
        let (_, a) = store.create().unwrap();
        let (_, b) = store.create().unwrap();

        a.lock().await.add_symptom("cough", Severity::Mild).unwrap();
        a.lock().await.begin_check().unwrap();

        let b = b.lock().await;
        assert!(!b.is_loading());
        assert!(b.collector().is_empty());
    }
}
