//! In-memory SessionRepository implementation.
//!
//! Reference implementation of the persistence contract: a `RwLock`'d map
//! with an optimistic version check on save. The version check is the
//! per-session exclusion mechanism at the persistence boundary — a stale
//! writer loses with `ConcurrencyConflict` instead of clobbering a
//! concurrent mutation.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use rankdeck_core::error::{RankdeckError, Result};
use rankdeck_core::repository::SessionRepository;
use rankdeck_core::session::Session;

/// A repository implementation for storing session records in memory.
pub struct MemorySessionRepository {
    sessions: RwLock<HashMap<String, Session>>,
}

impl MemorySessionRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemorySessionRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionRepository for MemorySessionRepository {
    async fn find_by_id(&self, session_id: &str) -> Result<Option<Session>> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(session_id).cloned())
    }

    async fn save(&self, session: &Session) -> Result<u64> {
        let mut sessions = self.sessions.write().await;

        match sessions.get(&session.id) {
            Some(stored) if stored.version != session.version => {
                return Err(RankdeckError::conflict("Session", &session.id));
            }
            None if session.version != 0 => {
                return Err(RankdeckError::conflict("Session", &session.id));
            }
            _ => {}
        }

        let mut updated = session.clone();
        updated.version = session.version + 1;
        let new_version = updated.version;
        sessions.insert(updated.id.clone(), updated);
        Ok(new_version)
    }

    async fn delete(&self, session_id: &str) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        sessions.remove(session_id);
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Session>> {
        let sessions = self.sessions.read().await;
        Ok(sessions.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(id: &str) -> Session {
        Session::new(id, vec!["a".to_string(), "b".to_string()], 3600)
    }

    #[tokio::test]
    async fn test_save_and_find() {
        let repo = MemorySessionRepository::new();
        let s = session("s-1");

        let version = repo.save(&s).await.unwrap();
        assert_eq!(version, 1);

        let found = repo.find_by_id("s-1").await.unwrap().unwrap();
        assert_eq!(found.id, "s-1");
        assert_eq!(found.version, 1);
    }

    #[tokio::test]
    async fn test_stale_save_conflicts() {
        let repo = MemorySessionRepository::new();
        let s = session("s-1");
        repo.save(&s).await.unwrap();

        // A writer still holding version 0 must lose.
        let err = repo.save(&s).await.unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_load_modify_save_round_trips() {
        let repo = MemorySessionRepository::new();
        repo.save(&session("s-1")).await.unwrap();

        let mut loaded = repo.find_by_id("s-1").await.unwrap().unwrap();
        loaded.personal_ranking.push("a".to_string());
        let version = repo.save(&loaded).await.unwrap();
        assert_eq!(version, 2);

        let reloaded = repo.find_by_id("s-1").await.unwrap().unwrap();
        assert_eq!(reloaded.personal_ranking, vec!["a".to_string()]);
    }

    #[tokio::test]
    async fn test_new_record_with_nonzero_version_conflicts() {
        let repo = MemorySessionRepository::new();
        let mut s = session("s-ghost");
        s.version = 3;
        assert!(repo.save(&s).await.unwrap_err().is_conflict());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let repo = MemorySessionRepository::new();
        repo.save(&session("s-1")).await.unwrap();
        repo.delete("s-1").await.unwrap();
        repo.delete("s-1").await.unwrap();
        assert!(repo.find_by_id("s-1").await.unwrap().is_none());
    }
}
