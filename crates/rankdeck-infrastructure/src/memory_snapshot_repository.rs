//! In-memory SnapshotRepository implementation.
//!
//! The claim step is the consistency-critical part: selection and flag flip
//! happen under one write lock, so two aggregator runs can never both score
//! the same snapshot.

use async_trait::async_trait;
use tokio::sync::RwLock;

use rankdeck_core::error::{RankdeckError, Result};
use rankdeck_core::leaderboard::RankingSnapshot;
use rankdeck_core::repository::SnapshotRepository;

/// A repository implementation for storing ranking snapshots in memory.
pub struct MemorySnapshotRepository {
    snapshots: RwLock<Vec<RankingSnapshot>>,
}

impl MemorySnapshotRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self {
            snapshots: RwLock::new(Vec::new()),
        }
    }
}

impl Default for MemorySnapshotRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SnapshotRepository for MemorySnapshotRepository {
    async fn add(&self, snapshot: RankingSnapshot) -> Result<()> {
        let mut snapshots = self.snapshots.write().await;
        if snapshots.iter().any(|s| s.session_id == snapshot.session_id) {
            return Err(RankdeckError::validation(format!(
                "session '{}' already emitted a snapshot",
                snapshot.session_id
            )));
        }
        snapshots.push(snapshot);
        Ok(())
    }

    async fn claim_pending(&self, limit: usize) -> Result<Vec<RankingSnapshot>> {
        let mut snapshots = self.snapshots.write().await;

        // Most recently completed first, up to the batch limit.
        let mut eligible: Vec<usize> = snapshots
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.contributed_to_global)
            .map(|(i, _)| i)
            .collect();
        eligible.sort_by(|&a, &b| snapshots[b].completed_at.cmp(&snapshots[a].completed_at));
        eligible.truncate(limit);

        let mut claimed = Vec::with_capacity(eligible.len());
        for index in eligible {
            snapshots[index].contributed_to_global = true;
            claimed.push(snapshots[index].clone());
        }
        Ok(claimed)
    }

    async fn release(&self, session_id: &str) -> Result<()> {
        let mut snapshots = self.snapshots.write().await;
        let snapshot = snapshots
            .iter_mut()
            .find(|s| s.session_id == session_id)
            .ok_or_else(|| RankdeckError::not_found("RankingSnapshot", session_id))?;
        snapshot.contributed_to_global = false;
        Ok(())
    }

    async fn pending_count(&self) -> Result<usize> {
        let snapshots = self.snapshots.read().await;
        Ok(snapshots.iter().filter(|s| !s.contributed_to_global).count())
    }

    async fn find_by_session(&self, session_id: &str) -> Result<Option<RankingSnapshot>> {
        let snapshots = self.snapshots.read().await;
        Ok(snapshots.iter().find(|s| s.session_id == session_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn snapshot(session_id: &str, age_secs: i64) -> RankingSnapshot {
        RankingSnapshot::new(
            session_id,
            vec!["a".to_string()],
            Utc::now() - Duration::seconds(age_secs),
        )
    }

    #[tokio::test]
    async fn test_duplicate_session_snapshot_rejected() {
        let repo = MemorySnapshotRepository::new();
        repo.add(snapshot("s-1", 0)).await.unwrap();
        let err = repo.add(snapshot("s-1", 0)).await.unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_claim_marks_and_returns_most_recent() {
        let repo = MemorySnapshotRepository::new();
        repo.add(snapshot("s-old", 300)).await.unwrap();
        repo.add(snapshot("s-mid", 120)).await.unwrap();
        repo.add(snapshot("s-new", 10)).await.unwrap();

        let claimed = repo.claim_pending(2).await.unwrap();
        let ids: Vec<&str> = claimed.iter().map(|s| s.session_id.as_str()).collect();
        assert_eq!(ids, vec!["s-new", "s-mid"]);
        assert!(claimed.iter().all(|s| s.contributed_to_global));
        assert_eq!(repo.pending_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_second_claim_skips_contributed() {
        let repo = MemorySnapshotRepository::new();
        repo.add(snapshot("s-1", 0)).await.unwrap();

        assert_eq!(repo.claim_pending(10).await.unwrap().len(), 1);
        assert!(repo.claim_pending(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_release_makes_snapshot_claimable_again() {
        let repo = MemorySnapshotRepository::new();
        repo.add(snapshot("s-1", 0)).await.unwrap();
        repo.claim_pending(10).await.unwrap();

        repo.release("s-1").await.unwrap();
        assert_eq!(repo.pending_count().await.unwrap(), 1);
        assert_eq!(repo.claim_pending(10).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_release_unknown_snapshot_fails() {
        let repo = MemorySnapshotRepository::new();
        assert!(repo.release("missing").await.unwrap_err().is_not_found());
    }
}
