//! In-memory LeaderboardRepository implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use rankdeck_core::error::Result;
use rankdeck_core::leaderboard::GlobalLeaderboardEntry;
use rankdeck_core::repository::LeaderboardRepository;

/// A repository implementation for storing leaderboard entries in memory.
pub struct MemoryLeaderboardRepository {
    entries: RwLock<HashMap<String, GlobalLeaderboardEntry>>,
}

impl MemoryLeaderboardRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryLeaderboardRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LeaderboardRepository for MemoryLeaderboardRepository {
    async fn get(&self, item_id: &str) -> Result<Option<GlobalLeaderboardEntry>> {
        let entries = self.entries.read().await;
        Ok(entries.get(item_id).cloned())
    }

    async fn upsert(&self, entry: GlobalLeaderboardEntry) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.insert(entry.item_id.clone(), entry);
        Ok(())
    }

    async fn top(&self, limit: usize) -> Result<Vec<GlobalLeaderboardEntry>> {
        let entries = self.entries.read().await;
        let mut ranked: Vec<GlobalLeaderboardEntry> = entries.values().cloned().collect();
        // Deterministic order: score descending, item id as tie-break.
        ranked.sort_by(|a, b| {
            b.total_score
                .cmp(&a.total_score)
                .then_with(|| a.item_id.cmp(&b.item_id))
        });
        ranked.truncate(limit);
        Ok(ranked)
    }

    async fn len(&self) -> Result<usize> {
        let entries = self.entries.read().await;
        Ok(entries.len())
    }
}
