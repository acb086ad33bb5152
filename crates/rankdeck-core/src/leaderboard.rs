//! Global leaderboard models.
//!
//! A completed session emits one [`RankingSnapshot`]; the aggregator folds
//! each snapshot into the [`GlobalLeaderboardEntry`] set exactly once.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A completed session's top-K ranking, pending contribution to the global
/// leaderboard. Created exactly once at session completion; consumed exactly
/// once by the aggregator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingSnapshot {
    pub session_id: String,
    /// Top-K item ids, best-first.
    pub ranking: Vec<String>,
    pub completed_at: DateTime<Utc>,
    /// Flipped to true when the aggregator claims the snapshot.
    pub contributed_to_global: bool,
}

impl RankingSnapshot {
    pub fn new(session_id: impl Into<String>, ranking: Vec<String>, completed_at: DateTime<Utc>) -> Self {
        Self {
            session_id: session_id.into(),
            ranking,
            completed_at,
            contributed_to_global: false,
        }
    }
}

/// Cross-session aggregate for one item.
///
/// Mutated only by the aggregator, incrementally. `rank_sum` / `rank_count`
/// are the running aggregates that let `average_rank` be recomputed without
/// retaining per-snapshot history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalLeaderboardEntry {
    pub item_id: String,
    pub total_score: i64,
    pub appearance_count: u64,
    pub rank_sum: u64,
    pub rank_count: u64,
    pub average_rank: f64,
    pub last_updated: DateTime<Utc>,
}

impl GlobalLeaderboardEntry {
    /// A zeroed entry for an item's first appearance.
    pub fn new(item_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            item_id: item_id.into(),
            total_score: 0,
            appearance_count: 0,
            rank_sum: 0,
            rank_count: 0,
            average_rank: 0.0,
            last_updated: now,
        }
    }

    /// Folds one snapshot position into the entry: `points` awarded for the
    /// position and `rank` the 1-indexed rank observed.
    pub fn record_contribution(&mut self, points: i64, rank: u64, now: DateTime<Utc>) {
        self.total_score += points;
        self.appearance_count += 1;
        self.rank_sum += rank;
        self.rank_count += 1;
        self.average_rank = self.rank_sum as f64 / self.rank_count as f64;
        self.last_updated = now;
    }
}
