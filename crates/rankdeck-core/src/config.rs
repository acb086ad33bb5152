//! Engine configuration.
//!
//! All tunables live in one struct so the hosting service constructs the
//! engine with explicit, owned configuration at startup.

use serde::{Deserialize, Serialize};

/// Configuration for the Rankdeck engine.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RankdeckConfig {
    /// Number of items sampled into a new session's deck.
    pub deck_size: usize,
    /// K-factor applied on every decisive comparison.
    pub k_factor: f64,
    /// Rating assigned to an item with no prior history.
    pub default_rating: f64,
    /// How many top-ranked items a completed session contributes.
    pub snapshot_top_k: usize,
    /// Points awarded for rank position 0; each lower position gets one less.
    pub position_points: i64,
    /// Maximum snapshots folded into the leaderboard per aggregation run.
    pub aggregation_batch_size: usize,
    /// Session lifetime in seconds, measured from creation.
    pub session_ttl_secs: i64,
}

impl Default for RankdeckConfig {
    fn default() -> Self {
        Self {
            deck_size: 10,
            k_factor: crate::rating::DEFAULT_K_FACTOR,
            default_rating: crate::rating::DEFAULT_RATING,
            snapshot_top_k: 10,
            position_points: 10,
            aggregation_batch_size: 100,
            session_ttl_secs: 3600,
        }
    }
}
