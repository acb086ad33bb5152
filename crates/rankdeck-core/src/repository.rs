//! Repository and catalog traits.
//!
//! These traits define the persistence contracts the engine operates
//! against, decoupling the core logic from the specific storage mechanism
//! (in-memory maps, a database, a remote API).

use async_trait::async_trait;

use crate::error::Result;
use crate::item::Item;
use crate::leaderboard::{GlobalLeaderboardEntry, RankingSnapshot};
use crate::session::Session;

/// An abstract repository for session records.
///
/// Implementations must serialize mutations per session: `save` performs an
/// optimistic version check and fails with `ConcurrencyConflict` when the
/// stored record has moved past the caller's copy.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Finds a session by its ID.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Session))`: session found
    /// - `Ok(None)`: session not found
    /// - `Err(_)`: error occurred during retrieval
    async fn find_by_id(&self, session_id: &str) -> Result<Option<Session>>;

    /// Saves a session, enforcing the optimistic version check.
    ///
    /// The caller's `session.version` must equal the stored version (0 for a
    /// new record). Returns the new stored version on success.
    async fn save(&self, session: &Session) -> Result<u64>;

    /// Deletes a session. Deleting a missing session is not an error.
    async fn delete(&self, session_id: &str) -> Result<()>;

    /// Lists all stored sessions.
    async fn list_all(&self) -> Result<Vec<Session>>;
}

/// An abstract store for completed sessions' ranking snapshots.
#[async_trait]
pub trait SnapshotRepository: Send + Sync {
    /// Adds a snapshot. Fails with `Validation` if the session already
    /// contributed one — a snapshot is created exactly once per session.
    async fn add(&self, snapshot: RankingSnapshot) -> Result<()>;

    /// Atomically claims up to `limit` of the most recently completed
    /// snapshots that have not yet contributed: marks them contributed and
    /// returns them in one step, so concurrent aggregator runs can never
    /// score the same snapshot twice.
    async fn claim_pending(&self, limit: usize) -> Result<Vec<RankingSnapshot>>;

    /// Releases a claim, making the snapshot eligible again. Used when
    /// folding a claimed snapshot into the leaderboard failed.
    async fn release(&self, session_id: &str) -> Result<()>;

    /// Number of snapshots still awaiting contribution.
    async fn pending_count(&self) -> Result<usize>;

    /// Finds the snapshot emitted by a session, if any.
    async fn find_by_session(&self, session_id: &str) -> Result<Option<RankingSnapshot>>;
}

/// An abstract store for global leaderboard entries.
#[async_trait]
pub trait LeaderboardRepository: Send + Sync {
    /// Fetches the entry for an item.
    async fn get(&self, item_id: &str) -> Result<Option<GlobalLeaderboardEntry>>;

    /// Inserts or replaces an entry.
    async fn upsert(&self, entry: GlobalLeaderboardEntry) -> Result<()>;

    /// The top `limit` entries ordered by total score descending.
    async fn top(&self, limit: usize) -> Result<Vec<GlobalLeaderboardEntry>>;

    /// Number of entries on the board.
    async fn len(&self) -> Result<usize>;
}

/// The item catalog collaborator: item lookup, deck sampling, and rating
/// persistence.
#[async_trait]
pub trait ItemCatalog: Send + Sync {
    /// Uniform random sample of `size` distinct item ids for a new deck.
    ///
    /// Fails with `Validation` when `size` is zero or exceeds the catalog.
    async fn sample_deck(&self, size: usize) -> Result<Vec<String>>;

    /// Fetches one item.
    async fn get_item(&self, item_id: &str) -> Result<Option<Item>>;

    /// Persists a rating produced by the rating engine.
    ///
    /// Fails with `NotFound` for an unknown item.
    async fn update_rating(&self, item_id: &str, rating: f64) -> Result<()>;

    /// All catalog items.
    async fn all_items(&self) -> Result<Vec<Item>>;
}
