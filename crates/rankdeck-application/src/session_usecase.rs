//! Session use case implementation.
//!
//! This module provides the `SessionUseCase` which orchestrates the session
//! state machine against the repository, catalog, and rating engine, and
//! enforces per-session serialization of operations.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use rankdeck_core::config::RankdeckConfig;
use rankdeck_core::error::{RankdeckError, Result};
use rankdeck_core::rating;
use rankdeck_core::repository::{ItemCatalog, SessionRepository, SnapshotRepository};
use rankdeck_core::session::{
    Session, SessionProgress, SwipeDirection, SwipeOutcome, VoteOutcome,
};

/// A freshly started session, as handed to the request layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartedSession {
    pub session_id: String,
    pub deck: Vec<String>,
}

/// Use case for driving swipe sessions.
///
/// `SessionUseCase` coordinates between the `SessionRepository`, the
/// `ItemCatalog`, and the session state machine to handle all per-session
/// operations while keeping mutations on one session serialized.
///
/// # Concurrency
///
/// Every operation takes the session's own mutex for its full
/// load-mutate-save span, so no two operations on the same session
/// interleave in this process; the repository's optimistic version check
/// backs that up at the persistence boundary. Operations on different
/// sessions proceed in parallel.
pub struct SessionUseCase {
    /// Repository for session records
    session_repository: Arc<dyn SessionRepository>,
    /// Store receiving completed sessions' ranking snapshots
    snapshot_repository: Arc<dyn SnapshotRepository>,
    /// Catalog collaborator: deck sampling, item lookup, rating writes
    catalog: Arc<dyn ItemCatalog>,
    /// Engine tunables
    config: RankdeckConfig,
    /// Per-session exclusion locks
    session_locks: RwLock<HashMap<String, Arc<Mutex<()>>>>,
}

impl SessionUseCase {
    /// Creates a new `SessionUseCase` instance.
    pub fn new(
        session_repository: Arc<dyn SessionRepository>,
        snapshot_repository: Arc<dyn SnapshotRepository>,
        catalog: Arc<dyn ItemCatalog>,
        config: RankdeckConfig,
    ) -> Self {
        Self {
            session_repository,
            snapshot_repository,
            catalog,
            config,
            session_locks: RwLock::new(HashMap::new()),
        }
    }

    /// Starts a new session over a randomly sampled deck.
    ///
    /// # Arguments
    ///
    /// * `deck_size` - Deck length; defaults to the configured size
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot serve a deck of the requested
    /// size or if the new record cannot be persisted.
    pub async fn start_session(&self, deck_size: Option<usize>) -> Result<StartedSession> {
        let size = deck_size.unwrap_or(self.config.deck_size);
        let deck = self.catalog.sample_deck(size).await?;

        let session_id = Uuid::new_v4().to_string();
        let session = Session::new(&session_id, deck.clone(), self.config.session_ttl_secs);
        self.session_repository.save(&session).await?;

        tracing::info!(
            "[SessionUseCase] Started session {} with deck of {}",
            session_id,
            deck.len()
        );

        Ok(StartedSession { session_id, deck })
    }

    /// Records a swipe on a deck item.
    pub async fn swipe(
        &self,
        session_id: &str,
        item_id: &str,
        direction: SwipeDirection,
    ) -> Result<SwipeOutcome> {
        let lock = self.session_lock(session_id).await;
        let _guard = lock.lock().await;

        let mut session = self.load(session_id).await?;
        match session.record_swipe(item_id, direction) {
            Ok(outcome) => {
                self.session_repository.save(&session).await?;
                tracing::debug!(
                    "[SessionUseCase] Session {} swiped {:?} on {} (vote required: {})",
                    session_id,
                    direction,
                    item_id,
                    outcome.requires_vote
                );
                Ok(outcome)
            }
            Err(err) => {
                self.persist_expiry_flip(&session, &err).await;
                Err(err)
            }
        }
    }

    /// Records a decisive vote for the session's pending comparison and
    /// applies the rating update for the compared pair.
    pub async fn vote(
        &self,
        session_id: &str,
        item_a: &str,
        item_b: &str,
        winner: &str,
    ) -> Result<VoteOutcome> {
        let lock = self.session_lock(session_id).await;
        let _guard = lock.lock().await;

        let mut session = self.load(session_id).await?;
        match session.record_vote(item_a, item_b, winner) {
            Ok(outcome) => {
                let loser = if winner == item_a { item_b } else { item_a };
                let winner_item = self
                    .catalog
                    .get_item(winner)
                    .await?
                    .ok_or_else(|| RankdeckError::unknown_item(winner))?;
                let loser_item = self
                    .catalog
                    .get_item(loser)
                    .await?
                    .ok_or_else(|| RankdeckError::unknown_item(loser))?;

                let (new_winner, new_loser) = rating::update_ratings(
                    winner_item.rating,
                    loser_item.rating,
                    self.config.k_factor,
                )?;

                self.session_repository.save(&session).await?;
                self.catalog.update_rating(winner, new_winner).await?;
                self.catalog.update_rating(loser, new_loser).await?;

                tracing::debug!(
                    "[SessionUseCase] Session {} vote: {} beat {} ({} -> {}, {} -> {})",
                    session_id,
                    winner,
                    loser,
                    winner_item.rating,
                    new_winner,
                    loser_item.rating,
                    new_loser
                );
                Ok(outcome)
            }
            Err(err) => {
                self.persist_expiry_flip(&session, &err).await;
                Err(err)
            }
        }
    }

    /// Completes a session whose deck is exhausted, emitting its ranking
    /// snapshot for later aggregation.
    pub async fn complete_session(&self, session_id: &str) -> Result<bool> {
        let lock = self.session_lock(session_id).await;
        let _guard = lock.lock().await;

        let mut session = self.load(session_id).await?;
        match session.complete(self.config.snapshot_top_k) {
            Ok(snapshot) => {
                self.session_repository.save(&session).await?;
                self.snapshot_repository.add(snapshot).await?;
                tracing::info!(
                    "[SessionUseCase] Session {} completed with {} ranked items",
                    session_id,
                    session.personal_ranking.len()
                );
                Ok(true)
            }
            Err(err) => {
                self.persist_expiry_flip(&session, &err).await;
                Err(err)
            }
        }
    }

    /// Fetches a session record for the request layer.
    pub async fn get_session(&self, session_id: &str) -> Result<Session> {
        self.load(session_id).await
    }

    /// Progress counters for a session.
    pub async fn get_progress(&self, session_id: &str) -> Result<SessionProgress> {
        Ok(self.load(session_id).await?.progress())
    }

    /// Loads a session or fails with `NotFound`.
    async fn load(&self, session_id: &str) -> Result<Session> {
        self.session_repository
            .find_by_id(session_id)
            .await?
            .ok_or_else(|| RankdeckError::not_found("Session", session_id))
    }

    /// Persists the observed-expiry transition when an operation failed
    /// because the record was found past its deadline. Best effort: the
    /// caller still receives the original error.
    async fn persist_expiry_flip(&self, session: &Session, err: &RankdeckError) {
        if !err.is_expired() {
            return;
        }
        if let Err(save_err) = self.session_repository.save(session).await {
            tracing::warn!(
                "[SessionUseCase] Failed to persist expiry of session {}: {}",
                session.id,
                save_err
            );
        }
    }

    /// Returns the exclusion lock for a session, creating it on first use.
    async fn session_lock(&self, session_id: &str) -> Arc<Mutex<()>> {
        {
            let locks = self.session_locks.read().await;
            if let Some(lock) = locks.get(session_id) {
                return lock.clone();
            }
        }

        let mut locks = self.session_locks.write().await;
        locks
            .entry(session_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
