//! Session state machine.
//!
//! Drives swipe/vote progression over the [`Session`](super::model::Session)
//! record: validates each operation against the session lifecycle, keeps the
//! append-only logs, and delegates placement of liked items to the binary
//! insertion engine. All methods are synchronous and either fully apply
//! their mutation or leave the record untouched (the sole exception is the
//! observed-expiry flip, which is a lifecycle transition, not a partial
//! write).

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{RankdeckError, Result};
use crate::insertion::{BinaryInsertion, InsertionStep};
use crate::leaderboard::RankingSnapshot;
use crate::session::model::{Session, SessionStatus, Swipe, SwipeDirection, Vote};

/// A pairwise comparison requested from the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comparison {
    pub item_a: String,
    pub item_b: String,
}

/// Result of a recorded swipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwipeOutcome {
    /// Whether the caller must collect votes before the next swipe.
    pub requires_vote: bool,
    pub next_comparison: Option<Comparison>,
}

/// Result of a recorded vote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteOutcome {
    /// Current best-first ranking after the vote was applied.
    pub personal_ranking: Vec<String>,
    pub next_comparison: Option<Comparison>,
}

/// Progress summary for the request layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionProgress {
    pub deck_size: usize,
    pub swiped: usize,
    pub liked: usize,
    pub votes_cast: usize,
    pub awaiting_vote: bool,
}

impl Session {
    /// Records a swipe on a deck item.
    ///
    /// A right swipe either places the first liked item directly into the
    /// ranking, or starts a binary insertion run whose comparisons the
    /// caller must resolve through [`record_vote`](Self::record_vote) before
    /// swiping again.
    pub fn record_swipe(
        &mut self,
        item_id: &str,
        direction: SwipeDirection,
    ) -> Result<SwipeOutcome> {
        self.ensure_operable()?;

        if !self.deck_contains(item_id) {
            return Err(RankdeckError::unknown_item(item_id));
        }
        if self.has_swiped(item_id) {
            return Err(RankdeckError::validation(format!(
                "item '{}' already swiped in session '{}'",
                item_id, self.id
            )));
        }
        if self.pending_insertion.is_some() {
            return Err(RankdeckError::validation(format!(
                "session '{}' has a comparison pending; vote before swiping",
                self.id
            )));
        }

        let now = Utc::now();
        self.swipes.push(Swipe {
            item_id: item_id.to_string(),
            direction,
            at: now,
        });
        self.touch();

        if direction == SwipeDirection::Left {
            return Ok(SwipeOutcome {
                requires_vote: false,
                next_comparison: None,
            });
        }

        let (run, step) = BinaryInsertion::start(item_id, &self.personal_ranking);
        match step {
            InsertionStep::Insert(index) => {
                // Empty ranking: the first liked item goes straight in.
                self.personal_ranking.insert(index, item_id.to_string());
                Ok(SwipeOutcome {
                    requires_vote: false,
                    next_comparison: None,
                })
            }
            InsertionStep::Compare { item_a, item_b } => {
                self.pending_insertion = Some(run);
                Ok(SwipeOutcome {
                    requires_vote: true,
                    next_comparison: Some(Comparison { item_a, item_b }),
                })
            }
        }
    }

    /// Records a decisive vote for the pending comparison.
    ///
    /// Appends to the vote log, advances the in-flight insertion run, and
    /// splices the candidate into the ranking when the run resolves.
    pub fn record_vote(&mut self, item_a: &str, item_b: &str, winner: &str) -> Result<VoteOutcome> {
        self.ensure_operable()?;

        for item_id in [item_a, item_b] {
            if !self.deck_contains(item_id) {
                return Err(RankdeckError::unknown_item(item_id));
            }
        }
        if winner != item_a && winner != item_b {
            return Err(RankdeckError::invalid_vote(format!(
                "winner '{}' is neither '{}' nor '{}'",
                winner, item_a, item_b
            )));
        }
        let Some(run) = self.pending_insertion.as_mut() else {
            return Err(RankdeckError::invalid_vote(format!(
                "session '{}' has no comparison in flight",
                self.id
            )));
        };

        let loser = if winner == item_a { item_b } else { item_a };
        let step = run.record_outcome(&self.personal_ranking, winner, loser)?;
        let candidate = run.item_id().to_string();

        let now = Utc::now();
        self.votes.push(Vote {
            item_a: item_a.to_string(),
            item_b: item_b.to_string(),
            winner: winner.to_string(),
            at: now,
        });
        self.touch();

        let next_comparison = match step {
            InsertionStep::Insert(index) => {
                self.personal_ranking.insert(index, candidate);
                self.pending_insertion = None;
                None
            }
            InsertionStep::Compare { item_a, item_b } => Some(Comparison { item_a, item_b }),
        };

        Ok(VoteOutcome {
            personal_ranking: self.personal_ranking.clone(),
            next_comparison,
        })
    }

    /// Finalizes the session once every deck item has been swiped.
    ///
    /// Transitions to `Completed` and emits the ranking snapshot that the
    /// global aggregator will later fold in — created exactly once, because
    /// a completed session rejects any further `complete` call.
    pub fn complete(&mut self, top_k: usize) -> Result<RankingSnapshot> {
        self.ensure_operable()?;

        if self.swipes.len() < self.deck.len() {
            return Err(RankdeckError::validation(format!(
                "session '{}' has {} of {} deck items swiped",
                self.id,
                self.swipes.len(),
                self.deck.len()
            )));
        }
        if self.pending_insertion.is_some() {
            return Err(RankdeckError::validation(format!(
                "session '{}' has a comparison pending; vote before completing",
                self.id
            )));
        }

        let now = Utc::now();
        self.status = SessionStatus::Completed;
        self.completed_at = Some(now);
        self.last_activity = now;

        Ok(RankingSnapshot::new(
            &self.id,
            self.personal_ranking.iter().take(top_k).cloned().collect(),
            now,
        ))
    }

    /// Progress counters for the request layer.
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            deck_size: self.deck.len(),
            swiped: self.swipes.len(),
            liked: self
                .swipes
                .iter()
                .filter(|s| s.direction == SwipeDirection::Right)
                .count(),
            votes_cast: self.votes.len(),
            awaiting_vote: self.pending_insertion.is_some(),
        }
    }

    /// Rejects operations on terminal sessions and flips an overdue record
    /// to `Expired` before failing.
    fn ensure_operable(&mut self) -> Result<()> {
        match self.status {
            SessionStatus::Completed => Err(RankdeckError::InvalidState {
                session_id: self.id.clone(),
                status: self.status.to_string(),
            }),
            SessionStatus::Expired => Err(RankdeckError::session_expired(&self.id)),
            SessionStatus::Active | SessionStatus::Idle => {
                if Utc::now() >= self.expires_at {
                    self.status = SessionStatus::Expired;
                    return Err(RankdeckError::session_expired(&self.id));
                }
                Ok(())
            }
        }
    }

    /// Refreshes activity and reactivates an idle session.
    fn touch(&mut self) {
        self.last_activity = Utc::now();
        if self.status == SessionStatus::Idle {
            self.status = SessionStatus::Active;
        }
    }
}
