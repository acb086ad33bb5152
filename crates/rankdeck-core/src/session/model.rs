//! Session domain model.
//!
//! This module contains the core Session entity that represents one user's
//! swipe-and-vote run through a deck. This is the "pure" model the business
//! logic layer operates on; it is independent of any storage format.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::insertion::BinaryInsertion;

/// Lifecycle status of a session.
///
/// `Active` and `Idle` accept operations (any accepted operation flips an
/// idle session back to active); `Completed` and `Expired` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    /// The session is in use and accepts swipes and votes.
    Active,
    /// No recent activity; flagged by external housekeeping, still operable.
    Idle,
    /// All deck items swiped and the session finalized. Terminal.
    Completed,
    /// Lifetime elapsed before completion. Terminal.
    Expired,
}

impl SessionStatus {
    /// Whether the session still accepts mutating operations.
    pub fn is_operable(&self) -> bool {
        matches!(self, Self::Active | Self::Idle)
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Active => "active",
            Self::Idle => "idle",
            Self::Completed => "completed",
            Self::Expired => "expired",
        };
        f.write_str(s)
    }
}

/// Binary decision on one deck item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwipeDirection {
    /// Reject.
    Left,
    /// Like; the item enters the ranking flow.
    Right,
}

/// One entry in the append-only swipe log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Swipe {
    pub item_id: String,
    pub direction: SwipeDirection,
    pub at: DateTime<Utc>,
}

/// One entry in the append-only vote log: a decisive pairwise comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vote {
    pub item_a: String,
    pub item_b: String,
    pub winner: String,
    pub at: DateTime<Utc>,
}

/// Represents one swipe session in the application's core logic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub status: SessionStatus,
    /// Fixed, ordered item ids assigned at creation. Immutable thereafter.
    pub deck: Vec<String>,
    /// Append-only swipe log.
    pub swipes: Vec<Swipe>,
    /// Append-only vote log.
    pub votes: Vec<Vote>,
    /// Best-first ordering of liked items. Duplicate-free; always a subset
    /// of the right-swiped item ids.
    pub personal_ranking: Vec<String>,
    /// In-flight insertion run awaiting votes, if any.
    pub pending_insertion: Option<BinaryInsertion>,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub expires_at: DateTime<Utc>,
    /// Optimistic-concurrency token; bumped by the repository on every
    /// successful save. A fresh, unsaved session carries version 0.
    pub version: u64,
}

impl Session {
    /// Creates a new active session over `deck`, expiring `ttl_secs` from now.
    pub fn new(id: impl Into<String>, deck: Vec<String>, ttl_secs: i64) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            status: SessionStatus::Active,
            deck,
            swipes: Vec::new(),
            votes: Vec::new(),
            personal_ranking: Vec::new(),
            pending_insertion: None,
            created_at: now,
            last_activity: now,
            completed_at: None,
            expires_at: now + Duration::seconds(ttl_secs),
            version: 0,
        }
    }

    /// Whether `item_id` belongs to this session's deck.
    pub fn deck_contains(&self, item_id: &str) -> bool {
        self.deck.iter().any(|id| id == item_id)
    }

    /// Whether `item_id` has already been swiped in this session.
    pub fn has_swiped(&self, item_id: &str) -> bool {
        self.swipes.iter().any(|s| s.item_id == item_id)
    }

    /// Whether `item_id` was swiped right in this session.
    pub fn has_liked(&self, item_id: &str) -> bool {
        self.swipes
            .iter()
            .any(|s| s.item_id == item_id && s.direction == SwipeDirection::Right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deck(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_new_session_is_active() {
        let session = Session::new("s-1", deck(&["a", "b"]), 3600);
        assert_eq!(session.status, SessionStatus::Active);
        assert!(session.status.is_operable());
        assert!(session.swipes.is_empty());
        assert!(session.personal_ranking.is_empty());
        assert_eq!(session.version, 0);
        assert!(session.expires_at > session.created_at);
    }

    #[test]
    fn test_terminal_states_not_operable() {
        assert!(!SessionStatus::Completed.is_operable());
        assert!(!SessionStatus::Expired.is_operable());
        assert!(SessionStatus::Idle.is_operable());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(SessionStatus::Active.to_string(), "active");
        assert_eq!(SessionStatus::Expired.to_string(), "expired");
    }
}
