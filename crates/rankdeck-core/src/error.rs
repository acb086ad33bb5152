//! Error types for the Rankdeck engine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire Rankdeck engine.
///
/// This provides typed, structured error variants with automatic conversion
/// from common error types via the `From` trait.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum RankdeckError {
    /// Malformed or missing input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Item is not part of the session's deck (or unknown to the catalog)
    #[error("Unknown item: '{item_id}'")]
    UnknownItem { item_id: String },

    /// Operation attempted on a session that no longer accepts it
    #[error("Invalid session state: session '{session_id}' is {status}")]
    InvalidState { session_id: String, status: String },

    /// Winner not among the compared pair, or the vote does not match the
    /// pending comparison
    #[error("Invalid vote: {0}")]
    InvalidVote(String),

    /// Session is past its expiry deadline
    #[error("Session expired: '{session_id}'")]
    SessionExpired { session_id: String },

    /// Lost per-session exclusion / stale version at the persistence boundary
    #[error("Concurrency conflict: {entity} '{id}'")]
    ConcurrencyConflict { entity: &'static str, id: String },

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Data access error (repository/storage layer)
    #[error("Data access error: {0}")]
    DataAccess(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// IO error (config file loading)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RankdeckError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates an UnknownItem error
    pub fn unknown_item(item_id: impl Into<String>) -> Self {
        Self::UnknownItem {
            item_id: item_id.into(),
        }
    }

    /// Creates an InvalidVote error
    pub fn invalid_vote(message: impl Into<String>) -> Self {
        Self::InvalidVote(message.into())
    }

    /// Creates a SessionExpired error
    pub fn session_expired(session_id: impl Into<String>) -> Self {
        Self::SessionExpired {
            session_id: session_id.into(),
        }
    }

    /// Creates a ConcurrencyConflict error
    pub fn conflict(entity: &'static str, id: impl Into<String>) -> Self {
        Self::ConcurrencyConflict {
            entity,
            id: id.into(),
        }
    }

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a DataAccess error
    pub fn data_access(message: impl Into<String>) -> Self {
        Self::DataAccess(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a Validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is an InvalidVote error
    pub fn is_invalid_vote(&self) -> bool {
        matches!(self, Self::InvalidVote(_))
    }

    /// Check if this is a SessionExpired error
    pub fn is_expired(&self) -> bool {
        matches!(self, Self::SessionExpired { .. })
    }

    /// Check if this is a ConcurrencyConflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::ConcurrencyConflict { .. })
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if the caller may safely retry the failed operation.
    ///
    /// Returns true for conflicts and data access failures, which are
    /// transient by nature. State errors (expired, completed, invalid vote)
    /// are permanent and retrying cannot succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConcurrencyConflict { .. } | Self::DataAccess(_)
        )
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for RankdeckError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for RankdeckError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for RankdeckError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, RankdeckError>`.
pub type Result<T> = std::result::Result<T, RankdeckError>;
