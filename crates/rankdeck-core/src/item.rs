//! Item domain model.

use serde::{Deserialize, Serialize};

use crate::rating::DEFAULT_RATING;

/// A catalog item that users swipe on and rank.
///
/// Identity (`id`, `name`) is immutable; `rating` is mutated only by the
/// rating engine as decisive comparisons accumulate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub rating: f64,
}

impl Item {
    /// Creates an item seeded with the default rating.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            rating: DEFAULT_RATING,
        }
    }
}
