//! In-memory ItemCatalog implementation.
//!
//! Seeds a fixed item set and serves uniform random deck samples; rating
//! writes from the engine land here.

use std::collections::HashMap;

use async_trait::async_trait;
use rand::seq::SliceRandom;
use tokio::sync::RwLock;

use rankdeck_core::error::{RankdeckError, Result};
use rankdeck_core::item::Item;
use rankdeck_core::repository::ItemCatalog;

/// An item catalog backed by an in-memory map.
pub struct MemoryItemCatalog {
    items: RwLock<HashMap<String, Item>>,
}

impl MemoryItemCatalog {
    /// Creates a catalog seeded with `items`.
    pub fn new(items: Vec<Item>) -> Self {
        let map = items.into_iter().map(|item| (item.id.clone(), item)).collect();
        Self {
            items: RwLock::new(map),
        }
    }
}

#[async_trait]
impl ItemCatalog for MemoryItemCatalog {
    async fn sample_deck(&self, size: usize) -> Result<Vec<String>> {
        let items = self.items.read().await;
        if size == 0 {
            return Err(RankdeckError::validation("deck size must be positive"));
        }
        if size > items.len() {
            return Err(RankdeckError::validation(format!(
                "deck size {} exceeds catalog size {}",
                size,
                items.len()
            )));
        }

        let mut ids: Vec<String> = items.keys().cloned().collect();
        ids.shuffle(&mut rand::thread_rng());
        ids.truncate(size);
        Ok(ids)
    }

    async fn get_item(&self, item_id: &str) -> Result<Option<Item>> {
        let items = self.items.read().await;
        Ok(items.get(item_id).cloned())
    }

    async fn update_rating(&self, item_id: &str, rating: f64) -> Result<()> {
        let mut items = self.items.write().await;
        let item = items
            .get_mut(item_id)
            .ok_or_else(|| RankdeckError::not_found("Item", item_id))?;
        item.rating = rating;
        Ok(())
    }

    async fn all_items(&self) -> Result<Vec<Item>> {
        let items = self.items.read().await;
        Ok(items.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(n: usize) -> MemoryItemCatalog {
        let items = (0..n)
            .map(|i| Item::new(format!("it-{}", i), format!("Item {}", i)))
            .collect();
        MemoryItemCatalog::new(items)
    }

    #[tokio::test]
    async fn test_sample_is_distinct_and_sized() {
        let catalog = catalog(20);
        let deck = catalog.sample_deck(10).await.unwrap();
        assert_eq!(deck.len(), 10);

        let mut deduped = deck.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), 10);
    }

    #[tokio::test]
    async fn test_sample_rejects_bad_sizes() {
        let catalog = catalog(3);
        assert!(catalog.sample_deck(0).await.unwrap_err().is_validation());
        assert!(catalog.sample_deck(4).await.unwrap_err().is_validation());
    }

    #[tokio::test]
    async fn test_update_rating() {
        let catalog = catalog(1);
        catalog.update_rating("it-0", 1416.0).await.unwrap();
        assert_eq!(catalog.get_item("it-0").await.unwrap().unwrap().rating, 1416.0);

        assert!(catalog
            .update_rating("missing", 1400.0)
            .await
            .unwrap_err()
            .is_not_found());
    }
}
