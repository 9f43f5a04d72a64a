//! Price history service domain logic.
//!
//! Price history is append-only: entries are recorded, read back, and
//! removed only when their owning item is deleted.

use anyhow::Result;

use crate::domain::models::{GroceryItem, PriceHistory};
use crate::domain::months;
use crate::error::ValidationError;
use crate::storage::EntityStore;

#[derive(Clone)]
pub struct PriceHistoryService<S: EntityStore> {
    store: S,
}

impl<S: EntityStore> PriceHistoryService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn get_all(&self) -> Result<Vec<PriceHistory>> {
        Ok(self.store.get_all().await?)
    }

    /// Entries for one item, oldest first.
    pub async fn get_by_item(&self, item_id: &str) -> Result<Vec<PriceHistory>> {
        let target = item_id.to_string();
        let mut entries: Vec<PriceHistory> = self
            .store
            .filter(move |entry: &PriceHistory| entry.item_id == target)
            .await?;
        entries.sort_by(|a, b| a.date.cmp(&b.date));
        Ok(entries)
    }

    /// Append an observation of an existing item's price. `date` defaults to
    /// today.
    pub async fn record(
        &self,
        item_id: &str,
        price: f64,
        date: Option<String>,
    ) -> Result<PriceHistory> {
        if price < 0.0 {
            return Err(ValidationError::NegativeAmount("price").into());
        }
        if self.store.get::<GroceryItem>(item_id).await?.is_none() {
            return Err(
                ValidationError::MissingReference("grocery item", item_id.to_string()).into(),
            );
        }
        let entry = PriceHistory {
            id: PriceHistory::generate_id(),
            item_id: item_id.to_string(),
            price,
            date: date.unwrap_or_else(months::today),
            created_at: months::timestamp(),
        };
        self.store.put(&entry).await?;
        Ok(entry)
    }

    /// Remove every entry owned by an item. Used by the item cascade.
    pub async fn delete_by_item(&self, item_id: &str) -> Result<()> {
        for entry in self.get_by_item(item_id).await? {
            self.store.delete::<PriceHistory>(&entry.id).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::test_utils;
    use crate::storage::{EntityStore, Store};

    async fn seed_item(store: &Store, id: &str) {
        let now = months::timestamp();
        let item = GroceryItem {
            id: id.to_string(),
            list_id: None,
            name: format!("item {id}"),
            quantity: 1,
            price_per_unit: 1.0,
            total_cost: 1.0,
            is_purchased: false,
            store_location: None,
            created_at: now.clone(),
            updated_at: now,
        };
        store.put(&item).await.unwrap();
    }

    #[tokio::test]
    async fn entries_are_scoped_to_their_item_and_sorted() {
        let (_dir, store) = test_utils::json_store();
        seed_item(&store, "item_a").await;
        seed_item(&store, "item_b").await;
        let service = PriceHistoryService::new(store);

        service.record("item_a", 3.99, Some("2025-02-01".to_string())).await.unwrap();
        service.record("item_a", 3.49, Some("2025-01-01".to_string())).await.unwrap();
        service.record("item_b", 9.99, None).await.unwrap();

        let entries = service.get_by_item("item_a").await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].price, 3.49);
        assert_eq!(entries[1].price, 3.99);
    }

    #[tokio::test]
    async fn delete_by_item_removes_only_that_item() {
        let (_dir, store) = test_utils::json_store();
        seed_item(&store, "item_a").await;
        seed_item(&store, "item_b").await;
        let service = PriceHistoryService::new(store);

        service.record("item_a", 1.0, None).await.unwrap();
        service.record("item_a", 2.0, None).await.unwrap();
        service.record("item_b", 3.0, None).await.unwrap();

        service.delete_by_item("item_a").await.unwrap();
        assert!(service.get_by_item("item_a").await.unwrap().is_empty());
        assert_eq!(service.get_by_item("item_b").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn record_rejects_an_unknown_item() {
        let (_dir, store) = test_utils::json_store();
        let service = PriceHistoryService::new(store);

        assert!(service.record("no-such-item", 3.99, None).await.is_err());
    }
}
