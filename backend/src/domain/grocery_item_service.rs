//! Grocery item service domain logic.
//!
//! The item's `total_cost` (`quantity × price_per_unit`) is maintained by
//! this writer, never derived by the store. Every mutation of an item
//! triggers a full recompute of its owning list's total — and when an item
//! moves between lists, the list it *left* is recomputed too, using the
//! `list_id` read before the store write.

use anyhow::Result;
use tracing::info;

use crate::domain::grocery_list_service::GroceryListService;
use crate::domain::models::{GroceryItem, GroceryList};
use crate::domain::months;
use crate::domain::price_history_service::PriceHistoryService;
use crate::error::ValidationError;
use crate::storage::EntityStore;

#[derive(Debug, Clone)]
pub struct CreateGroceryItemRequest {
    /// Owning list; unattached items are legal.
    pub list_id: Option<String>,
    pub name: String,
    pub quantity: u32,
    pub price_per_unit: f64,
    pub store_location: Option<String>,
}

/// Partial update; `None` fields are left unchanged. `list_id` and
/// `store_location` use a nested option so that `Some(None)` detaches the
/// item from its list or clears the location.
#[derive(Debug, Clone, Default)]
pub struct UpdateGroceryItemRequest {
    pub list_id: Option<Option<String>>,
    pub name: Option<String>,
    pub quantity: Option<u32>,
    pub price_per_unit: Option<f64>,
    pub is_purchased: Option<bool>,
    pub store_location: Option<Option<String>>,
}

#[derive(Clone)]
pub struct GroceryItemService<S: EntityStore> {
    store: S,
    list_service: GroceryListService<S>,
    price_history_service: PriceHistoryService<S>,
}

impl<S: EntityStore> GroceryItemService<S> {
    pub fn new(
        store: S,
        list_service: GroceryListService<S>,
        price_history_service: PriceHistoryService<S>,
    ) -> Self {
        Self { store, list_service, price_history_service }
    }

    pub async fn get_all(&self) -> Result<Vec<GroceryItem>> {
        Ok(self.store.get_all().await?)
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<GroceryItem>> {
        Ok(self.store.get(id).await?)
    }

    pub async fn get_by_list(&self, list_id: &str) -> Result<Vec<GroceryItem>> {
        self.list_service.items_of(list_id).await
    }

    /// A `list_id` must point at an existing list; both backends reject the
    /// dangling reference the same way.
    async fn require_list(&self, list_id: &str) -> Result<()> {
        if self.store.get::<GroceryList>(list_id).await?.is_none() {
            return Err(
                ValidationError::MissingReference("grocery list", list_id.to_string()).into(),
            );
        }
        Ok(())
    }

    async fn recompute_list(&self, list_id: Option<&str>) -> Result<()> {
        if let Some(list_id) = list_id {
            self.list_service.update_total_cost(list_id).await?;
        }
        Ok(())
    }

    /// Create an item, append its initial price to the history, and
    /// recompute the owning list's total.
    pub async fn create(&self, request: CreateGroceryItemRequest) -> Result<GroceryItem> {
        if request.name.trim().is_empty() {
            return Err(ValidationError::EmptyField("name").into());
        }
        if request.quantity < 1 {
            return Err(ValidationError::QuantityTooSmall.into());
        }
        if request.price_per_unit < 0.0 {
            return Err(ValidationError::NegativeAmount("price per unit").into());
        }
        if let Some(list_id) = &request.list_id {
            self.require_list(list_id).await?;
        }

        let now = months::timestamp();
        let item = GroceryItem {
            id: GroceryItem::generate_id(),
            list_id: request.list_id,
            name: request.name,
            quantity: request.quantity,
            price_per_unit: request.price_per_unit,
            total_cost: request.quantity as f64 * request.price_per_unit,
            is_purchased: false,
            store_location: request.store_location,
            created_at: now.clone(),
            updated_at: now,
        };
        self.store.put(&item).await?;
        self.price_history_service
            .record(&item.id, item.price_per_unit, None)
            .await?;
        self.recompute_list(item.list_id.as_deref()).await?;

        info!("created grocery item {}", item.id);
        Ok(item)
    }

    /// Apply a partial update, keeping `total_cost` and the affected list
    /// totals consistent. Returns `None` when the item is absent.
    pub async fn update(
        &self,
        id: &str,
        request: UpdateGroceryItemRequest,
    ) -> Result<Option<GroceryItem>> {
        let Some(mut item) = self.store.get::<GroceryItem>(id).await? else {
            return Ok(None);
        };
        // Read before the mutation: the list the item leaves goes stale
        // unless it is recomputed as well.
        let previous_list = item.list_id.clone();

        if let Some(list_id) = request.list_id {
            if let Some(target) = &list_id {
                self.require_list(target).await?;
            }
            item.list_id = list_id;
        }
        if let Some(name) = request.name {
            if name.trim().is_empty() {
                return Err(ValidationError::EmptyField("name").into());
            }
            item.name = name;
        }
        if let Some(quantity) = request.quantity {
            if quantity < 1 {
                return Err(ValidationError::QuantityTooSmall.into());
            }
            item.quantity = quantity;
        }
        if let Some(price) = request.price_per_unit {
            if price < 0.0 {
                return Err(ValidationError::NegativeAmount("price per unit").into());
            }
            item.price_per_unit = price;
        }
        if let Some(is_purchased) = request.is_purchased {
            item.is_purchased = is_purchased;
        }
        if let Some(store_location) = request.store_location {
            item.store_location = store_location;
        }
        item.total_cost = item.quantity as f64 * item.price_per_unit;
        item.updated_at = months::timestamp();
        self.store.put(&item).await?;

        if previous_list != item.list_id {
            self.recompute_list(previous_list.as_deref()).await?;
        }
        self.recompute_list(item.list_id.as_deref()).await?;

        Ok(Some(item))
    }

    /// Flip the reversible `is_purchased` flag. Returns `None` when absent.
    pub async fn toggle_purchased(&self, id: &str) -> Result<Option<GroceryItem>> {
        let Some(mut item) = self.store.get::<GroceryItem>(id).await? else {
            return Ok(None);
        };
        item.is_purchased = !item.is_purchased;
        item.updated_at = months::timestamp();
        self.store.put(&item).await?;
        Ok(Some(item))
    }

    /// Delete an item, cascading to its price history and recomputing the
    /// owning list. Idempotent.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let existing = self.store.get::<GroceryItem>(id).await?;
        self.price_history_service.delete_by_item(id).await?;
        self.store.delete::<GroceryItem>(id).await?;
        if let Some(item) = existing {
            self.recompute_list(item.list_id.as_deref()).await?;
        }
        Ok(())
    }
}
