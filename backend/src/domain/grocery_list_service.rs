//! Grocery list service domain logic.
//!
//! Owns the list's `total_cost` aggregate: after any item mutation the
//! service re-reads all items currently on the list and stores their summed
//! total. Reads are eager — a list comes back with its items, and each item
//! with its price history.

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::domain::models::{GroceryItem, GroceryList, PriceHistory};
use crate::domain::months;
use crate::domain::price_history_service::PriceHistoryService;
use crate::error::ValidationError;
use crate::storage::EntityStore;

/// A grocery item joined with its price history.
#[derive(Debug, Clone, PartialEq)]
pub struct GroceryItemWithHistory {
    pub item: GroceryItem,
    pub price_history: Vec<PriceHistory>,
}

/// A grocery list joined with its items (and their price history).
#[derive(Debug, Clone, PartialEq)]
pub struct GroceryListWithItems {
    pub list: GroceryList,
    pub items: Vec<GroceryItemWithHistory>,
}

#[derive(Debug, Clone)]
pub struct CreateGroceryListRequest {
    pub name: String,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateGroceryListRequest {
    pub name: Option<String>,
}

#[derive(Clone)]
pub struct GroceryListService<S: EntityStore> {
    store: S,
    price_history_service: PriceHistoryService<S>,
}

impl<S: EntityStore> GroceryListService<S> {
    pub fn new(store: S, price_history_service: PriceHistoryService<S>) -> Self {
        Self { store, price_history_service }
    }

    /// Items currently belonging to a list.
    pub async fn items_of(&self, list_id: &str) -> Result<Vec<GroceryItem>> {
        let target = list_id.to_string();
        Ok(self
            .store
            .filter(move |item: &GroceryItem| item.list_id.as_deref() == Some(target.as_str()))
            .await?)
    }

    async fn join_items(&self, list: GroceryList) -> Result<GroceryListWithItems> {
        let mut items = Vec::new();
        for item in self.items_of(&list.id).await? {
            let price_history = self.price_history_service.get_by_item(&item.id).await?;
            items.push(GroceryItemWithHistory { item, price_history });
        }
        Ok(GroceryListWithItems { list, items })
    }

    /// All lists with their items eagerly attached.
    pub async fn get_all(&self) -> Result<Vec<GroceryListWithItems>> {
        let lists: Vec<GroceryList> = self.store.get_all().await?;
        let mut joined = Vec::with_capacity(lists.len());
        for list in lists {
            joined.push(self.join_items(list).await?);
        }
        Ok(joined)
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<GroceryListWithItems>> {
        match self.store.get::<GroceryList>(id).await? {
            Some(list) => Ok(Some(self.join_items(list).await?)),
            None => Ok(None),
        }
    }

    pub async fn create(&self, request: CreateGroceryListRequest) -> Result<GroceryList> {
        if request.name.trim().is_empty() {
            return Err(ValidationError::EmptyField("name").into());
        }
        let now = months::timestamp();
        let list = GroceryList {
            id: GroceryList::generate_id(),
            name: request.name,
            total_cost: 0.0,
            created_at: now.clone(),
            updated_at: now,
        };
        self.store.put(&list).await?;
        info!("created grocery list {}", list.id);
        Ok(list)
    }

    pub async fn update(
        &self,
        id: &str,
        request: UpdateGroceryListRequest,
    ) -> Result<Option<GroceryList>> {
        let Some(mut list) = self.store.get::<GroceryList>(id).await? else {
            return Ok(None);
        };
        if let Some(name) = request.name {
            if name.trim().is_empty() {
                return Err(ValidationError::EmptyField("name").into());
            }
            list.name = name;
        }
        list.updated_at = months::timestamp();
        self.store.put(&list).await?;
        Ok(Some(list))
    }

    /// Delete a list, cascading to its items and their price history.
    /// Idempotent.
    pub async fn delete(&self, id: &str) -> Result<()> {
        for item in self.items_of(id).await? {
            self.price_history_service.delete_by_item(&item.id).await?;
            self.store.delete::<GroceryItem>(&item.id).await?;
        }
        self.store.delete::<GroceryList>(id).await?;
        Ok(())
    }

    /// Recompute the list's `total_cost` from all items currently on it.
    ///
    /// Full recompute from current truth. Returns `None` (with a warning)
    /// when the list itself is absent; an empty list is valid and totals 0.
    pub async fn update_total_cost(&self, id: &str) -> Result<Option<GroceryList>> {
        let Some(mut list) = self.store.get::<GroceryList>(id).await? else {
            warn!("total cost recompute for missing grocery list {}", id);
            return Ok(None);
        };

        let items = self.items_of(id).await?;
        if items.is_empty() {
            debug!("recompute for list {} read zero items", id);
        }
        list.total_cost = items.iter().map(|item| item.total_cost).sum();
        list.updated_at = months::timestamp();
        self.store.put(&list).await?;
        Ok(Some(list))
    }
}
