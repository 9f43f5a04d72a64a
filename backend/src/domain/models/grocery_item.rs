//! Domain model for a grocery item.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::storage::{Entity, SqliteQuery};

/// A grocery item, optionally attached to a list.
///
/// `total_cost` is `quantity × price_per_unit`, kept consistent by the
/// writer (the item service), not derived by the store. Each item owns its
/// price history entries (cascade delete).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct GroceryItem {
    pub id: String,
    /// Owning list; unattached items are legal.
    pub list_id: Option<String>,
    pub name: String,
    pub quantity: u32,
    pub price_per_unit: f64,
    pub total_cost: f64,
    pub is_purchased: bool,
    pub store_location: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl GroceryItem {
    pub fn generate_id() -> String {
        format!("item_{}", Uuid::new_v4())
    }
}

impl Entity for GroceryItem {
    const COLLECTION: &'static str = "grocery_items";

    fn id(&self) -> &str {
        &self.id
    }

    fn insert_sql() -> &'static str {
        "INSERT OR REPLACE INTO grocery_items \
         (id, list_id, name, quantity, price_per_unit, total_cost, is_purchased, store_location, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
    }

    fn bind_insert<'q>(&self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.id.clone())
            .bind(self.list_id.clone())
            .bind(self.name.clone())
            .bind(self.quantity)
            .bind(self.price_per_unit)
            .bind(self.total_cost)
            .bind(self.is_purchased)
            .bind(self.store_location.clone())
            .bind(self.created_at.clone())
            .bind(self.updated_at.clone())
    }
}
