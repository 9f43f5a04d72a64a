//! Domain model for a grocery list.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::storage::{Entity, SqliteQuery};

/// A grocery list owning zero or more items (cascade delete).
///
/// `total_cost` is a derived aggregate: the sum of the current items' total
/// costs, recomputed in full after every item mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct GroceryList {
    pub id: String,
    pub name: String,
    pub total_cost: f64,
    pub created_at: String,
    pub updated_at: String,
}

impl GroceryList {
    pub fn generate_id() -> String {
        format!("list_{}", Uuid::new_v4())
    }
}

impl Entity for GroceryList {
    const COLLECTION: &'static str = "grocery_lists";

    fn id(&self) -> &str {
        &self.id
    }

    fn insert_sql() -> &'static str {
        "INSERT OR REPLACE INTO grocery_lists \
         (id, name, total_cost, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5)"
    }

    fn bind_insert<'q>(&self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.id.clone())
            .bind(self.name.clone())
            .bind(self.total_cost)
            .bind(self.created_at.clone())
            .bind(self.updated_at.clone())
    }
}
