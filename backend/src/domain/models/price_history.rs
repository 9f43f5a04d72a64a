//! Domain model for a price history entry.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::storage::{Entity, SqliteQuery};

/// Append-only record of an item's price at a point in time.
///
/// One entry is created automatically whenever a grocery item is created,
/// capturing its initial price per unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PriceHistory {
    pub id: String,
    pub item_id: String,
    pub price: f64,
    /// Observation date as `YYYY-MM-DD`.
    pub date: String,
    pub created_at: String,
}

impl PriceHistory {
    pub fn generate_id() -> String {
        format!("price_{}", Uuid::new_v4())
    }
}

impl Entity for PriceHistory {
    const COLLECTION: &'static str = "price_history";

    fn id(&self) -> &str {
        &self.id
    }

    fn insert_sql() -> &'static str {
        "INSERT OR REPLACE INTO price_history \
         (id, item_id, price, date, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5)"
    }

    fn bind_insert<'q>(&self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.id.clone())
            .bind(self.item_id.clone())
            .bind(self.price)
            .bind(self.date.clone())
            .bind(self.created_at.clone())
    }
}
