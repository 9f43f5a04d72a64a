//! Domain model for an expense.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::storage::{Entity, SqliteQuery};

/// A single expense, always belonging to exactly one month bucket.
///
/// A record with `is_recurring = true` is a *template*: a pattern to be
/// instantiated into concrete per-month expenses. Instances created from a
/// template always carry `is_recurring = false` and are deduplicated per
/// month by their `(name, category)` pairing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Expense {
    pub id: String,
    pub name: String,
    pub amount: f64,
    /// Free-text category label.
    pub category: String,
    /// Due date as `YYYY-MM-DD`.
    pub due_date: String,
    /// Month bucket as `YYYY-MM`.
    pub month: String,
    /// Day of month (1-31) a recurring template charges on. Only meaningful
    /// on templates.
    pub charge_day: Option<u32>,
    pub is_paid: bool,
    pub is_recurring: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl Expense {
    /// Generate a fresh unique expense id.
    pub fn generate_id() -> String {
        format!("expense_{}", Uuid::new_v4())
    }
}

impl Entity for Expense {
    const COLLECTION: &'static str = "expenses";

    fn id(&self) -> &str {
        &self.id
    }

    fn insert_sql() -> &'static str {
        "INSERT OR REPLACE INTO expenses \
         (id, name, amount, category, due_date, month, charge_day, is_paid, is_recurring, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)"
    }

    fn bind_insert<'q>(&self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.id.clone())
            .bind(self.name.clone())
            .bind(self.amount)
            .bind(self.category.clone())
            .bind(self.due_date.clone())
            .bind(self.month.clone())
            .bind(self.charge_day)
            .bind(self.is_paid)
            .bind(self.is_recurring)
            .bind(self.created_at.clone())
            .bind(self.updated_at.clone())
    }
}
