//! Domain model for a monthly savings record.

use serde::{Deserialize, Serialize};

use crate::storage::{Entity, SqliteQuery};

/// One record per month bucket, unique on `month`.
///
/// `total_expenses` and `total_saved` are derived aggregates, recomputed in
/// full after every expense mutation in the month;
/// `total_saved = max(0, income − total_expenses)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MonthlySavings {
    pub id: String,
    /// Month bucket as `YYYY-MM`.
    pub month: String,
    pub income: f64,
    pub total_expenses: f64,
    pub total_saved: f64,
    pub savings_goal: f64,
    pub created_at: String,
    pub updated_at: String,
}

impl MonthlySavings {
    /// Deterministic id: `<month>_savings`.
    pub fn id_for_month(month: &str) -> String {
        format!("{month}_savings")
    }
}

impl Entity for MonthlySavings {
    const COLLECTION: &'static str = "monthly_savings";

    fn id(&self) -> &str {
        &self.id
    }

    fn insert_sql() -> &'static str {
        "INSERT OR REPLACE INTO monthly_savings \
         (id, month, income, total_expenses, total_saved, savings_goal, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"
    }

    fn bind_insert<'q>(&self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.id.clone())
            .bind(self.month.clone())
            .bind(self.income)
            .bind(self.total_expenses)
            .bind(self.total_saved)
            .bind(self.savings_goal)
            .bind(self.created_at.clone())
            .bind(self.updated_at.clone())
    }
}
