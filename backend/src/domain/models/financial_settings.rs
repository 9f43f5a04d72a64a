//! Domain model for the financial settings singleton.

use serde::{Deserialize, Serialize};

use crate::storage::{Entity, SqliteQuery};

/// Singleton settings record with the fixed id `"default"`.
///
/// At most one instance ever exists; it is created lazily on first read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct FinancialSettings {
    pub id: String,
    pub monthly_income: f64,
    pub savings_goal: f64,
    pub current_savings: f64,
    pub created_at: String,
    pub updated_at: String,
}

impl FinancialSettings {
    /// The fixed id of the singleton row.
    pub const DEFAULT_ID: &'static str = "default";

    /// A zeroed settings row with fresh timestamps.
    pub fn default_record(now: String) -> Self {
        Self {
            id: Self::DEFAULT_ID.to_string(),
            monthly_income: 0.0,
            savings_goal: 0.0,
            current_savings: 0.0,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

impl Entity for FinancialSettings {
    const COLLECTION: &'static str = "financial_settings";

    fn id(&self) -> &str {
        &self.id
    }

    fn insert_sql() -> &'static str {
        "INSERT OR REPLACE INTO financial_settings \
         (id, monthly_income, savings_goal, current_savings, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)"
    }

    fn bind_insert<'q>(&self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.id.clone())
            .bind(self.monthly_income)
            .bind(self.savings_goal)
            .bind(self.current_savings)
            .bind(self.created_at.clone())
            .bind(self.updated_at.clone())
    }
}
