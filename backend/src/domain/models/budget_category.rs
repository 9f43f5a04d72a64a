//! Domain model for a budget category.

use serde::{Deserialize, Serialize};

use crate::storage::{Entity, SqliteQuery};

/// A per-month spending budget, unique on `(name, month)`.
///
/// `spent` is maintained manually (or by an external caller) — it is *not*
/// derived from matching expenses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct BudgetCategory {
    pub id: String,
    pub name: String,
    pub limit: f64,
    pub spent: f64,
    /// Month bucket as `YYYY-MM`.
    pub month: String,
    pub created_at: String,
    pub updated_at: String,
}

impl BudgetCategory {
    /// Deterministic id: `slug(name)_month`, e.g. `housing_2025-03`.
    ///
    /// Keeps category identity stable and idempotent across reseeds.
    pub fn deterministic_id(name: &str, month: &str) -> String {
        let slug = name
            .trim()
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_");
        format!("{slug}_{month}")
    }
}

impl Entity for BudgetCategory {
    const COLLECTION: &'static str = "budget_categories";

    fn id(&self) -> &str {
        &self.id
    }

    fn insert_sql() -> &'static str {
        "INSERT OR REPLACE INTO budget_categories \
         (id, name, \"limit\", spent, month, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"
    }

    fn bind_insert<'q>(&self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.id.clone())
            .bind(self.name.clone())
            .bind(self.limit)
            .bind(self.spent)
            .bind(self.month.clone())
            .bind(self.created_at.clone())
            .bind(self.updated_at.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_id_is_slugged_and_month_suffixed() {
        assert_eq!(
            BudgetCategory::deterministic_id("Housing", "2025-03"),
            "housing_2025-03"
        );
        assert_eq!(
            BudgetCategory::deterministic_id("  Eating  Out ", "2025-03"),
            "eating_out_2025-03"
        );
    }
}
