//! Relational storage backend.
//!
//! Each entity collection maps to one SQLite table with typed columns: text
//! ids and timestamps, real-valued money fields, integer-encoded booleans.
//! Foreign keys are declared with `ON DELETE CASCADE` and enforced via the
//! `foreign_keys` pragma, although the service layer also performs cascades
//! explicitly so that both backends behave identically.

use std::path::Path;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::info;

use super::traits::{Entity, EntityStore};
use super::StorageError;
use async_trait::async_trait;

/// Table definitions for the seven entity collections.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS expenses (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        amount REAL NOT NULL,
        category TEXT NOT NULL,
        due_date TEXT NOT NULL,
        month TEXT NOT NULL,
        charge_day INTEGER,
        is_paid INTEGER NOT NULL DEFAULT 0,
        is_recurring INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS budget_categories (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        \"limit\" REAL NOT NULL DEFAULT 0,
        spent REAL NOT NULL DEFAULT 0,
        month TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS grocery_lists (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        total_cost REAL NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS grocery_items (
        id TEXT PRIMARY KEY,
        list_id TEXT REFERENCES grocery_lists(id) ON DELETE CASCADE,
        name TEXT NOT NULL,
        quantity INTEGER NOT NULL,
        price_per_unit REAL NOT NULL,
        total_cost REAL NOT NULL DEFAULT 0,
        is_purchased INTEGER NOT NULL DEFAULT 0,
        store_location TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS price_history (
        id TEXT PRIMARY KEY,
        item_id TEXT NOT NULL REFERENCES grocery_items(id) ON DELETE CASCADE,
        price REAL NOT NULL,
        date TEXT NOT NULL,
        created_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS financial_settings (
        id TEXT PRIMARY KEY,
        monthly_income REAL NOT NULL DEFAULT 0,
        savings_goal REAL NOT NULL DEFAULT 0,
        current_savings REAL NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS monthly_savings (
        id TEXT PRIMARY KEY,
        month TEXT NOT NULL UNIQUE,
        income REAL NOT NULL DEFAULT 0,
        total_expenses REAL NOT NULL DEFAULT 0,
        total_saved REAL NOT NULL DEFAULT 0,
        savings_goal REAL NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )",
];

/// SQLite-backed entity store.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if missing) the database file and set up the schema.
    pub async fn connect(path: &Path) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new().connect_with(options).await?;
        Self::setup_schema(&pool).await?;

        info!("opened sqlite store at {}", path.display());
        Ok(Self { pool })
    }

    /// Create all tables if they don't exist yet.
    async fn setup_schema(pool: &SqlitePool) -> Result<(), StorageError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(pool).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl EntityStore for SqliteStore {
    async fn get_all<E: Entity>(&self) -> Result<Vec<E>, StorageError> {
        let sql = format!("SELECT * FROM {}", E::COLLECTION);
        let records = sqlx::query_as::<_, E>(&sql).fetch_all(&self.pool).await?;
        Ok(records)
    }

    async fn get<E: Entity>(&self, id: &str) -> Result<Option<E>, StorageError> {
        let sql = format!("SELECT * FROM {} WHERE id = ?1", E::COLLECTION);
        let record = sqlx::query_as::<_, E>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(record)
    }

    async fn put<E: Entity>(&self, record: &E) -> Result<(), StorageError> {
        let query = sqlx::query(E::insert_sql());
        record.bind_insert(query).execute(&self.pool).await?;
        Ok(())
    }

    async fn delete<E: Entity>(&self, id: &str) -> Result<(), StorageError> {
        let sql = format!("DELETE FROM {} WHERE id = ?1", E::COLLECTION);
        sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{Expense, GroceryItem};

    async fn test_store() -> (tempfile::TempDir, SqliteStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::connect(&dir.path().join("test.db")).await.unwrap();
        (dir, store)
    }

    fn sample_expense(id: &str, month: &str, amount: f64) -> Expense {
        Expense {
            id: id.to_string(),
            name: "Rent".to_string(),
            amount,
            category: "Housing".to_string(),
            due_date: format!("{month}-01"),
            month: month.to_string(),
            charge_day: Some(1),
            is_paid: false,
            is_recurring: false,
            created_at: "2025-01-01T00:00:00+00:00".to_string(),
            updated_at: "2025-01-01T00:00:00+00:00".to_string(),
        }
    }

    #[tokio::test]
    async fn put_then_get_returns_deep_equal_record() {
        let (_dir, store) = test_store().await;

        let expense = sample_expense("expense_1", "2025-01", 1200.0);
        store.put(&expense).await.unwrap();

        let loaded: Expense = store.get("expense_1").await.unwrap().unwrap();
        assert_eq!(loaded, expense);
    }

    #[tokio::test]
    async fn put_is_insert_or_replace() {
        let (_dir, store) = test_store().await;

        let mut expense = sample_expense("expense_1", "2025-01", 1200.0);
        store.put(&expense).await.unwrap();
        expense.amount = 1300.0;
        store.put(&expense).await.unwrap();

        let all: Vec<Expense> = store.get_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].amount, 1300.0);
    }

    #[tokio::test]
    async fn delete_missing_record_is_a_noop() {
        let (_dir, store) = test_store().await;
        store.delete::<Expense>("no-such-id").await.unwrap();
    }

    #[tokio::test]
    async fn filter_matches_by_month() {
        let (_dir, store) = test_store().await;

        store.put(&sample_expense("e1", "2025-01", 10.0)).await.unwrap();
        store.put(&sample_expense("e2", "2025-02", 20.0)).await.unwrap();
        store.put(&sample_expense("e3", "2025-01", 30.0)).await.unwrap();

        let january: Vec<Expense> =
            store.filter(|e: &Expense| e.month == "2025-01").await.unwrap();
        assert_eq!(january.len(), 2);
    }

    #[tokio::test]
    async fn nullable_and_optional_columns_round_trip() {
        let (_dir, store) = test_store().await;

        let item = GroceryItem {
            id: "item_1".to_string(),
            list_id: None,
            name: "Milk".to_string(),
            quantity: 2,
            price_per_unit: 3.99,
            total_cost: 7.98,
            is_purchased: false,
            store_location: None,
            created_at: "2025-01-01T00:00:00+00:00".to_string(),
            updated_at: "2025-01-01T00:00:00+00:00".to_string(),
        };
        store.put(&item).await.unwrap();

        let loaded: GroceryItem = store.get("item_1").await.unwrap().unwrap();
        assert_eq!(loaded, item);
        assert!(loaded.list_id.is_none());
    }
}
