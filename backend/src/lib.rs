//! # Household Finance Tracker Backend
//!
//! Persistence and domain-service core for a personal household-finance
//! tracker: expenses with monthly buckets and recurring templates, budget
//! categories, grocery lists with price history, and monthly savings.
//!
//! The UI layer calls the domain services on [`Backend`]; everything else —
//! the storage backends, the derived-aggregate recompute rules, monthly
//! bucketing — sits behind them. Denormalized totals (a grocery list's
//! total cost, a month's expense total and savings) are recomputed in full
//! from current records after every mutation that could invalidate them, so
//! the data is self-healing even though the recomputes are not transactional
//! with the source writes.

pub mod config;
pub mod domain;
pub mod error;
pub mod storage;

pub use config::StorageConfig;
pub use error::ValidationError;
pub use storage::{EntityStore, JsonStore, SqliteStore, StorageError, Store};

use anyhow::Result;

use crate::domain::{
    BudgetCategoryService, ExpenseService, FinancialSettingsService, GroceryItemService,
    GroceryListService, MonthlySavingsService, PriceHistoryService,
};

/// Initialize logging for binaries and manual runs. Filter via `RUST_LOG`.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}

/// Main backend struct that orchestrates all services.
///
/// The store handle is constructed once from [`StorageConfig`] and cloned
/// into each service (explicit dependency injection, no global connection
/// state).
pub struct Backend {
    pub expense_service: ExpenseService<Store>,
    pub budget_category_service: BudgetCategoryService<Store>,
    pub grocery_list_service: GroceryListService<Store>,
    pub grocery_item_service: GroceryItemService<Store>,
    pub price_history_service: PriceHistoryService<Store>,
    pub financial_settings_service: FinancialSettingsService<Store>,
    pub monthly_savings_service: MonthlySavingsService<Store>,
}

impl Backend {
    /// Open the configured storage backend and wire up all services.
    pub async fn new(config: &StorageConfig) -> Result<Self> {
        let store = Store::open(config).await?;
        Ok(Self::with_store(store))
    }

    /// Wire services around an already-open store handle.
    pub fn with_store(store: Store) -> Self {
        let monthly_savings_service = MonthlySavingsService::new(store.clone());
        let price_history_service = PriceHistoryService::new(store.clone());
        let grocery_list_service =
            GroceryListService::new(store.clone(), price_history_service.clone());
        let grocery_item_service = GroceryItemService::new(
            store.clone(),
            grocery_list_service.clone(),
            price_history_service.clone(),
        );
        let expense_service =
            ExpenseService::new(store.clone(), monthly_savings_service.clone());
        let budget_category_service = BudgetCategoryService::new(store.clone());
        let financial_settings_service = FinancialSettingsService::new(store);

        Backend {
            expense_service,
            budget_category_service,
            grocery_list_service,
            grocery_item_service,
            price_history_service,
            financial_settings_service,
            monthly_savings_service,
        }
    }
}
