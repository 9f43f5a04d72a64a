//! Domain models for all persisted entity types.

pub mod budget_category;
pub mod expense;
pub mod financial_settings;
pub mod grocery_item;
pub mod grocery_list;
pub mod monthly_savings;
pub mod price_history;

pub use budget_category::BudgetCategory;
pub use expense::Expense;
pub use financial_settings::FinancialSettings;
pub use grocery_item::GroceryItem;
pub use grocery_list::GroceryList;
pub use monthly_savings::MonthlySavings;
pub use price_history::PriceHistory;
