//! Domain layer: models, monthly bucketing, and one service per entity type.

pub mod models;
pub mod months;

pub mod budget_category_service;
pub mod expense_service;
pub mod financial_settings_service;
pub mod grocery_item_service;
pub mod grocery_list_service;
pub mod monthly_savings_service;
pub mod price_history_service;

pub use budget_category_service::{
    BudgetCategoryService, CreateBudgetCategoryRequest, UpdateBudgetCategoryRequest,
};
pub use expense_service::{CreateExpenseRequest, ExpenseService, UpdateExpenseRequest};
pub use financial_settings_service::{
    DashboardData, FinancialSettingsService, UpdateFinancialSettingsRequest,
};
pub use grocery_item_service::{
    CreateGroceryItemRequest, GroceryItemService, UpdateGroceryItemRequest,
};
pub use grocery_list_service::{
    CreateGroceryListRequest, GroceryItemWithHistory, GroceryListService, GroceryListWithItems,
    UpdateGroceryListRequest,
};
pub use monthly_savings_service::{MonthlySavingsService, UpdateMonthlySavingsRequest};
pub use price_history_service::PriceHistoryService;
