//! Financial settings service domain logic.
//!
//! The settings record is a lazily-created singleton (fixed id `"default"`).
//! The service also assembles the read-only dashboard summary: income, the
//! current month's expense total, budget totals, and savings progress.

use anyhow::Result;
use tracing::info;

use crate::domain::models::{BudgetCategory, Expense, FinancialSettings};
use crate::domain::months;
use crate::error::ValidationError;
use crate::storage::EntityStore;

/// Partial settings update; `None` fields are unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateFinancialSettingsRequest {
    pub monthly_income: Option<f64>,
    pub savings_goal: Option<f64>,
    pub current_savings: Option<f64>,
}

/// Read-only summary for the dashboard screen.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardData {
    /// The month the summary covers.
    pub month: String,
    pub monthly_income: f64,
    /// Sum of this month's expense amounts.
    pub total_expenses: f64,
    /// Sum of this month's budget limits.
    pub budget_limit: f64,
    /// Sum of this month's budget `spent` fields.
    pub budget_spent: f64,
    pub current_savings: f64,
    pub savings_goal: f64,
    /// Percent of the savings goal reached, clamped to 0-100. Zero when no
    /// goal is set.
    pub savings_progress: f64,
}

#[derive(Clone)]
pub struct FinancialSettingsService<S: EntityStore> {
    store: S,
}

impl<S: EntityStore> FinancialSettingsService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The settings singleton, created with zeroed defaults on first read.
    pub async fn get_or_create(&self) -> Result<FinancialSettings> {
        if let Some(existing) = self.store.get(FinancialSettings::DEFAULT_ID).await? {
            return Ok(existing);
        }
        let settings = FinancialSettings::default_record(months::timestamp());
        self.store.put(&settings).await?;
        info!("created default financial settings");
        Ok(settings)
    }

    pub async fn update(
        &self,
        request: UpdateFinancialSettingsRequest,
    ) -> Result<FinancialSettings> {
        let mut settings = self.get_or_create().await?;

        if let Some(income) = request.monthly_income {
            if income < 0.0 {
                return Err(ValidationError::NegativeAmount("monthly income").into());
            }
            settings.monthly_income = income;
        }
        if let Some(goal) = request.savings_goal {
            if goal < 0.0 {
                return Err(ValidationError::NegativeAmount("savings goal").into());
            }
            settings.savings_goal = goal;
        }
        if let Some(savings) = request.current_savings {
            if savings < 0.0 {
                return Err(ValidationError::NegativeAmount("current savings").into());
            }
            settings.current_savings = savings;
        }
        settings.updated_at = months::timestamp();
        self.store.put(&settings).await?;
        Ok(settings)
    }

    /// Assemble the dashboard summary for the current month.
    pub async fn get_dashboard_data(&self) -> Result<DashboardData> {
        self.dashboard_for_month(&months::current_month()).await
    }

    pub async fn dashboard_for_month(&self, month: &str) -> Result<DashboardData> {
        let settings = self.get_or_create().await?;

        let target = month.to_string();
        let expenses: Vec<Expense> = self
            .store
            .filter(move |expense: &Expense| expense.month == target)
            .await?;
        let total_expenses: f64 = expenses.iter().map(|expense| expense.amount).sum();

        let target = month.to_string();
        let budgets: Vec<BudgetCategory> = self
            .store
            .filter(move |category: &BudgetCategory| category.month == target)
            .await?;
        let budget_limit: f64 = budgets.iter().map(|category| category.limit).sum();
        let budget_spent: f64 = budgets.iter().map(|category| category.spent).sum();

        let savings_progress = if settings.savings_goal > 0.0 {
            (settings.current_savings / settings.savings_goal * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        };

        Ok(DashboardData {
            month: month.to_string(),
            monthly_income: settings.monthly_income,
            total_expenses,
            budget_limit,
            budget_spent,
            current_savings: settings.current_savings,
            savings_goal: settings.savings_goal,
            savings_progress,
        })
    }
}
