//! Budget category service domain logic.
//!
//! Category ids are deterministic (`slug(name)_month`), which makes create
//! idempotent: re-seeding a month from a prior month's template never
//! duplicates a category. `spent` is maintained manually through
//! [`BudgetCategoryService::update_spent`]; it is not derived from expenses.

use anyhow::Result;
use tracing::info;

use crate::domain::models::BudgetCategory;
use crate::domain::months;
use crate::error::ValidationError;
use crate::storage::EntityStore;

#[derive(Debug, Clone)]
pub struct CreateBudgetCategoryRequest {
    pub name: String,
    pub limit: f64,
    /// Month bucket; defaults to the current month.
    pub month: Option<String>,
}

/// Partial update; renames are not supported because the name participates
/// in the deterministic id.
#[derive(Debug, Clone, Default)]
pub struct UpdateBudgetCategoryRequest {
    pub limit: Option<f64>,
    pub spent: Option<f64>,
}

#[derive(Clone)]
pub struct BudgetCategoryService<S: EntityStore> {
    store: S,
}

impl<S: EntityStore> BudgetCategoryService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn get_all(&self) -> Result<Vec<BudgetCategory>> {
        Ok(self.store.get_all().await?)
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<BudgetCategory>> {
        Ok(self.store.get(id).await?)
    }

    pub async fn get_by_month(&self, month: &str) -> Result<Vec<BudgetCategory>> {
        let target = month.to_string();
        Ok(self
            .store
            .filter(move |category: &BudgetCategory| category.month == target)
            .await?)
    }

    /// Create a category, or update the limit of the existing one when the
    /// deterministic id is already taken. Never duplicates.
    pub async fn create(&self, request: CreateBudgetCategoryRequest) -> Result<BudgetCategory> {
        if request.name.trim().is_empty() {
            return Err(ValidationError::EmptyField("name").into());
        }
        if request.limit < 0.0 {
            return Err(ValidationError::NegativeAmount("limit").into());
        }
        let month = request.month.unwrap_or_else(months::current_month);
        if !months::is_valid_month(&month) {
            return Err(ValidationError::InvalidMonth(month).into());
        }

        let id = BudgetCategory::deterministic_id(&request.name, &month);
        let now = months::timestamp();
        let category = match self.store.get::<BudgetCategory>(&id).await? {
            Some(mut existing) => {
                existing.limit = request.limit;
                existing.updated_at = now;
                existing
            }
            None => BudgetCategory {
                id,
                name: request.name,
                limit: request.limit,
                spent: 0.0,
                month,
                created_at: now.clone(),
                updated_at: now,
            },
        };
        self.store.put(&category).await?;
        Ok(category)
    }

    pub async fn update(
        &self,
        id: &str,
        request: UpdateBudgetCategoryRequest,
    ) -> Result<Option<BudgetCategory>> {
        let Some(mut category) = self.store.get::<BudgetCategory>(id).await? else {
            return Ok(None);
        };

        if let Some(limit) = request.limit {
            if limit < 0.0 {
                return Err(ValidationError::NegativeAmount("limit").into());
            }
            category.limit = limit;
        }
        if let Some(spent) = request.spent {
            if spent < 0.0 {
                return Err(ValidationError::NegativeAmount("spent").into());
            }
            category.spent = spent;
        }
        category.updated_at = months::timestamp();
        self.store.put(&category).await?;
        Ok(Some(category))
    }

    /// Manual `spent` maintenance; the only way the field changes.
    pub async fn update_spent(&self, id: &str, spent: f64) -> Result<Option<BudgetCategory>> {
        self.update(id, UpdateBudgetCategoryRequest { spent: Some(spent), ..Default::default() })
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.store.delete::<BudgetCategory>(id).await?;
        Ok(())
    }

    /// Seed a month's budgets from a prior month: copy name and limit for
    /// every category that doesn't already exist in the target month, with
    /// `spent` reset to zero. Returns the categories created by this call.
    pub async fn create_monthly_budgets(
        &self,
        month: &str,
        previous_month: &str,
    ) -> Result<Vec<BudgetCategory>> {
        if !months::is_valid_month(month) {
            return Err(ValidationError::InvalidMonth(month.to_string()).into());
        }

        let mut created = Vec::new();
        for template in self.get_by_month(previous_month).await? {
            let id = BudgetCategory::deterministic_id(&template.name, month);
            if self.store.get::<BudgetCategory>(&id).await?.is_some() {
                continue;
            }
            let now = months::timestamp();
            let category = BudgetCategory {
                id,
                name: template.name,
                limit: template.limit,
                spent: 0.0,
                month: month.to_string(),
                created_at: now.clone(),
                updated_at: now,
            };
            self.store.put(&category).await?;
            created.push(category);
        }

        if !created.is_empty() {
            info!(
                "seeded {} budget categories for {} from {}",
                created.len(),
                month,
                previous_month
            );
        }
        Ok(created)
    }
}
