//! Expense service domain logic.
//!
//! Every expense mutation triggers a synchronous recompute of the affected
//! month's savings aggregate. When an update moves an expense between month
//! buckets (or a delete removes it), the *pre-mutation* month — read before
//! the store write — is recomputed as well; recomputing only the current
//! month would silently leave the old month's aggregate stale.

use anyhow::Result;
use tracing::{debug, info};

use crate::domain::models::Expense;
use crate::domain::monthly_savings_service::MonthlySavingsService;
use crate::domain::months;
use crate::error::ValidationError;
use crate::storage::EntityStore;

#[derive(Debug, Clone)]
pub struct CreateExpenseRequest {
    pub name: String,
    pub amount: f64,
    pub category: String,
    /// Due date as `YYYY-MM-DD`.
    pub due_date: String,
    /// Month bucket; defaults to the current month.
    pub month: Option<String>,
    pub charge_day: Option<u32>,
    /// Marks a recurring template rather than a concrete expense.
    pub is_recurring: bool,
}

/// Partial update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateExpenseRequest {
    pub name: Option<String>,
    pub amount: Option<f64>,
    pub category: Option<String>,
    pub due_date: Option<String>,
    pub month: Option<String>,
    pub charge_day: Option<u32>,
    pub is_paid: Option<bool>,
    pub is_recurring: Option<bool>,
}

#[derive(Clone)]
pub struct ExpenseService<S: EntityStore> {
    store: S,
    savings_service: MonthlySavingsService<S>,
}

impl<S: EntityStore> ExpenseService<S> {
    pub fn new(store: S, savings_service: MonthlySavingsService<S>) -> Self {
        Self { store, savings_service }
    }

    pub async fn get_all(&self) -> Result<Vec<Expense>> {
        Ok(self.store.get_all().await?)
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<Expense>> {
        Ok(self.store.get(id).await?)
    }

    /// All expenses in a month bucket (templates included when their month
    /// matches).
    pub async fn get_by_month(&self, month: &str) -> Result<Vec<Expense>> {
        let target = month.to_string();
        Ok(self
            .store
            .filter(move |expense: &Expense| expense.month == target)
            .await?)
    }

    /// All recurring templates.
    pub async fn get_recurring_expenses(&self) -> Result<Vec<Expense>> {
        Ok(self
            .store
            .filter(|expense: &Expense| expense.is_recurring)
            .await?)
    }

    /// Sum of expense amounts for a month.
    pub async fn get_total_monthly_expenses(&self, month: &str) -> Result<f64> {
        let expenses = self.get_by_month(month).await?;
        Ok(expenses.iter().map(|expense| expense.amount).sum())
    }

    pub async fn create(&self, request: CreateExpenseRequest) -> Result<Expense> {
        if request.name.trim().is_empty() {
            return Err(ValidationError::EmptyField("name").into());
        }
        if request.amount < 0.0 {
            return Err(ValidationError::NegativeAmount("amount").into());
        }
        if let Some(day) = request.charge_day {
            if !(1..=31).contains(&day) {
                return Err(ValidationError::ChargeDayOutOfRange(day).into());
            }
        }
        let month = request.month.unwrap_or_else(months::current_month);
        if !months::is_valid_month(&month) {
            return Err(ValidationError::InvalidMonth(month).into());
        }

        let now = months::timestamp();
        let expense = Expense {
            id: Expense::generate_id(),
            name: request.name,
            amount: request.amount,
            category: request.category,
            due_date: request.due_date,
            month: month.clone(),
            charge_day: request.charge_day,
            is_paid: false,
            is_recurring: request.is_recurring,
            created_at: now.clone(),
            updated_at: now,
        };
        self.store.put(&expense).await?;
        self.savings_service.update_monthly_expenses(&month).await?;

        info!("created expense {} in {}", expense.id, expense.month);
        Ok(expense)
    }

    /// Apply a partial update. Returns `None` when the expense is absent.
    pub async fn update(
        &self,
        id: &str,
        request: UpdateExpenseRequest,
    ) -> Result<Option<Expense>> {
        let Some(mut expense) = self.store.get::<Expense>(id).await? else {
            return Ok(None);
        };
        // Read before the mutation: the old bucket's aggregate must be
        // recomputed when the expense moves months.
        let previous_month = expense.month.clone();

        if let Some(name) = request.name {
            if name.trim().is_empty() {
                return Err(ValidationError::EmptyField("name").into());
            }
            expense.name = name;
        }
        if let Some(amount) = request.amount {
            if amount < 0.0 {
                return Err(ValidationError::NegativeAmount("amount").into());
            }
            expense.amount = amount;
        }
        if let Some(category) = request.category {
            expense.category = category;
        }
        if let Some(due_date) = request.due_date {
            expense.due_date = due_date;
        }
        if let Some(month) = request.month {
            if !months::is_valid_month(&month) {
                return Err(ValidationError::InvalidMonth(month).into());
            }
            expense.month = month;
        }
        if let Some(day) = request.charge_day {
            if !(1..=31).contains(&day) {
                return Err(ValidationError::ChargeDayOutOfRange(day).into());
            }
            expense.charge_day = Some(day);
        }
        if let Some(is_paid) = request.is_paid {
            expense.is_paid = is_paid;
        }
        if let Some(is_recurring) = request.is_recurring {
            expense.is_recurring = is_recurring;
        }
        expense.updated_at = months::timestamp();
        self.store.put(&expense).await?;

        if previous_month != expense.month {
            self.savings_service
                .update_monthly_expenses(&previous_month)
                .await?;
        }
        self.savings_service
            .update_monthly_expenses(&expense.month)
            .await?;

        Ok(Some(expense))
    }

    /// Delete an expense and recompute its month's aggregate. Idempotent.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let existing = self.store.get::<Expense>(id).await?;
        self.store.delete::<Expense>(id).await?;
        if let Some(expense) = existing {
            self.savings_service
                .update_monthly_expenses(&expense.month)
                .await?;
        }
        Ok(())
    }

    /// Instantiate every recurring template into the target month.
    ///
    /// A concrete expense is only created when the month does not already
    /// contain one with the same `(name, category)` pairing and the template
    /// has a charge day; calling this twice for the same month creates no
    /// duplicates. Returns the expenses created by this call.
    pub async fn create_recurring_expenses_for_month(
        &self,
        month: &str,
    ) -> Result<Vec<Expense>> {
        if !months::is_valid_month(month) {
            return Err(ValidationError::InvalidMonth(month.to_string()).into());
        }

        let mut occupied: Vec<(String, String)> = self
            .get_by_month(month)
            .await?
            .into_iter()
            .filter(|expense| !expense.is_recurring)
            .map(|expense| (expense.name, expense.category))
            .collect();

        let mut created = Vec::new();
        for template in self.get_recurring_expenses().await? {
            let Some(charge_day) = template.charge_day else {
                debug!("template {} has no charge day, skipping", template.id);
                continue;
            };
            let key = (template.name.clone(), template.category.clone());
            if occupied.contains(&key) {
                continue;
            }
            // The bucket was validated above, so this always resolves.
            let Some(due_date) = months::due_date_for(month, charge_day) else {
                continue;
            };

            let now = months::timestamp();
            let expense = Expense {
                id: Expense::generate_id(),
                name: template.name,
                amount: template.amount,
                category: template.category,
                due_date,
                month: month.to_string(),
                charge_day: Some(charge_day),
                is_paid: false,
                is_recurring: false,
                created_at: now.clone(),
                updated_at: now,
            };
            self.store.put(&expense).await?;
            occupied.push(key);
            created.push(expense);
        }

        if !created.is_empty() {
            self.savings_service.update_monthly_expenses(month).await?;
            info!("instantiated {} recurring expenses for {}", created.len(), month);
        }
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{FinancialSettings, MonthlySavings};
    use crate::storage::test_utils;
    use crate::storage::Store;

    fn service(store: Store) -> ExpenseService<Store> {
        ExpenseService::new(store.clone(), MonthlySavingsService::new(store))
    }

    fn expense_request(name: &str, amount: f64, month: &str) -> CreateExpenseRequest {
        CreateExpenseRequest {
            name: name.to_string(),
            amount,
            category: "General".to_string(),
            due_date: format!("{month}-15"),
            month: Some(month.to_string()),
            charge_day: None,
            is_recurring: false,
        }
    }

    async fn seed_income(store: &Store, monthly_income: f64) {
        let settings = FinancialSettings {
            monthly_income,
            ..FinancialSettings::default_record(months::timestamp())
        };
        store.put(&settings).await.unwrap();
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    async fn savings_for(store: &Store, month: &str) -> MonthlySavings {
        MonthlySavingsService::new(store.clone())
            .get_by_month(month)
            .await
            .unwrap()
            .unwrap()
    }

    #[tokio::test]
    async fn monthly_total_counts_templates_bucketed_in_the_month() {
        let (_dir, store) = test_utils::json_store();
        let service = service(store);

        service.create(expense_request("Rent", 50.0, "2025-01")).await.unwrap();
        service
            .create(CreateExpenseRequest {
                name: "Gym".to_string(),
                amount: 100.0,
                category: "Health".to_string(),
                due_date: "2025-01-10".to_string(),
                month: Some("2025-01".to_string()),
                charge_day: Some(10),
                is_recurring: true,
            })
            .await
            .unwrap();

        // The template's own `month` bucket participates in that month's sum.
        let total = service.get_total_monthly_expenses("2025-01").await.unwrap();
        assert_close(total, 150.0);
    }

    #[tokio::test]
    async fn creating_expenses_maintains_the_monthly_savings_invariant() {
        let (_dir, store) = test_utils::json_store();
        seed_income(&store, 4500.0).await;
        let service = service(store.clone());

        service
            .create(expense_request("Rent", 1200.0, "2025-01"))
            .await
            .unwrap();
        let second = service
            .create(expense_request("Utilities", 85.0, "2025-01"))
            .await
            .unwrap();

        let savings = savings_for(&store, "2025-01").await;
        assert_close(savings.total_expenses, 1285.0);
        assert_close(savings.total_saved, 3215.0);

        // Amount edit re-derives both totals.
        service
            .update(
                &second.id,
                UpdateExpenseRequest { amount: Some(185.0), ..Default::default() },
            )
            .await
            .unwrap()
            .unwrap();

        let savings = savings_for(&store, "2025-01").await;
        assert_close(savings.total_expenses, 1385.0);
        assert_close(savings.total_saved, 3115.0);
    }

    #[tokio::test]
    async fn moving_an_expense_recomputes_both_month_buckets() {
        let (_dir, store) = test_utils::json_store();
        seed_income(&store, 1000.0).await;
        let service = service(store.clone());

        let expense = service
            .create(expense_request("Insurance", 300.0, "2025-01"))
            .await
            .unwrap();
        service
            .update(
                &expense.id,
                UpdateExpenseRequest {
                    month: Some("2025-02".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        let january = savings_for(&store, "2025-01").await;
        let february = savings_for(&store, "2025-02").await;
        assert_close(january.total_expenses, 0.0);
        assert_close(january.total_saved, 1000.0);
        assert_close(february.total_expenses, 300.0);
        assert_close(february.total_saved, 700.0);
    }

    #[tokio::test]
    async fn deleting_an_expense_recomputes_its_month() {
        let (_dir, store) = test_utils::json_store();
        seed_income(&store, 1000.0).await;
        let service = service(store.clone());

        let expense = service
            .create(expense_request("Gym", 60.0, "2025-03"))
            .await
            .unwrap();
        service.delete(&expense.id).await.unwrap();

        let savings = savings_for(&store, "2025-03").await;
        assert_close(savings.total_expenses, 0.0);
        assert_close(savings.total_saved, 1000.0);

        // Deleting again is a silent no-op.
        service.delete(&expense.id).await.unwrap();
    }

    #[tokio::test]
    async fn recurring_instantiation_is_idempotent() {
        let (_dir, store) = test_utils::json_store();
        let service = service(store.clone());

        service
            .create(CreateExpenseRequest {
                name: "Netflix".to_string(),
                amount: 15.0,
                category: "Entertainment".to_string(),
                due_date: "2025-01-10".to_string(),
                month: Some("2025-01".to_string()),
                charge_day: Some(10),
                is_recurring: true,
            })
            .await
            .unwrap();
        service
            .create(CreateExpenseRequest {
                name: "Rent".to_string(),
                amount: 1200.0,
                category: "Housing".to_string(),
                due_date: "2025-01-31".to_string(),
                month: Some("2025-01".to_string()),
                charge_day: Some(31),
                is_recurring: true,
            })
            .await
            .unwrap();

        let first = service
            .create_recurring_expenses_for_month("2025-02")
            .await
            .unwrap();
        assert_eq!(first.len(), 2);
        assert!(first.iter().all(|e| !e.is_recurring && !e.is_paid));

        // Charge day 31 clamps to February's last day.
        let rent = first.iter().find(|e| e.name == "Rent").unwrap();
        assert_eq!(rent.due_date, "2025-02-28");

        let second = service
            .create_recurring_expenses_for_month("2025-02")
            .await
            .unwrap();
        assert!(second.is_empty());

        let concrete: Vec<Expense> = service
            .get_by_month("2025-02")
            .await
            .unwrap()
            .into_iter()
            .filter(|e| !e.is_recurring)
            .collect();
        assert_eq!(concrete.len(), 2);
    }

    #[tokio::test]
    async fn templates_without_a_charge_day_are_skipped() {
        let (_dir, store) = test_utils::json_store();
        let service = service(store);

        service
            .create(CreateExpenseRequest {
                name: "Variable bill".to_string(),
                amount: 50.0,
                category: "Utilities".to_string(),
                due_date: "2025-01-20".to_string(),
                month: Some("2025-01".to_string()),
                charge_day: None,
                is_recurring: true,
            })
            .await
            .unwrap();

        let created = service
            .create_recurring_expenses_for_month("2025-02")
            .await
            .unwrap();
        assert!(created.is_empty());
    }

    #[tokio::test]
    async fn create_rejects_malformed_payloads() {
        let (_dir, store) = test_utils::json_store();
        let service = service(store);

        assert!(service
            .create(expense_request("", 10.0, "2025-01"))
            .await
            .is_err());
        assert!(service
            .create(expense_request("Rent", -1.0, "2025-01"))
            .await
            .is_err());
        assert!(service
            .create(expense_request("Rent", 10.0, "2025-1"))
            .await
            .is_err());

        // Update of a missing id signals "nothing to update".
        let missing = service
            .update("no-such-id", UpdateExpenseRequest::default())
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn total_monthly_expenses_sums_the_bucket() {
        let (_dir, store) = test_utils::sqlite_store().await;
        let service = service(store);

        service
            .create(expense_request("Rent", 1200.0, "2025-01"))
            .await
            .unwrap();
        service
            .create(expense_request("Food", 300.0, "2025-01"))
            .await
            .unwrap();
        service
            .create(expense_request("Rent", 1200.0, "2025-02"))
            .await
            .unwrap();

        let total = service.get_total_monthly_expenses("2025-01").await.unwrap();
        assert_close(total, 1500.0);
    }
}
