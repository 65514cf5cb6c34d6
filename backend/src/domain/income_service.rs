//! Income orchestration: recording income rows, the income summary the
//! budget screen shows, and borrowed-income repayment tracking.

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::income::IncomeSummary;
use crate::storage::{CategoryStore, ExpenseStore, IncomeStore, ProfileStore};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use shared::{
    parse_positive_amount, BudgetCategory, CreateIncomeRequest, Expense, ExpenseResponse, Income,
    IncomeResponse, IncomeSummaryResponse, IncomeType, LogRepaymentRequest, RepaymentStatus,
    UpcomingRepayment, UpcomingRepaymentsResponse,
};
use std::sync::Arc;
use tracing::info;

/// The zero-allocation main category repayments are logged under.
const REPAYMENTS_CATEGORY: &str = "Repayments";

pub struct IncomeService {
    incomes: Arc<dyn IncomeStore>,
    categories: Arc<dyn CategoryStore>,
    expenses: Arc<dyn ExpenseStore>,
    profiles: Arc<dyn ProfileStore>,
}

impl IncomeService {
    pub fn new(
        incomes: Arc<dyn IncomeStore>,
        categories: Arc<dyn CategoryStore>,
        expenses: Arc<dyn ExpenseStore>,
        profiles: Arc<dyn ProfileStore>,
    ) -> Self {
        Self {
            incomes,
            categories,
            expenses,
            profiles,
        }
    }

    /// Record a new income row. The newest row supersedes earlier ones;
    /// history is kept but only the latest drives allocations.
    pub async fn record(
        &self,
        user_id: &str,
        request: &CreateIncomeRequest,
    ) -> DomainResult<IncomeResponse> {
        let amount = parse_positive_amount(&request.amount)?;

        if request.income_type == IncomeType::Borrowed && request.due_date.is_none() {
            return Err(DomainError::InvalidInput(
                "Borrowed income needs a repayment due date".to_string(),
            ));
        }

        let income = Income {
            id: Income::generate_id(),
            user_id: user_id.to_string(),
            amount,
            income_type: request.income_type,
            source: request
                .source
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            due_date: request.due_date,
            created_at: Utc::now().to_rfc3339(),
        };
        self.incomes.insert_income(&income).await?;
        info!("Recorded {:?} income for user {}", income.income_type, user_id);

        Ok(IncomeResponse {
            income,
            success_message: "Income recorded".to_string(),
        })
    }

    pub async fn list(&self, user_id: &str) -> DomainResult<Vec<Income>> {
        Ok(self.incomes.list_incomes(user_id).await?)
    }

    /// Earned/borrowed breakdown of the current income row, with the
    /// profile's borrowed-income toggle applied.
    pub async fn summary(&self, user_id: &str) -> DomainResult<IncomeSummaryResponse> {
        let include_borrowed = match self.profiles.get_profile(user_id).await? {
            Some(profile) => profile.include_borrowed_in_budget,
            None => true,
        };
        let latest = self.incomes.latest_income(user_id).await?;
        let summary = IncomeSummary::compose(latest.as_ref(), include_borrowed);

        Ok(IncomeSummaryResponse {
            earned_income: summary.earned,
            borrowed_income: summary.borrowed,
            include_borrowed_in_budget: include_borrowed,
            total_available_income: summary.total_available,
        })
    }

    /// Every borrowed income row with a due date, soonest first, tagged
    /// with its urgency. Overdue debts stay on the list; falling off it
    /// would be the opposite of a reminder.
    pub async fn upcoming_repayments(
        &self,
        user_id: &str,
        today: NaiveDate,
    ) -> DomainResult<UpcomingRepaymentsResponse> {
        let due = self.incomes.list_borrowed_with_due_date(user_id).await?;

        let repayments = due
            .into_iter()
            .filter_map(|income| {
                let due_date = income.due_date?;
                let days_until_due = (due_date - today).num_days();
                Some(UpcomingRepayment {
                    amount: income.amount,
                    source: income.source,
                    due_date,
                    days_until_due,
                    status: repayment_status(days_until_due),
                })
            })
            .collect();
        Ok(UpcomingRepaymentsResponse { repayments })
    }

    /// Log a repayment as an expense under the auto-created "Repayments"
    /// category, so paying debts shows up in spending without competing
    /// for any budget allocation.
    pub async fn log_repayment(
        &self,
        user_id: &str,
        request: &LogRepaymentRequest,
    ) -> DomainResult<ExpenseResponse> {
        let amount = parse_positive_amount(&request.amount)?;
        let source = request.source.trim();
        if source.is_empty() {
            return Err(DomainError::InvalidInput(
                "Repayment source is required".to_string(),
            ));
        }

        let category = match self
            .categories
            .find_category_by_name(user_id, REPAYMENTS_CATEGORY)
            .await?
        {
            Some(category) => category,
            None => {
                let category = BudgetCategory {
                    id: BudgetCategory::generate_id(),
                    user_id: user_id.to_string(),
                    name: REPAYMENTS_CATEGORY.to_string(),
                    amount: Decimal::ZERO,
                    parent_id: None,
                    created_at: Utc::now().to_rfc3339(),
                };
                self.categories.insert_category(&category).await?;
                info!("Created repayments category for user {}", user_id);
                category
            }
        };

        let description = match &request.notes {
            Some(notes) if !notes.trim().is_empty() => {
                format!("Repayment to {}: {}", source, notes.trim())
            }
            _ => format!("Repayment to {}", source),
        };
        let expense = Expense {
            id: Expense::generate_id(),
            user_id: user_id.to_string(),
            category_id: category.id,
            amount,
            description: Some(description),
            created_at: Utc::now().to_rfc3339(),
        };
        self.expenses.insert_expense(&expense).await?;
        info!("Logged repayment for user {}", user_id);

        Ok(ExpenseResponse {
            expense,
            success_message: format!("Repayment to {} logged", source),
        })
    }
}

fn repayment_status(days_until_due: i64) -> RepaymentStatus {
    if days_until_due < 0 {
        RepaymentStatus::Overdue
    } else if days_until_due <= 7 {
        RepaymentStatus::Urgent
    } else if days_until_due <= 30 {
        RepaymentStatus::Upcoming
    } else {
        RepaymentStatus::Future
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sqlite::{
        DbConnection, SqliteCategoryRepository, SqliteExpenseRepository, SqliteIncomeRepository,
        SqliteProfileRepository,
    };
    use rust_decimal_macros::dec;

    async fn service() -> IncomeService {
        let db = DbConnection::init_test().await.expect("test db");
        IncomeService::new(
            Arc::new(SqliteIncomeRepository::new(db.clone())),
            Arc::new(SqliteCategoryRepository::new(db.clone())),
            Arc::new(SqliteExpenseRepository::new(db.clone())),
            Arc::new(SqliteProfileRepository::new(db)),
        )
    }

    #[tokio::test]
    async fn test_borrowed_income_requires_due_date() {
        let service = service().await;
        let request = CreateIncomeRequest {
            amount: "5000".to_string(),
            income_type: IncomeType::Borrowed,
            source: Some("Ravi".to_string()),
            due_date: None,
        };
        assert!(matches!(
            service.record("user-1", &request).await.unwrap_err(),
            DomainError::InvalidInput(_)
        ));
    }

    #[tokio::test]
    async fn test_upcoming_repayments_tagged_with_urgency() {
        let service = service().await;
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();

        for (amount, due) in [("100", "2025-06-10"), ("200", "2025-06-20"), ("300", "2025-08-30")] {
            let request = CreateIncomeRequest {
                amount: amount.to_string(),
                income_type: IncomeType::Borrowed,
                source: Some("Ravi".to_string()),
                due_date: NaiveDate::parse_from_str(due, "%Y-%m-%d").ok(),
            };
            service.record("user-1", &request).await.unwrap();
        }

        let response = service.upcoming_repayments("user-1", today).await.unwrap();
        let statuses: Vec<RepaymentStatus> =
            response.repayments.iter().map(|r| r.status).collect();
        assert_eq!(
            statuses,
            vec![
                RepaymentStatus::Overdue,
                RepaymentStatus::Urgent,
                RepaymentStatus::Future,
            ]
        );
        assert_eq!(response.repayments[0].days_until_due, -5);
    }

    #[tokio::test]
    async fn test_log_repayment_creates_category_once() {
        let service = service().await;

        let request = LogRepaymentRequest {
            amount: "1000".to_string(),
            source: "Ravi".to_string(),
            notes: Some("first installment".to_string()),
        };
        let first = service.log_repayment("user-1", &request).await.unwrap();
        assert_eq!(first.expense.amount, dec!(1000));
        assert_eq!(
            first.expense.description.as_deref(),
            Some("Repayment to Ravi: first installment")
        );

        let again = LogRepaymentRequest {
            amount: "500".to_string(),
            source: "Ravi".to_string(),
            notes: None,
        };
        let second = service.log_repayment("user-1", &again).await.unwrap();

        // Both land in the same zero-allocation category.
        assert_eq!(first.expense.category_id, second.expense.category_id);
        let category = service
            .categories
            .get_category("user-1", &first.expense.category_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(category.name, REPAYMENTS_CATEGORY);
        assert_eq!(category.amount, dec!(0));
        assert!(category.is_main());
    }

    #[test]
    fn test_repayment_status_thresholds() {
        assert_eq!(repayment_status(-1), RepaymentStatus::Overdue);
        assert_eq!(repayment_status(0), RepaymentStatus::Urgent);
        assert_eq!(repayment_status(7), RepaymentStatus::Urgent);
        assert_eq!(repayment_status(8), RepaymentStatus::Upcoming);
        assert_eq!(repayment_status(30), RepaymentStatus::Upcoming);
        assert_eq!(repayment_status(31), RepaymentStatus::Future);
    }
}
