//! Reports orchestration: the summary cards, six-month trend and
//! budget-vs-spending breakdown, computed from one snapshot of the
//! user's data.

use crate::domain::category_tree::CategoryTree;
use crate::domain::errors::DomainResult;
use crate::domain::spend_report::{
    monthly_trend, percent_used, period_spend, top_category_spend, total_spent,
};
use crate::storage::{CategoryStore, ExpenseStore};
use chrono::{Datelike, Days, NaiveDate};
use rust_decimal::Decimal;
use shared::{CategoryBreakdown, ReportsResponse};
use std::sync::Arc;

pub struct ReportService {
    categories: Arc<dyn CategoryStore>,
    expenses: Arc<dyn ExpenseStore>,
}

impl ReportService {
    pub fn new(categories: Arc<dyn CategoryStore>, expenses: Arc<dyn ExpenseStore>) -> Self {
        Self {
            categories,
            expenses,
        }
    }

    /// Build the full reports payload as of `today`. The "week" card is a
    /// trailing seven days including today, "month" is month-to-date.
    pub async fn reports(&self, user_id: &str, today: NaiveDate) -> DomainResult<ReportsResponse> {
        let categories = self.categories.list_categories(user_id).await?;
        let expenses = self.expenses.list_expenses(user_id).await?;
        let tree = CategoryTree::new(&categories);

        let week_start = today - Days::new(6);
        let month_start = today - Days::new(u64::from(today.day0()));

        let mut breakdown: Vec<CategoryBreakdown> = tree
            .main_categories()
            .into_iter()
            .filter(|category| category.amount > Decimal::ZERO)
            .map(|category| {
                let spent = tree.spent_in_subtree(&expenses, &category.id);
                CategoryBreakdown {
                    category_id: category.id.clone(),
                    name: category.name.clone(),
                    spent,
                    allocated: category.amount,
                    percent_used: percent_used(spent, category.amount).map(|p| p.round_dp(1)),
                    over_budget: spent > category.amount,
                }
            })
            .collect();
        // Highest-pressure categories first; ties keep creation order.
        breakdown.sort_by(|a, b| {
            b.percent_used
                .unwrap_or(Decimal::ZERO)
                .cmp(&a.percent_used.unwrap_or(Decimal::ZERO))
        });

        Ok(ReportsResponse {
            total_spent: total_spent(&expenses),
            today_spent: period_spend(&expenses, today, today),
            week_spent: period_spend(&expenses, week_start, today),
            month_spent: period_spend(&expenses, month_start, today),
            top_category_spent: top_category_spend(&tree, &expenses),
            monthly_trend: monthly_trend(&expenses, today),
            breakdown,
        })
    }
}
