//! Expense orchestration: logging, editing (including moves between
//! categories), history views and deletion.

use crate::domain::category_tree::CategoryTree;
use crate::domain::errors::{DomainError, DomainResult};
use crate::storage::{CategoryStore, ExpenseStore};
use chrono::Utc;
use shared::{
    parse_positive_amount, CreateExpenseRequest, Expense, ExpenseListResponse, ExpenseResponse,
    ExpenseView, UpdateExpenseRequest,
};
use std::sync::Arc;
use tracing::info;

pub struct ExpenseService {
    expenses: Arc<dyn ExpenseStore>,
    categories: Arc<dyn CategoryStore>,
}

impl ExpenseService {
    pub fn new(expenses: Arc<dyn ExpenseStore>, categories: Arc<dyn CategoryStore>) -> Self {
        Self {
            expenses,
            categories,
        }
    }

    /// Log an expense. Spending against a deleted category is a form
    /// error, not an orphan: the caller picked it from a stale list.
    pub async fn create(
        &self,
        user_id: &str,
        request: &CreateExpenseRequest,
    ) -> DomainResult<ExpenseResponse> {
        let amount = parse_positive_amount(&request.amount)?;

        let category = self
            .categories
            .get_category(user_id, &request.category_id)
            .await?
            .ok_or_else(|| {
                DomainError::InvalidInput(format!("Unknown category: {}", request.category_id))
            })?;

        let expense = Expense {
            id: Expense::generate_id(),
            user_id: user_id.to_string(),
            category_id: category.id.clone(),
            amount,
            description: request
                .description
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
            created_at: Utc::now().to_rfc3339(),
        };
        self.expenses.insert_expense(&expense).await?;
        info!(
            "Logged expense {} against {} for user {}",
            expense.id, category.id, user_id
        );

        Ok(ExpenseResponse {
            expense,
            success_message: format!("Expense added to '{}'", category.name),
        })
    }

    /// Apply a partial update. Omitted fields keep their stored values;
    /// a new `category_id` moves the expense.
    pub async fn update(
        &self,
        user_id: &str,
        expense_id: &str,
        request: &UpdateExpenseRequest,
    ) -> DomainResult<ExpenseResponse> {
        let mut expense = self
            .expenses
            .get_expense(user_id, expense_id)
            .await?
            .ok_or_else(|| DomainError::OrphanReference(expense_id.to_string()))?;

        if let Some(category_id) = &request.category_id {
            if self
                .categories
                .get_category(user_id, category_id)
                .await?
                .is_none()
            {
                return Err(DomainError::InvalidInput(format!(
                    "Unknown category: {}",
                    category_id
                )));
            }
            expense.category_id = category_id.clone();
        }
        if let Some(amount) = &request.amount {
            expense.amount = parse_positive_amount(amount)?;
        }
        if let Some(description) = &request.description {
            let trimmed = description.trim();
            expense.description = if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            };
        }

        self.expenses.update_expense(&expense).await?;
        info!("Updated expense {} for user {}", expense.id, user_id);

        Ok(ExpenseResponse {
            expense,
            success_message: "Expense updated".to_string(),
        })
    }

    /// Full expense history, most recent first, with resolved category
    /// names. Orphaned expenses keep their rows but lose the name.
    pub async fn list(&self, user_id: &str) -> DomainResult<ExpenseListResponse> {
        let expenses = self.expenses.list_expenses(user_id).await?;
        let categories = self.categories.list_categories(user_id).await?;
        let tree = CategoryTree::new(&categories);

        let views = expenses
            .into_iter()
            .map(|expense| ExpenseView {
                category_name: tree.get(&expense.category_id).map(|c| c.name.clone()),
                expense,
            })
            .collect();
        Ok(ExpenseListResponse { expenses: views })
    }

    /// History for one category and its whole subtree.
    pub async fn list_for_category(
        &self,
        user_id: &str,
        category_id: &str,
    ) -> DomainResult<ExpenseListResponse> {
        let categories = self.categories.list_categories(user_id).await?;
        let tree = CategoryTree::new(&categories);
        if tree.get(category_id).is_none() {
            return Err(DomainError::OrphanReference(category_id.to_string()));
        }

        let mut subtree: std::collections::HashSet<String> =
            tree.descendant_ids(category_id).into_iter().collect();
        subtree.insert(category_id.to_string());

        let views = self
            .expenses
            .list_expenses(user_id)
            .await?
            .into_iter()
            .filter(|e| subtree.contains(&e.category_id))
            .map(|expense| ExpenseView {
                category_name: tree.get(&expense.category_id).map(|c| c.name.clone()),
                expense,
            })
            .collect();
        Ok(ExpenseListResponse { expenses: views })
    }

    /// Delete an expense; already-gone rows report success.
    pub async fn delete(&self, user_id: &str, expense_id: &str) -> DomainResult<bool> {
        let existed = self.expenses.delete_expense(user_id, expense_id).await?;
        if existed {
            info!("Deleted expense {} for user {}", expense_id, user_id);
        }
        Ok(existed)
    }
}
