//! Category orchestration: the budget screen tree, validated writes,
//! delete with cascade/re-parent expense handling, and the 50/30/20
//! starter categories.

use crate::domain::allocation::validate_category_write;
use crate::domain::category_tree::CategoryTree;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::income::IncomeSummary;
use crate::domain::spend_report::{percent_used, total_allocated};
use crate::storage::{CategoryStore, ExpenseStore, IncomeStore, ProfileStore};
use chrono::Utc;
use rust_decimal::{Decimal, RoundingStrategy};
use shared::{
    AllocationSummary, BudgetCategory, CategoryListResponse, CategoryResponse, CategoryView,
    CategoryWriteRequest, DeleteCategoryRequest, DeleteCategoryResponse, Expense,
    ExpenseDisposition,
};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;

/// Name / share-of-income pairs for the starter budget. Shares are in
/// hundredths (50 = 50%).
const RECOMMENDED_SPLIT: [(&str, i64); 3] = [("Needs", 50), ("Wants", 30), ("Savings", 20)];

pub struct CategoryService {
    categories: Arc<dyn CategoryStore>,
    expenses: Arc<dyn ExpenseStore>,
    incomes: Arc<dyn IncomeStore>,
    profiles: Arc<dyn ProfileStore>,
}

impl CategoryService {
    pub fn new(
        categories: Arc<dyn CategoryStore>,
        expenses: Arc<dyn ExpenseStore>,
        incomes: Arc<dyn IncomeStore>,
        profiles: Arc<dyn ProfileStore>,
    ) -> Self {
        Self {
            categories,
            expenses,
            incomes,
            profiles,
        }
    }

    /// The income figures the allocation checks run against, recomputed
    /// from the stores on every call.
    async fn income_summary(&self, user_id: &str) -> DomainResult<(IncomeSummary, bool)> {
        let include_borrowed = match self.profiles.get_profile(user_id).await? {
            Some(profile) => profile.include_borrowed_in_budget,
            None => true,
        };
        let latest = self.incomes.latest_income(user_id).await?;
        Ok((
            IncomeSummary::compose(latest.as_ref(), include_borrowed),
            include_borrowed,
        ))
    }

    /// The full budget screen payload: every main category with nested
    /// subcategory views, plus the allocation summary.
    pub async fn list(&self, user_id: &str) -> DomainResult<CategoryListResponse> {
        let categories = self.categories.list_categories(user_id).await?;
        let expenses = self.expenses.list_expenses(user_id).await?;
        let (income, include_borrowed) = self.income_summary(user_id).await?;

        let tree = CategoryTree::new(&categories);
        let mut visited: HashSet<String> = HashSet::new();
        let main_categories = tree
            .main_categories()
            .into_iter()
            .map(|category| build_view(&tree, &expenses, category, &mut visited))
            .collect();

        let total_allocated = total_allocated(&categories);
        Ok(CategoryListResponse {
            main_categories,
            summary: AllocationSummary {
                earned_income: income.earned,
                borrowed_income: income.borrowed,
                include_borrowed_in_budget: include_borrowed,
                total_available_income: income.total_available,
                total_allocated,
                unallocated: income.total_available - total_allocated,
            },
        })
    }

    /// Create or update a category. Validation runs against the current
    /// snapshot; nothing is persisted on rejection.
    pub async fn write(
        &self,
        user_id: &str,
        request: &CategoryWriteRequest,
    ) -> DomainResult<CategoryResponse> {
        let categories = self.categories.list_categories(user_id).await?;
        let expenses = self.expenses.list_expenses(user_id).await?;
        let (income, _) = self.income_summary(user_id).await?;

        let validated =
            validate_category_write(request, &categories, &expenses, income.total_available)?;

        let category = match &request.id {
            Some(id) => {
                // Presence was checked by the validator; re-read for created_at.
                let prior = categories
                    .iter()
                    .find(|c| &c.id == id)
                    .ok_or_else(|| DomainError::OrphanReference(id.clone()))?;
                let updated = BudgetCategory {
                    id: prior.id.clone(),
                    user_id: user_id.to_string(),
                    name: validated.name,
                    amount: validated.amount,
                    parent_id: validated.parent_id,
                    created_at: prior.created_at.clone(),
                };
                self.categories.update_category(&updated).await?;
                info!("Updated category {} for user {}", updated.id, user_id);
                updated
            }
            None => {
                let created = BudgetCategory {
                    id: BudgetCategory::generate_id(),
                    user_id: user_id.to_string(),
                    name: validated.name,
                    amount: validated.amount,
                    parent_id: validated.parent_id,
                    created_at: Utc::now().to_rfc3339(),
                };
                self.categories.insert_category(&created).await?;
                info!("Created category {} for user {}", created.id, user_id);
                created
            }
        };

        let success_message = format!("Category '{}' saved", category.name);
        Ok(CategoryResponse {
            category,
            success_message,
        })
    }

    /// Delete a category and its direct children, with the caller choosing
    /// what happens to the attached expenses. The writes are not atomic;
    /// re-running after a partial failure finishes the job, and an already
    /// deleted category reports success with nothing to do.
    pub async fn delete(
        &self,
        user_id: &str,
        category_id: &str,
        request: &DeleteCategoryRequest,
    ) -> DomainResult<DeleteCategoryResponse> {
        let categories = self.categories.list_categories(user_id).await?;
        let tree = CategoryTree::new(&categories);

        let Some(target) = tree.get(category_id) else {
            return Ok(DeleteCategoryResponse {
                deleted_category_ids: Vec::new(),
                deleted_expense_count: 0,
                reparented_expense_count: 0,
                success_message: "Category already deleted".to_string(),
            });
        };

        let mut doomed: Vec<String> = vec![target.id.clone()];
        doomed.extend(tree.subcategories(category_id).iter().map(|c| c.id.clone()));
        let doomed_set: HashSet<&str> = doomed.iter().map(|s| s.as_str()).collect();

        if let ExpenseDisposition::Reparent { target_category_id } = &request.expenses {
            if doomed_set.contains(target_category_id.as_str()) {
                return Err(DomainError::InvalidInput(
                    "Cannot move expenses into a category being deleted".to_string(),
                ));
            }
            if tree.get(target_category_id).is_none() {
                return Err(DomainError::OrphanReference(target_category_id.clone()));
            }
        }

        // Expenses first, so an interrupted run leaves orphans (which
        // aggregation tolerates) rather than miscounted spend.
        let mut deleted_expense_count = 0;
        let mut reparented_expense_count = 0;
        for id in &doomed {
            match &request.expenses {
                ExpenseDisposition::Cascade => {
                    deleted_expense_count +=
                        self.expenses.delete_expenses_by_category(user_id, id).await?;
                }
                ExpenseDisposition::Reparent { target_category_id } => {
                    reparented_expense_count += self
                        .expenses
                        .reparent_expenses(user_id, id, target_category_id)
                        .await?;
                }
            }
        }

        self.categories
            .delete_categories_by_parent(user_id, category_id)
            .await?;
        self.categories.delete_category(user_id, category_id).await?;

        info!(
            "Deleted category {} (+{} children) for user {}",
            category_id,
            doomed.len() - 1,
            user_id
        );

        Ok(DeleteCategoryResponse {
            success_message: format!("Category '{}' deleted", target.name),
            deleted_category_ids: doomed,
            deleted_expense_count,
            reparented_expense_count,
        })
    }

    /// Bootstrap the 50/30/20 starter budget: Needs, Wants and Savings as
    /// main categories, rounded to whole rupees. Only valid on an empty
    /// budget with a recorded income.
    pub async fn create_recommended(&self, user_id: &str) -> DomainResult<CategoryListResponse> {
        let categories = self.categories.list_categories(user_id).await?;
        if categories.iter().any(|c| c.is_main()) {
            return Err(DomainError::InvalidInput(
                "Budget categories already exist".to_string(),
            ));
        }

        let (income, _) = self.income_summary(user_id).await?;
        if income.total_available <= Decimal::ZERO {
            return Err(DomainError::InvalidInput(
                "Add your income before creating recommended categories".to_string(),
            ));
        }

        for (name, share) in RECOMMENDED_SPLIT {
            let amount = (income.total_available * Decimal::new(share, 2))
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
            let category = BudgetCategory {
                id: BudgetCategory::generate_id(),
                user_id: user_id.to_string(),
                name: name.to_string(),
                amount,
                parent_id: None,
                created_at: Utc::now().to_rfc3339(),
            };
            self.categories.insert_category(&category).await?;
        }
        info!("Created recommended categories for user {}", user_id);

        self.list(user_id).await
    }
}

/// Build the nested display view for one category. The visited set guards
/// against malformed parent graphs the same way tree traversal does.
fn build_view(
    tree: &CategoryTree<'_>,
    expenses: &[Expense],
    category: &BudgetCategory,
    visited: &mut HashSet<String>,
) -> CategoryView {
    visited.insert(category.id.clone());

    let spent = tree.spent_in_subtree(expenses, &category.id);
    let signed = tree.remaining_budget_signed(expenses, &category.id);
    let mut subcategories = Vec::new();
    for child in tree.subcategories(&category.id) {
        if !visited.contains(&child.id) {
            subcategories.push(build_view(tree, expenses, child, visited));
        }
    }

    CategoryView {
        spent,
        remaining: signed.max(Decimal::ZERO),
        overspent: signed < Decimal::ZERO,
        percent_used: percent_used(spent, category.amount),
        subcategories,
        category: category.clone(),
    }
}
