//! Storage abstraction traits.
//!
//! The domain layer talks to per-collection stores through these traits so
//! that the backing service is swappable. Every operation is scoped to a
//! `user_id`; no cross-user reads or writes exist. A failed call must
//! leave the store as it was, the caller re-fetches to resynchronize.

use anyhow::Result;
use async_trait::async_trait;
use shared::{BudgetCategory, Expense, Income, UserProfile};

#[async_trait]
pub trait IncomeStore: Send + Sync {
    async fn insert_income(&self, income: &Income) -> Result<()>;

    /// All income rows for the user, most recent `created_at` first.
    async fn list_incomes(&self, user_id: &str) -> Result<Vec<Income>>;

    /// The user's current income row, if any.
    async fn latest_income(&self, user_id: &str) -> Result<Option<Income>>;

    /// Borrowed income rows that carry a due date, ordered by due date
    /// ascending. Overdue rows are included; urgency is the caller's call.
    async fn list_borrowed_with_due_date(&self, user_id: &str) -> Result<Vec<Income>>;
}

#[async_trait]
pub trait CategoryStore: Send + Sync {
    async fn insert_category(&self, category: &BudgetCategory) -> Result<()>;

    async fn get_category(&self, user_id: &str, category_id: &str)
        -> Result<Option<BudgetCategory>>;

    /// All categories for the user, ascending by `created_at` (the order
    /// the category tree preserves).
    async fn list_categories(&self, user_id: &str) -> Result<Vec<BudgetCategory>>;

    async fn update_category(&self, category: &BudgetCategory) -> Result<()>;

    /// Returns true if the category existed and was deleted.
    async fn delete_category(&self, user_id: &str, category_id: &str) -> Result<bool>;

    /// Delete all direct children of `parent_id`; returns how many went.
    async fn delete_categories_by_parent(&self, user_id: &str, parent_id: &str) -> Result<u32>;

    /// Exact-name lookup, used for the auto-created "Repayments" category.
    async fn find_category_by_name(
        &self,
        user_id: &str,
        name: &str,
    ) -> Result<Option<BudgetCategory>>;
}

#[async_trait]
pub trait ExpenseStore: Send + Sync {
    async fn insert_expense(&self, expense: &Expense) -> Result<()>;

    async fn get_expense(&self, user_id: &str, expense_id: &str) -> Result<Option<Expense>>;

    /// All expenses for the user, most recent first.
    async fn list_expenses(&self, user_id: &str) -> Result<Vec<Expense>>;

    async fn update_expense(&self, expense: &Expense) -> Result<()>;

    /// Returns true if the expense existed and was deleted.
    async fn delete_expense(&self, user_id: &str, expense_id: &str) -> Result<bool>;

    /// Cascade path of a category delete; returns how many expenses went.
    async fn delete_expenses_by_category(&self, user_id: &str, category_id: &str) -> Result<u32>;

    /// Re-parent path of a category delete; returns how many moved.
    async fn reparent_expenses(
        &self,
        user_id: &str,
        from_category_id: &str,
        to_category_id: &str,
    ) -> Result<u32>;
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>>;

    async fn upsert_profile(&self, profile: &UserProfile) -> Result<()>;
}
