use crate::storage::sqlite::{stored_amount, DbConnection};
use crate::storage::traits::ExpenseStore;
use anyhow::Result;
use async_trait::async_trait;
use shared::Expense;
use sqlx::Row;

/// Repository for expense records.
#[derive(Clone)]
pub struct ExpenseRepository {
    db: DbConnection,
}

impl ExpenseRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn row_to_expense(row: &sqlx::sqlite::SqliteRow) -> Result<Expense> {
        Ok(Expense {
            id: row.get("id"),
            user_id: row.get("user_id"),
            category_id: row.get("category_id"),
            amount: stored_amount(&row.get::<String, _>("amount"))?,
            description: row.get("description"),
            created_at: row.get("created_at"),
        })
    }
}

#[async_trait]
impl ExpenseStore for ExpenseRepository {
    async fn insert_expense(&self, expense: &Expense) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO expenses (id, user_id, category_id, amount, description, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&expense.id)
        .bind(&expense.user_id)
        .bind(&expense.category_id)
        .bind(expense.amount.to_string())
        .bind(&expense.description)
        .bind(&expense.created_at)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn get_expense(&self, user_id: &str, expense_id: &str) -> Result<Option<Expense>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, category_id, amount, description, created_at
            FROM expenses
            WHERE user_id = ? AND id = ?
            "#,
        )
        .bind(user_id)
        .bind(expense_id)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(Self::row_to_expense).transpose()
    }

    async fn list_expenses(&self, user_id: &str) -> Result<Vec<Expense>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, category_id, amount, description, created_at
            FROM expenses
            WHERE user_id = ?
            ORDER BY created_at DESC, ROWID DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(Self::row_to_expense).collect()
    }

    async fn update_expense(&self, expense: &Expense) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE expenses
            SET category_id = ?, amount = ?, description = ?
            WHERE user_id = ? AND id = ?
            "#,
        )
        .bind(&expense.category_id)
        .bind(expense.amount.to_string())
        .bind(&expense.description)
        .bind(&expense.user_id)
        .bind(&expense.id)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn delete_expense(&self, user_id: &str, expense_id: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM expenses WHERE user_id = ? AND id = ?
            "#,
        )
        .bind(user_id)
        .bind(expense_id)
        .execute(self.db.pool())
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_expenses_by_category(&self, user_id: &str, category_id: &str) -> Result<u32> {
        let result = sqlx::query(
            r#"
            DELETE FROM expenses WHERE user_id = ? AND category_id = ?
            "#,
        )
        .bind(user_id)
        .bind(category_id)
        .execute(self.db.pool())
        .await?;
        Ok(result.rows_affected() as u32)
    }

    async fn reparent_expenses(
        &self,
        user_id: &str,
        from_category_id: &str,
        to_category_id: &str,
    ) -> Result<u32> {
        let result = sqlx::query(
            r#"
            UPDATE expenses SET category_id = ? WHERE user_id = ? AND category_id = ?
            "#,
        )
        .bind(to_category_id)
        .bind(user_id)
        .bind(from_category_id)
        .execute(self.db.pool())
        .await?;
        Ok(result.rows_affected() as u32)
    }
}
