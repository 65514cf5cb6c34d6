use crate::storage::sqlite::{stored_amount, DbConnection};
use crate::storage::traits::IncomeStore;
use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use shared::{Income, IncomeType};
use sqlx::Row;

/// Repository for income records.
#[derive(Clone)]
pub struct IncomeRepository {
    db: DbConnection,
}

impl IncomeRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn row_to_income(row: &sqlx::sqlite::SqliteRow) -> Result<Income> {
        let income_type = match row.get::<String, _>("income_type").as_str() {
            "borrowed" => IncomeType::Borrowed,
            _ => IncomeType::Salary,
        };
        let due_date = row
            .get::<Option<String>, _>("due_date")
            .and_then(|raw| NaiveDate::parse_from_str(&raw, "%Y-%m-%d").ok());

        Ok(Income {
            id: row.get("id"),
            user_id: row.get("user_id"),
            amount: stored_amount(&row.get::<String, _>("amount"))?,
            income_type,
            source: row.get("source"),
            due_date,
            created_at: row.get("created_at"),
        })
    }
}

#[async_trait]
impl IncomeStore for IncomeRepository {
    async fn insert_income(&self, income: &Income) -> Result<()> {
        let income_type = match income.income_type {
            IncomeType::Salary => "salary",
            IncomeType::Borrowed => "borrowed",
        };
        sqlx::query(
            r#"
            INSERT INTO incomes (id, user_id, amount, income_type, source, due_date, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&income.id)
        .bind(&income.user_id)
        .bind(income.amount.to_string())
        .bind(income_type)
        .bind(&income.source)
        .bind(income.due_date.map(|d| d.format("%Y-%m-%d").to_string()))
        .bind(&income.created_at)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn list_incomes(&self, user_id: &str) -> Result<Vec<Income>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, amount, income_type, source, due_date, created_at
            FROM incomes
            WHERE user_id = ?
            ORDER BY created_at DESC, ROWID DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(Self::row_to_income).collect()
    }

    async fn latest_income(&self, user_id: &str) -> Result<Option<Income>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, amount, income_type, source, due_date, created_at
            FROM incomes
            WHERE user_id = ?
            ORDER BY created_at DESC, ROWID DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(Self::row_to_income).transpose()
    }

    async fn list_borrowed_with_due_date(&self, user_id: &str) -> Result<Vec<Income>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, amount, income_type, source, due_date, created_at
            FROM incomes
            WHERE user_id = ? AND income_type = 'borrowed' AND due_date IS NOT NULL
            ORDER BY due_date ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(Self::row_to_income).collect()
    }
}
