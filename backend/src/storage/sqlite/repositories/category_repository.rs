use crate::storage::sqlite::{stored_amount, DbConnection};
use crate::storage::traits::CategoryStore;
use anyhow::Result;
use async_trait::async_trait;
use shared::BudgetCategory;
use sqlx::Row;

/// Repository for budget categories.
#[derive(Clone)]
pub struct CategoryRepository {
    db: DbConnection,
}

impl CategoryRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn row_to_category(row: &sqlx::sqlite::SqliteRow) -> Result<BudgetCategory> {
        Ok(BudgetCategory {
            id: row.get("id"),
            user_id: row.get("user_id"),
            name: row.get("name"),
            amount: stored_amount(&row.get::<String, _>("amount"))?,
            parent_id: row.get("parent_id"),
            created_at: row.get("created_at"),
        })
    }
}

#[async_trait]
impl CategoryStore for CategoryRepository {
    async fn insert_category(&self, category: &BudgetCategory) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO budget_categories (id, user_id, name, amount, parent_id, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&category.id)
        .bind(&category.user_id)
        .bind(&category.name)
        .bind(category.amount.to_string())
        .bind(&category.parent_id)
        .bind(&category.created_at)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn get_category(
        &self,
        user_id: &str,
        category_id: &str,
    ) -> Result<Option<BudgetCategory>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, name, amount, parent_id, created_at
            FROM budget_categories
            WHERE user_id = ? AND id = ?
            "#,
        )
        .bind(user_id)
        .bind(category_id)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(Self::row_to_category).transpose()
    }

    async fn list_categories(&self, user_id: &str) -> Result<Vec<BudgetCategory>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, name, amount, parent_id, created_at
            FROM budget_categories
            WHERE user_id = ?
            ORDER BY created_at ASC, ROWID ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(Self::row_to_category).collect()
    }

    async fn update_category(&self, category: &BudgetCategory) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE budget_categories
            SET name = ?, amount = ?, parent_id = ?
            WHERE user_id = ? AND id = ?
            "#,
        )
        .bind(&category.name)
        .bind(category.amount.to_string())
        .bind(&category.parent_id)
        .bind(&category.user_id)
        .bind(&category.id)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn delete_category(&self, user_id: &str, category_id: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM budget_categories WHERE user_id = ? AND id = ?
            "#,
        )
        .bind(user_id)
        .bind(category_id)
        .execute(self.db.pool())
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_categories_by_parent(&self, user_id: &str, parent_id: &str) -> Result<u32> {
        let result = sqlx::query(
            r#"
            DELETE FROM budget_categories WHERE user_id = ? AND parent_id = ?
            "#,
        )
        .bind(user_id)
        .bind(parent_id)
        .execute(self.db.pool())
        .await?;
        Ok(result.rows_affected() as u32)
    }

    async fn find_category_by_name(
        &self,
        user_id: &str,
        name: &str,
    ) -> Result<Option<BudgetCategory>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, name, amount, parent_id, created_at
            FROM budget_categories
            WHERE user_id = ? AND name = ?
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(name)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(Self::row_to_category).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn category(id: &str, name: &str, amount: &str, parent_id: Option<&str>, created: &str) -> BudgetCategory {
        BudgetCategory {
            id: id.to_string(),
            user_id: "user-1".to_string(),
            name: name.to_string(),
            amount: amount.parse().unwrap(),
            parent_id: parent_id.map(|p| p.to_string()),
            created_at: created.to_string(),
        }
    }

    #[tokio::test]
    async fn test_list_orders_by_created_at_ascending() {
        let db = DbConnection::init_test().await.unwrap();
        let repo = CategoryRepository::new(db);

        repo.insert_category(&category("category::b", "Wants", "5000", None, "2025-02-01T00:00:00Z"))
            .await
            .unwrap();
        repo.insert_category(&category("category::a", "Needs", "10000", None, "2025-01-01T00:00:00Z"))
            .await
            .unwrap();

        let listed = repo.list_categories("user-1").await.unwrap();
        let ids: Vec<&str> = listed.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["category::a", "category::b"]);
    }

    #[tokio::test]
    async fn test_update_and_get_roundtrip() {
        let db = DbConnection::init_test().await.unwrap();
        let repo = CategoryRepository::new(db);

        let mut needs = category("category::a", "Needs", "10000", None, "2025-01-01T00:00:00Z");
        repo.insert_category(&needs).await.unwrap();

        needs.amount = dec!(12000);
        needs.name = "Essentials".to_string();
        repo.update_category(&needs).await.unwrap();

        let fetched = repo
            .get_category("user-1", "category::a")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.name, "Essentials");
        assert_eq!(fetched.amount, dec!(12000));
    }

    #[tokio::test]
    async fn test_delete_reports_whether_row_existed() {
        let db = DbConnection::init_test().await.unwrap();
        let repo = CategoryRepository::new(db);

        repo.insert_category(&category("category::a", "Needs", "10000", None, "2025-01-01T00:00:00Z"))
            .await
            .unwrap();

        assert!(repo.delete_category("user-1", "category::a").await.unwrap());
        assert!(!repo.delete_category("user-1", "category::a").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_by_parent_leaves_other_children_alone() {
        let db = DbConnection::init_test().await.unwrap();
        let repo = CategoryRepository::new(db);

        repo.insert_category(&category("category::a", "Needs", "10000", None, "2025-01-01T00:00:00Z"))
            .await
            .unwrap();
        repo.insert_category(&category("category::a1", "Groceries", "3000", Some("category::a"), "2025-01-02T00:00:00Z"))
            .await
            .unwrap();
        repo.insert_category(&category("category::a2", "Transport", "2000", Some("category::a"), "2025-01-03T00:00:00Z"))
            .await
            .unwrap();
        repo.insert_category(&category("category::b", "Wants", "5000", None, "2025-01-04T00:00:00Z"))
            .await
            .unwrap();

        let deleted = repo
            .delete_categories_by_parent("user-1", "category::a")
            .await
            .unwrap();
        assert_eq!(deleted, 2);

        let remaining = repo.list_categories("user-1").await.unwrap();
        let ids: Vec<&str> = remaining.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["category::a", "category::b"]);
    }

    #[tokio::test]
    async fn test_find_by_name() {
        let db = DbConnection::init_test().await.unwrap();
        let repo = CategoryRepository::new(db);

        repo.insert_category(&category("category::r", "Repayments", "0", None, "2025-01-01T00:00:00Z"))
            .await
            .unwrap();

        let found = repo
            .find_category_by_name("user-1", "Repayments")
            .await
            .unwrap();
        assert_eq!(found.unwrap().id, "category::r");
        assert!(repo
            .find_category_by_name("user-1", "Savings")
            .await
            .unwrap()
            .is_none());
    }
}
