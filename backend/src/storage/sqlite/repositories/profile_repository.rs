use crate::storage::sqlite::DbConnection;
use crate::storage::traits::ProfileStore;
use anyhow::Result;
use async_trait::async_trait;
use shared::UserProfile;
use sqlx::Row;

/// Repository for user profiles.
#[derive(Clone)]
pub struct ProfileRepository {
    db: DbConnection,
}

impl ProfileRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProfileStore for ProfileRepository {
    async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, profile_image_url, include_borrowed_in_budget
            FROM user_profiles
            WHERE id = ?
            "#,
        )
        .bind(user_id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.map(|r| UserProfile {
            id: r.get("id"),
            name: r.get("name"),
            profile_image_url: r.get("profile_image_url"),
            include_borrowed_in_budget: r.get::<i64, _>("include_borrowed_in_budget") != 0,
        }))
    }

    async fn upsert_profile(&self, profile: &UserProfile) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO user_profiles (id, name, profile_image_url, include_borrowed_in_budget)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                profile_image_url = excluded.profile_image_url,
                include_borrowed_in_budget = excluded.include_borrowed_in_budget
            "#,
        )
        .bind(&profile.id)
        .bind(&profile.name)
        .bind(&profile.profile_image_url)
        .bind(i64::from(profile.include_borrowed_in_budget))
        .execute(self.db.pool())
        .await?;
        Ok(())
    }
}
