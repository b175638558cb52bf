//! Persistence Adapter — one experience record per user in SQLite.

use sqlx::SqlitePool;
use tracing::info;

use crate::models::resume::ResumeRecord;

/// Long-lived handle over the `resumes` table.
#[derive(Clone)]
pub struct ResumeStore {
    pool: SqlitePool,
}

impl ResumeStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Inserts or replaces the record for `user_id` inside one transaction.
    pub async fn store(
        &self,
        user_id: &str,
        experience_text: &str,
        file_name: &str,
    ) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT OR REPLACE INTO resumes (user_id, experience_text, file_name)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(user_id)
        .bind(experience_text)
        .bind(file_name)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(user_id, file_name, "Stored resume experience");
        Ok(())
    }

    /// Returns the stored record for `user_id`, or `None` if there is none.
    pub async fn retrieve(&self, user_id: &str) -> Result<Option<ResumeRecord>, sqlx::Error> {
        sqlx::query_as::<_, ResumeRecord>(
            "SELECT user_id, experience_text, file_name FROM resumes WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }
}
