use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::AllowedEmail;

/// Registration whitelist, admin-managed. The identity flow itself is an
/// external collaborator; the core only maintains the rows it consults.
pub struct AccessRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> AccessRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<AllowedEmail>> {
        let entries = sqlx::query_as::<_, AllowedEmail>(
            "SELECT email, added_by, created_at FROM allowed_emails ORDER BY email",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(entries)
    }

    pub async fn add(&self, email: &str, added_by: Uuid) -> Result<AllowedEmail> {
        let entry = sqlx::query_as::<_, AllowedEmail>(
            "INSERT INTO allowed_emails (email, added_by, created_at) VALUES (?1, ?2, ?3) \
             ON CONFLICT (email) DO UPDATE SET email = excluded.email \
             RETURNING email, added_by, created_at",
        )
        .bind(email.trim().to_lowercase())
        .bind(added_by)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await?;

        Ok(entry)
    }

    pub async fn remove(&self, email: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM allowed_emails WHERE email = ?1")
            .bind(email.trim().to_lowercase())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}
