use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::ConfigEntry;

pub struct ConfigRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ConfigRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get_all(&self) -> Result<Vec<ConfigEntry>> {
        let entries = sqlx::query_as::<_, ConfigEntry>(
            "SELECT key, value, updated_at, updated_by FROM config ORDER BY key",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(entries)
    }

    pub async fn get(&self, key: &str) -> Result<Option<ConfigEntry>> {
        let entry = sqlx::query_as::<_, ConfigEntry>(
            "SELECT key, value, updated_at, updated_by FROM config WHERE key = ?1",
        )
        .bind(key)
        .fetch_optional(self.pool)
        .await?;

        Ok(entry)
    }

    /// Upsert a JSON-encoded value for the key.
    pub async fn upsert(&self, key: &str, value: &str, updated_by: Uuid) -> Result<ConfigEntry> {
        let entry = sqlx::query_as::<_, ConfigEntry>(
            "INSERT INTO config (key, value, updated_at, updated_by) VALUES (?1, ?2, ?3, ?4) \
             ON CONFLICT (key) DO UPDATE SET \
                 value = excluded.value, \
                 updated_at = excluded.updated_at, \
                 updated_by = excluded.updated_by \
             RETURNING key, value, updated_at, updated_by",
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .bind(updated_by)
        .fetch_one(self.pool)
        .await?;

        Ok(entry)
    }
}
