use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::SqlitePool;
use storage::error::Result;
use storage::repository::config::ConfigRepository;
use tokio::sync::RwLock;

pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
struct Snapshot {
    values: HashMap<String, Value>,
    fetched_at: Instant,
}

/// Time-bounded cache over the `config` table. Reads serve the snapshot
/// until the TTL lapses; writers call [`ConfigCache::invalidate`]
/// synchronously after any config mutation so the next read refetches.
#[derive(Clone)]
pub struct ConfigCache {
    inner: Arc<RwLock<Option<Snapshot>>>,
    ttl: Duration,
}

impl ConfigCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(None)),
            ttl,
        }
    }

    pub async fn values(&self, pool: &SqlitePool) -> Result<HashMap<String, Value>> {
        {
            let guard = self.inner.read().await;
            if let Some(snapshot) = guard.as_ref() {
                if snapshot.fetched_at.elapsed() < self.ttl {
                    return Ok(snapshot.values.clone());
                }
            }
        }

        let entries = ConfigRepository::new(pool).get_all().await?;
        let values: HashMap<String, Value> = entries
            .into_iter()
            .map(|entry| {
                let value = serde_json::from_str(&entry.value)
                    .unwrap_or_else(|_| Value::String(entry.value.clone()));
                (entry.key, value)
            })
            .collect();

        let mut guard = self.inner.write().await;
        *guard = Some(Snapshot {
            values: values.clone(),
            fetched_at: Instant::now(),
        });

        Ok(values)
    }

    pub async fn get(&self, pool: &SqlitePool, key: &str) -> Result<Option<Value>> {
        Ok(self.values(pool).await?.get(key).cloned())
    }

    pub async fn invalidate(&self) {
        *self.inner.write().await = None;
    }

    /// The registration gate: the `registration_open` flag must be set and
    /// the deadline, when configured, must not have passed. Missing or
    /// malformed config reads as closed.
    pub async fn is_registration_open(&self, pool: &SqlitePool) -> Result<bool> {
        let values = self.values(pool).await?;

        let open = values
            .get("registration_open")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        if !open {
            return Ok(false);
        }

        if let Some(deadline) = values.get("registration_deadline").and_then(Value::as_str) {
            if let Ok(deadline) = DateTime::parse_from_rfc3339(deadline) {
                if Utc::now() > deadline.with_timezone(&Utc) {
                    return Ok(false);
                }
            }
        }

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::Database;
    use uuid::Uuid;

    async fn setup() -> Database {
        let db = Database::in_memory().await.unwrap();
        db.run_migrations().await.unwrap();
        db
    }

    #[tokio::test]
    async fn serves_cached_values_until_invalidated() {
        let db = setup().await;
        let cache = ConfigCache::new(Duration::from_secs(3600));

        assert!(cache.is_registration_open(db.pool()).await.unwrap());

        // A direct write is invisible until the cache is dropped.
        ConfigRepository::new(db.pool())
            .upsert("registration_open", "false", Uuid::new_v4())
            .await
            .unwrap();
        assert!(cache.is_registration_open(db.pool()).await.unwrap());

        cache.invalidate().await;
        assert!(!cache.is_registration_open(db.pool()).await.unwrap());
    }

    #[tokio::test]
    async fn deadline_in_the_past_closes_registration() {
        let db = setup().await;
        let cache = ConfigCache::new(Duration::from_secs(0));

        ConfigRepository::new(db.pool())
            .upsert(
                "registration_deadline",
                "\"2020-01-01T00:00:00Z\"",
                Uuid::new_v4(),
            )
            .await
            .unwrap();
        assert!(!cache.is_registration_open(db.pool()).await.unwrap());

        ConfigRepository::new(db.pool())
            .upsert(
                "registration_deadline",
                "\"2099-01-01T00:00:00Z\"",
                Uuid::new_v4(),
            )
            .await
            .unwrap();
        assert!(cache.is_registration_open(db.pool()).await.unwrap());
    }

    #[tokio::test]
    async fn missing_flag_reads_as_closed() {
        let db = setup().await;
        let cache = ConfigCache::new(Duration::from_secs(0));

        sqlx::query("DELETE FROM config WHERE key = 'registration_open'")
            .execute(db.pool())
            .await
            .unwrap();
        assert!(!cache.is_registration_open(db.pool()).await.unwrap());
    }
}
