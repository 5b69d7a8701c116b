use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::dto::audit::{AuditLogQuery, NewAuditLog};
use crate::error::Result;
use crate::models::AuditLogEntry;

const DEFAULT_LIMIT: i64 = 100;

/// Append-only access to the audit trail. There is deliberately no update
/// or delete here; the schema would abort them anyway.
pub struct AuditLogRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> AuditLogRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, entry: &NewAuditLog) -> Result<AuditLogEntry> {
        let inserted = sqlx::query_as::<_, AuditLogEntry>(
            "INSERT INTO audit_logs (action, payload, coach_id, coach_email, dojo_name, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6) \
             RETURNING id, action, payload, coach_id, coach_email, dojo_name, created_at",
        )
        .bind(entry.action)
        .bind(sqlx::types::Json(&entry.payload))
        .bind(entry.coach_id)
        .bind(&entry.coach_email)
        .bind(&entry.dojo_name)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await?;

        Ok(inserted)
    }

    /// Filtered review query, newest entries first (insertion order).
    pub async fn list(&self, query: &AuditLogQuery) -> Result<Vec<AuditLogEntry>> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT id, action, payload, coach_id, coach_email, dojo_name, created_at \
             FROM audit_logs WHERE 1 = 1",
        );

        if let Some(action) = query.action {
            qb.push(" AND action = ").push_bind(action);
        }
        if let Some(coach) = query.coach.as_deref().filter(|s| !s.is_empty()) {
            qb.push(" AND lower(coach_email) LIKE ")
                .push_bind(format!("%{}%", coach.to_lowercase()));
        }
        if let Some(dojo) = query.dojo.as_deref().filter(|s| !s.is_empty()) {
            qb.push(" AND lower(dojo_name) LIKE ")
                .push_bind(format!("%{}%", dojo.to_lowercase()));
        }

        qb.push(" ORDER BY id DESC LIMIT ")
            .push_bind(query.limit.unwrap_or(DEFAULT_LIMIT));

        let entries = qb
            .build_query_as::<AuditLogEntry>()
            .fetch_all(self.pool)
            .await?;

        Ok(entries)
    }
}
