use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;

/// One immutable record of an athlete mutation. Entries are only ever
/// inserted; the schema aborts updates and deletes.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct AuditLogEntry {
    pub id: i64,
    pub action: AuditAction,
    #[schema(value_type = Object)]
    pub payload: sqlx::types::Json<serde_json::Value>,
    pub coach_id: Uuid,
    pub coach_email: String,
    pub dojo_name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
pub enum AuditAction {
    #[serde(rename = "REGISTER")]
    #[sqlx(rename = "REGISTER")]
    Register,
    #[serde(rename = "UPDATE")]
    #[sqlx(rename = "UPDATE")]
    Update,
    #[serde(rename = "DELETE")]
    #[sqlx(rename = "DELETE")]
    Delete,
    #[serde(rename = "BULK_REGISTER")]
    #[sqlx(rename = "BULK_REGISTER")]
    BulkRegister,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Register => "REGISTER",
            AuditAction::Update => "UPDATE",
            AuditAction::Delete => "DELETE",
            AuditAction::BulkRegister => "BULK_REGISTER",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
