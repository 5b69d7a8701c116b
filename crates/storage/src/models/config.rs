use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// One tournament configuration row. Values are JSON-encoded text so a key
/// can hold a flag, a string or a structured value alike.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct ConfigEntry {
    pub key: String,
    pub value: String,
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<Uuid>,
}
