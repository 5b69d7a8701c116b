use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Athlete, AuditAction, AuditLogEntry};

/// A pending audit record, ready for insertion.
#[derive(Debug, Clone)]
pub struct NewAuditLog {
    pub action: AuditAction,
    pub payload: Value,
    pub coach_id: Uuid,
    pub coach_email: String,
    pub dojo_name: String,
}

impl NewAuditLog {
    pub fn new(
        action: AuditAction,
        payload: Value,
        coach_id: Uuid,
        coach_email: &str,
        dojo_name: &str,
    ) -> Self {
        Self {
            action,
            payload,
            coach_id,
            coach_email: coach_email.to_string(),
            dojo_name: dojo_name.to_string(),
        }
    }
}

/// Full athlete snapshot, used for REGISTER and DELETE entries. The DELETE
/// snapshot is what keeps the record reviewable after the row is gone.
pub fn snapshot_payload(athlete: &Athlete) -> Value {
    serde_json::to_value(athlete).unwrap_or_default()
}

/// UPDATE entries log only the submitted changes, not a before/after diff.
pub fn update_payload(athlete_id: Uuid, changes: Value) -> Value {
    json!({ "athlete_id": athlete_id, "changes": changes })
}

pub fn bulk_payload(count: usize, names: &[String]) -> Value {
    json!({ "count": count, "names": names })
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct AuditLogQuery {
    pub action: Option<crate::models::AuditAction>,
    /// Substring match on the acting coach's email.
    pub coach: Option<String>,
    /// Substring match on the dojo name.
    pub dojo: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuditLogResponse {
    pub id: i64,
    pub action: AuditAction,
    #[schema(value_type = Object)]
    pub payload: Value,
    pub coach_id: Uuid,
    pub coach_email: String,
    pub dojo_name: String,
    pub created_at: DateTime<Utc>,
}

impl From<AuditLogEntry> for AuditLogResponse {
    fn from(entry: AuditLogEntry) -> Self {
        Self {
            id: entry.id,
            action: entry.action,
            payload: entry.payload.0,
            coach_id: entry.coach_id,
            coach_email: entry.coach_email,
            dojo_name: entry.dojo_name,
            created_at: entry.created_at,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct AuditSummary {
    pub total_entries: usize,
    #[schema(value_type = Object)]
    pub by_action: std::collections::BTreeMap<String, usize>,
    #[schema(value_type = Object)]
    pub by_dojo: std::collections::BTreeMap<String, usize>,
    pub recent_activity: Vec<AuditLogResponse>,
}
