use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// A registered user profile. Credentials and onboarding are owned by the
/// identity flow; the core reads these rows to resolve the acting coach.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct Coach {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub dojo_id: Option<Uuid>,
    pub is_admin: bool,
    pub onboarding_complete: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct Dojo {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Registration whitelist entry, admin-managed.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct AllowedEmail {
    pub email: String,
    pub added_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}
