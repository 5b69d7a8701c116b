use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Extension, Json,
};
use storage::dto::audit::{AuditLogQuery, AuditSummary};

use crate::error::WebError;
use crate::middleware::auth::Actor;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    get,
    path = "/api/audit-logs",
    params(
        ("action" = Option<String>, Query, description = "Filter by action"),
        ("coach" = Option<String>, Query, description = "Substring match on coach email"),
        ("dojo" = Option<String>, Query, description = "Substring match on dojo name"),
        ("limit" = Option<i64>, Query, description = "Maximum entries returned")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Audit entries, newest first"),
        (status = 403, description = "Not an admin")
    ),
    tag = "audit"
)]
pub async fn list_audit_logs(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(query): Query<AuditLogQuery>,
) -> Result<Response, WebError> {
    let entries = services::list(&state, &actor, &query).await?;
    Ok(Json(entries).into_response())
}

#[utoipa::path(
    get,
    path = "/api/audit-logs/summary",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Counts by action and dojo", body = AuditSummary),
        (status = 403, description = "Not an admin")
    ),
    tag = "audit"
)]
pub async fn audit_summary(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Response, WebError> {
    let summary = services::summary(&state, &actor).await?;
    Ok(Json(summary).into_response())
}
