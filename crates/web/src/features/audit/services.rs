use storage::dto::audit::{AuditLogQuery, AuditLogResponse, AuditSummary};
use storage::repository::audit_log::AuditLogRepository;

use crate::error::{WebError, WebResult};
use crate::middleware::auth::Actor;
use crate::state::AppState;

const SUMMARY_RECENT: usize = 10;

fn require_admin(actor: &Actor) -> WebResult<()> {
    if !actor.is_admin {
        return Err(WebError::Forbidden(
            "Only admins can review the audit trail".to_string(),
        ));
    }
    Ok(())
}

pub async fn list(
    state: &AppState,
    actor: &Actor,
    query: &AuditLogQuery,
) -> WebResult<Vec<AuditLogResponse>> {
    require_admin(actor)?;

    let entries = AuditLogRepository::new(state.db.pool()).list(query).await?;
    Ok(entries.into_iter().map(AuditLogResponse::from).collect())
}

pub async fn summary(state: &AppState, actor: &Actor) -> WebResult<AuditSummary> {
    require_admin(actor)?;

    let entries = AuditLogRepository::new(state.db.pool())
        .list(&AuditLogQuery {
            limit: Some(i64::MAX),
            ..Default::default()
        })
        .await?;

    let mut summary = AuditSummary {
        total_entries: entries.len(),
        ..Default::default()
    };
    for entry in &entries {
        *summary
            .by_action
            .entry(entry.action.as_str().to_string())
            .or_default() += 1;
        *summary.by_dojo.entry(entry.dojo_name.clone()).or_default() += 1;
    }
    summary.recent_activity = entries
        .into_iter()
        .take(SUMMARY_RECENT)
        .map(AuditLogResponse::from)
        .collect();

    Ok(summary)
}
