use storage::dto::athlete::{
    collect_validation_errors, AthleteListRow, AthleteQuery, AthleteStats, BulkItemOutcome,
    BulkRegisterRequest, BulkRegisterResponse, RegisterAthleteRequest, UpdateAthleteRequest,
};
use storage::dto::audit::{bulk_payload, snapshot_payload, update_payload, NewAuditLog};
use storage::models::{Athlete, AuditAction};
use storage::repository::athlete::AthleteRepository;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::error::{WebError, WebResult};
use crate::middleware::auth::Actor;
use crate::state::AppState;

fn duplicate_message(name: &str) -> String {
    format!(
        "Athlete '{}' with this date of birth already exists in your dojo.",
        name.trim()
    )
}

/// The coach's dojo, or a 403 for accounts that were never attached to one.
fn require_dojo(actor: &Actor) -> WebResult<Uuid> {
    actor
        .dojo_id
        .ok_or_else(|| WebError::Forbidden("No dojo associated with your account".to_string()))
}

async fn ensure_registration_open(state: &AppState) -> WebResult<()> {
    if !state.config.is_registration_open(state.db.pool()).await? {
        return Err(WebError::RegistrationClosed);
    }
    Ok(())
}

/// Register one athlete: gate check, full validation, dojo-scoped duplicate
/// check, insert, audit. The composite unique index backstops the duplicate
/// pre-check, so two racing requests still yield exactly one row and the
/// loser sees the same duplicate error.
pub async fn register(
    state: &AppState,
    actor: &Actor,
    req: &RegisterAthleteRequest,
) -> WebResult<Athlete> {
    ensure_registration_open(state).await?;
    let dojo_id = require_dojo(actor)?;

    req.validate()?;

    let repo = AthleteRepository::new(state.db.pool());
    if repo
        .exists(&req.full_name, req.date_of_birth, Some(dojo_id))
        .await?
    {
        return Err(WebError::Duplicate(duplicate_message(&req.full_name)));
    }

    let athlete = match repo.create(actor.coach_id, dojo_id, req).await {
        Ok(athlete) => athlete,
        Err(e) if e.is_unique_violation() => {
            return Err(WebError::Duplicate(duplicate_message(&req.full_name)));
        }
        Err(e) => return Err(e.into()),
    };

    info!(athlete_id = %athlete.id, coach = %actor.email, "athlete registered");

    state
        .audit
        .record(NewAuditLog::new(
            AuditAction::Register,
            snapshot_payload(&athlete),
            actor.coach_id,
            &actor.email,
            actor.dojo_name(),
        ))
        .await;

    Ok(athlete)
}

/// Bulk registration processes records in input order and never aborts the
/// batch: each record is validated and inserted independently, and a single
/// BULK_REGISTER entry summarises the inserted subset.
pub async fn bulk_register(
    state: &AppState,
    actor: &Actor,
    req: &BulkRegisterRequest,
) -> WebResult<BulkRegisterResponse> {
    ensure_registration_open(state).await?;
    let dojo_id = require_dojo(actor)?;

    let repo = AthleteRepository::new(state.db.pool());
    let mut results = Vec::with_capacity(req.athletes.len());
    let mut registered_names = Vec::new();

    for record in &req.athletes {
        let name = record.full_name.trim().to_string();

        if let Err(errors) = record.validate() {
            results.push(BulkItemOutcome {
                name,
                success: false,
                error: Some(collect_validation_errors(&errors).join("; ")),
            });
            continue;
        }

        let duplicate = repo
            .exists(&record.full_name, record.date_of_birth, Some(dojo_id))
            .await?;
        if duplicate {
            results.push(BulkItemOutcome {
                name,
                success: false,
                error: Some("Duplicate - already exists".to_string()),
            });
            continue;
        }

        match repo.create(actor.coach_id, dojo_id, record).await {
            Ok(_) => {
                registered_names.push(name.clone());
                results.push(BulkItemOutcome {
                    name,
                    success: true,
                    error: None,
                });
            }
            Err(e) if e.is_unique_violation() => {
                results.push(BulkItemOutcome {
                    name,
                    success: false,
                    error: Some("Duplicate - already exists".to_string()),
                });
            }
            Err(e) => return Err(e.into()),
        }
    }

    let successful = registered_names.len();
    let failed = results.len() - successful;

    info!(
        successful,
        failed,
        coach = %actor.email,
        "bulk registration finished"
    );

    if successful > 0 {
        state
            .audit
            .record(NewAuditLog::new(
                AuditAction::BulkRegister,
                bulk_payload(successful, &registered_names),
                actor.coach_id,
                &actor.email,
                actor.dojo_name(),
            ))
            .await;
    }

    Ok(BulkRegisterResponse {
        successful,
        failed,
        results,
    })
}

/// Partial update of mutable fields, owner or admin only. The audit payload
/// carries only the submitted changes.
pub async fn update(
    state: &AppState,
    actor: &Actor,
    id: Uuid,
    req: &UpdateAthleteRequest,
) -> WebResult<Athlete> {
    req.validate()?;

    let repo = AthleteRepository::new(state.db.pool());
    let existing = repo.find_by_id(id).await?;

    if !actor.can_modify(existing.coach_id) {
        return Err(WebError::Forbidden(
            "You do not have permission to modify this athlete".to_string(),
        ));
    }

    if req.is_empty() {
        return Err(WebError::BadRequest("No changes submitted".to_string()));
    }

    let kata = req.kata_event.unwrap_or(existing.kata_event);
    let kumite = req.kumite_event.unwrap_or(existing.kumite_event);
    if !kata && !kumite {
        return Err(WebError::Validation(vec![
            "At least one event (Kata or Kumite) must be selected".to_string(),
        ]));
    }

    let changes = req.changes();
    let updated = repo.update(id, &existing, req).await?;

    state
        .audit
        .record(NewAuditLog::new(
            AuditAction::Update,
            update_payload(id, changes),
            actor.coach_id,
            &actor.email,
            actor.dojo_name(),
        ))
        .await;

    Ok(updated)
}

/// Delete with a full snapshot in the audit entry, so the registration stays
/// reviewable after the row is gone. Unknown ids return 404 and leave no
/// audit trace.
pub async fn delete(state: &AppState, actor: &Actor, id: Uuid) -> WebResult<()> {
    let repo = AthleteRepository::new(state.db.pool());
    let existing = repo.find_by_id(id).await?;

    if !actor.can_modify(existing.coach_id) {
        return Err(WebError::Forbidden(
            "You do not have permission to modify this athlete".to_string(),
        ));
    }

    repo.delete(id).await?;

    info!(athlete_id = %id, coach = %actor.email, "athlete deleted");

    state
        .audit
        .record(NewAuditLog::new(
            AuditAction::Delete,
            snapshot_payload(&existing),
            actor.coach_id,
            &actor.email,
            actor.dojo_name(),
        ))
        .await;

    Ok(())
}

/// Admins see the whole tournament; coaches only their own registrations.
pub async fn list(
    state: &AppState,
    actor: &Actor,
    query: &AthleteQuery,
) -> WebResult<Vec<AthleteListRow>> {
    let scope = if actor.is_admin {
        None
    } else {
        Some(actor.coach_id)
    };

    let rows = AthleteRepository::new(state.db.pool())
        .list(scope, query)
        .await?;
    Ok(rows)
}

pub async fn stats(state: &AppState, actor: &Actor) -> WebResult<AthleteStats> {
    let rows = list(state, actor, &AthleteQuery::default()).await?;

    let mut stats = AthleteStats {
        total: rows.len(),
        ..Default::default()
    };
    for row in &rows {
        *stats
            .by_day
            .entry(row.competition_day.as_str().to_string())
            .or_default() += 1;
        *stats
            .by_belt
            .entry(row.belt_rank.as_str().to_string())
            .or_default() += 1;
        *stats
            .by_gender
            .entry(row.gender.as_str().to_string())
            .or_default() += 1;
        if row.kata_event {
            stats.kata += 1;
        }
        if row.kumite_event {
            stats.kumite += 1;
        }
    }

    Ok(stats)
}
