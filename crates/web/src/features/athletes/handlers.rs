use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Serialize;
use storage::dto::athlete::{
    AthleteQuery, AthleteResponse, AthleteStats, BulkItemOutcome, BulkRegisterRequest,
    BulkRegisterResponse, RegisterAthleteRequest, UpdateAthleteRequest,
};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::WebError;
use crate::middleware::auth::Actor;
use crate::state::AppState;

use super::services;

/// Outcome of a CSV upload: rows that failed parsing or coercion, then the
/// per-record registration outcomes for the rows that survived.
#[derive(Debug, Serialize, ToSchema)]
pub struct ImportResponse {
    pub successful: usize,
    pub failed: usize,
    pub parse_errors: Vec<String>,
    pub results: Vec<BulkItemOutcome>,
}

#[utoipa::path(
    post,
    path = "/api/athletes",
    request_body = RegisterAthleteRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Athlete registered", body = AthleteResponse),
        (status = 400, description = "Validation failed"),
        (status = 403, description = "Registration closed or no dojo"),
        (status = 409, description = "Duplicate registration")
    ),
    tag = "athletes"
)]
pub async fn register_athlete(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(req): Json<RegisterAthleteRequest>,
) -> Result<Response, WebError> {
    let athlete = services::register(&state, &actor, &req).await?;
    Ok((StatusCode::CREATED, Json(AthleteResponse::from(athlete))).into_response())
}

#[utoipa::path(
    post,
    path = "/api/athletes/bulk",
    request_body = BulkRegisterRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Per-record outcomes", body = BulkRegisterResponse)
    ),
    tag = "athletes"
)]
pub async fn bulk_register_athletes(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(req): Json<BulkRegisterRequest>,
) -> Result<Response, WebError> {
    let outcome = services::bulk_register(&state, &actor, &req).await?;
    Ok(Json(outcome).into_response())
}

#[utoipa::path(
    get,
    path = "/api/athletes",
    params(
        ("search" = Option<String>, Query, description = "Substring match on name"),
        ("day" = Option<String>, Query, description = "Competition day filter"),
        ("belt" = Option<String>, Query, description = "Belt rank filter")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Athletes visible to the caller")
    ),
    tag = "athletes"
)]
pub async fn list_athletes(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(query): Query<AthleteQuery>,
) -> Result<Response, WebError> {
    let rows = services::list(&state, &actor, &query).await?;
    Ok(Json(rows).into_response())
}

#[utoipa::path(
    get,
    path = "/api/athletes/stats",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Registration counts", body = AthleteStats)
    ),
    tag = "athletes"
)]
pub async fn athlete_stats(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Response, WebError> {
    let stats = services::stats(&state, &actor).await?;
    Ok(Json(stats).into_response())
}

#[utoipa::path(
    put,
    path = "/api/athletes/{id}",
    request_body = UpdateAthleteRequest,
    params(
        ("id" = Uuid, Path, description = "Athlete id")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Athlete updated", body = AthleteResponse),
        (status = 403, description = "Not the owning coach"),
        (status = 404, description = "Unknown athlete")
    ),
    tag = "athletes"
)]
pub async fn update_athlete(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateAthleteRequest>,
) -> Result<Response, WebError> {
    let athlete = services::update(&state, &actor, id, &req).await?;
    Ok(Json(AthleteResponse::from(athlete)).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/athletes/{id}",
    params(
        ("id" = Uuid, Path, description = "Athlete id")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Athlete removed"),
        (status = 403, description = "Not the owning coach"),
        (status = 404, description = "Unknown athlete")
    ),
    tag = "athletes"
)]
pub async fn delete_athlete(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    services::delete(&state, &actor, id).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    post,
    path = "/api/athletes/import",
    request_body(content = Vec<u8>, content_type = "text/csv"),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Import outcomes", body = ImportResponse),
        (status = 400, description = "File is not usable CSV")
    ),
    tag = "athletes"
)]
pub async fn import_athletes(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    body: Bytes,
) -> Result<Response, WebError> {
    let report = importer::parse_csv(&body)?;

    let bulk = services::bulk_register(
        &state,
        &actor,
        &BulkRegisterRequest {
            athletes: report.athletes,
        },
    )
    .await?;

    let failed = bulk.failed + report.errors.len();
    Ok(Json(ImportResponse {
        successful: bulk.successful,
        failed,
        parse_errors: report.errors,
        results: bulk.results,
    })
    .into_response())
}

#[utoipa::path(
    get,
    path = "/api/athletes/export",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "CSV of the caller's visible athletes")
    ),
    tag = "athletes"
)]
pub async fn export_athletes(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Response, WebError> {
    let rows = services::list(&state, &actor, &AthleteQuery::default()).await?;
    let csv = importer::export_csv(&rows)
        .map_err(|e| WebError::InternalServerError(format!("CSV export failed: {e}")))?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"athletes.csv\"",
            ),
        ],
        csv,
    )
        .into_response())
}
