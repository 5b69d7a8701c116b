use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use storage::dto::config::AddAllowedEmailRequest;

use crate::error::WebError;
use crate::middleware::auth::Actor;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    get,
    path = "/api/allowed-emails",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Whitelisted emails"),
        (status = 403, description = "Not an admin")
    ),
    tag = "access"
)]
pub async fn list_allowed_emails(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Response, WebError> {
    let entries = services::list(&state, &actor).await?;
    Ok(Json(entries).into_response())
}

#[utoipa::path(
    post,
    path = "/api/allowed-emails",
    request_body = AddAllowedEmailRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Email whitelisted"),
        (status = 400, description = "Invalid email"),
        (status = 403, description = "Not an admin")
    ),
    tag = "access"
)]
pub async fn add_allowed_email(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(req): Json<AddAllowedEmailRequest>,
) -> Result<Response, WebError> {
    let entry = services::add(&state, &actor, &req).await?;
    Ok((StatusCode::CREATED, Json(entry)).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/allowed-emails/{email}",
    params(
        ("email" = String, Path, description = "Email to remove")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Email removed"),
        (status = 403, description = "Not an admin"),
        (status = 404, description = "Email not on the whitelist")
    ),
    tag = "access"
)]
pub async fn remove_allowed_email(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(email): Path<String>,
) -> Result<Response, WebError> {
    services::remove(&state, &actor, &email).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
