use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Extension, Json,
};
use storage::dto::config::{ConfigResponse, UpdateConfigRequest};

use crate::error::WebError;
use crate::middleware::auth::Actor;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    get,
    path = "/api/config",
    responses(
        (status = 200, description = "All tournament settings")
    ),
    tag = "config"
)]
pub async fn get_config(State(state): State<AppState>) -> Result<Response, WebError> {
    let values = services::get_all(&state).await?;
    Ok(Json(values).into_response())
}

#[utoipa::path(
    put,
    path = "/api/config/{key}",
    request_body = UpdateConfigRequest,
    params(
        ("key" = String, Path, description = "Config key")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Setting updated", body = ConfigResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not an admin")
    ),
    tag = "config"
)]
pub async fn update_config(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(key): Path<String>,
    Json(req): Json<UpdateConfigRequest>,
) -> Result<Response, WebError> {
    let updated = services::update(&state, &actor, &key, &req.value).await?;
    Ok(Json(updated).into_response())
}
