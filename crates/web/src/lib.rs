pub mod audit;
pub mod config;
pub mod error;
pub mod features;
pub mod middleware;
pub mod openapi;
pub mod state;

use axum::{routing::get, Json, Router};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;

use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Build the full application router over a ready [`AppState`].
pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/api/athletes", features::athletes::routes(state.clone()))
        .nest("/api/audit-logs", features::audit::routes(state.clone()))
        .nest("/api/config", features::config::routes(state.clone()))
        .nest("/api/allowed-emails", features::access::routes(state.clone()))
        .route(
            "/api-docs/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}
