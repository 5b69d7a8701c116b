use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use super::handlers::{
    athlete_stats, bulk_register_athletes, delete_athlete, export_athletes, import_athletes,
    list_athletes, register_athlete, update_athlete,
};
use crate::middleware::auth::require_auth;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_athletes).post(register_athlete))
        .route("/bulk", post(bulk_register_athletes))
        .route("/stats", get(athlete_stats))
        .route("/import", post(import_athletes))
        .route("/export", get(export_athletes))
        .route("/:id", put(update_athlete).delete(delete_athlete))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}
