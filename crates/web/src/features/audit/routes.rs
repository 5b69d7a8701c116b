use axum::{middleware, routing::get, Router};

use super::handlers::{audit_summary, list_audit_logs};
use crate::middleware::auth::require_auth;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_audit_logs))
        .route("/summary", get(audit_summary))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}
