use axum::{
    middleware,
    routing::{delete, get},
    Router,
};

use super::handlers::{add_allowed_email, list_allowed_emails, remove_allowed_email};
use crate::middleware::auth::require_auth;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_allowed_emails).post(add_allowed_email))
        .route("/:email", delete(remove_allowed_email))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}
