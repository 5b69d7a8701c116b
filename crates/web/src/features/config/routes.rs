use axum::{
    middleware,
    routing::{get, put},
    Router,
};

use super::handlers::{get_config, update_config};
use crate::middleware::auth::require_auth;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/:key", put(update_config))
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    Router::new().route("/", get(get_config)).merge(protected)
}
