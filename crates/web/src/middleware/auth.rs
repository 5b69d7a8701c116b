use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use storage::error::StorageError;
use storage::repository::coach::{ActorRow, CoachRepository};
use uuid::Uuid;

use crate::error::WebError;
use crate::state::AppState;

/// Request-scoped identity resolved by the access gate. Threaded explicitly
/// through every service call; there is no ambient session state.
#[derive(Debug, Clone)]
pub struct Actor {
    pub coach_id: Uuid,
    pub email: String,
    pub dojo_id: Option<Uuid>,
    pub dojo_name: Option<String>,
    pub is_admin: bool,
}

impl Actor {
    pub fn dojo_name(&self) -> &str {
        self.dojo_name.as_deref().unwrap_or("Unknown")
    }

    pub fn can_modify(&self, owner: Uuid) -> bool {
        self.is_admin || self.coach_id == owner
    }
}

impl From<ActorRow> for Actor {
    fn from(row: ActorRow) -> Self {
        Self {
            coach_id: row.coach_id,
            email: row.email,
            dojo_id: row.dojo_id,
            dojo_name: row.dojo_name,
            is_admin: row.is_admin,
        }
    }
}

/// Resolve the bearer credential to an [`Actor`] and stash it in request
/// extensions. Fails closed: no token, an unknown token, or a gate lookup
/// error all yield 401.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, WebError> {
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(WebError::Unauthorized)?;

    let actor = CoachRepository::new(state.db.pool())
        .find_actor_by_token(token)
        .await
        .map_err(|e| {
            if !matches!(e, StorageError::NotFound) {
                tracing::error!("Actor lookup failed: {e}");
            }
            WebError::Unauthorized
        })?;

    req.extensions_mut().insert(Actor::from(actor));
    Ok(next.run(req).await)
}
