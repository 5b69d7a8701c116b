use std::collections::HashMap;

use serde_json::Value;
use storage::dto::config::ConfigResponse;
use storage::repository::config::ConfigRepository;

use crate::error::{WebError, WebResult};
use crate::middleware::auth::Actor;
use crate::state::AppState;

/// All tournament settings as parsed JSON values, through the cache.
pub async fn get_all(state: &AppState) -> WebResult<HashMap<String, Value>> {
    Ok(state.config.values(state.db.pool()).await?)
}

/// Admin-only upsert of one setting. The cache is invalidated before the
/// response goes out so the next gate check sees the new value.
pub async fn update(
    state: &AppState,
    actor: &Actor,
    key: &str,
    value: &Value,
) -> WebResult<ConfigResponse> {
    if !actor.is_admin {
        return Err(WebError::Forbidden(
            "Only admins can change tournament settings".to_string(),
        ));
    }

    let encoded = serde_json::to_string(value)
        .map_err(|e| WebError::BadRequest(format!("Value is not valid JSON: {e}")))?;

    let entry = ConfigRepository::new(state.db.pool())
        .upsert(key, &encoded, actor.coach_id)
        .await?;

    state.config.invalidate().await;

    Ok(ConfigResponse::from(entry))
}
