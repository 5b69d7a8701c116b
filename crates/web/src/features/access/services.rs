use storage::dto::config::AddAllowedEmailRequest;
use storage::models::AllowedEmail;
use storage::repository::access::AccessRepository;
use validator::Validate;

use crate::error::{WebError, WebResult};
use crate::middleware::auth::Actor;
use crate::state::AppState;

fn require_admin(actor: &Actor) -> WebResult<()> {
    if !actor.is_admin {
        return Err(WebError::Forbidden(
            "Only admins can manage the registration whitelist".to_string(),
        ));
    }
    Ok(())
}

pub async fn list(state: &AppState, actor: &Actor) -> WebResult<Vec<AllowedEmail>> {
    require_admin(actor)?;
    Ok(AccessRepository::new(state.db.pool()).list().await?)
}

pub async fn add(
    state: &AppState,
    actor: &Actor,
    req: &AddAllowedEmailRequest,
) -> WebResult<AllowedEmail> {
    require_admin(actor)?;
    req.validate()?;

    let entry = AccessRepository::new(state.db.pool())
        .add(&req.email, actor.coach_id)
        .await?;
    Ok(entry)
}

pub async fn remove(state: &AppState, actor: &Actor, email: &str) -> WebResult<()> {
    require_admin(actor)?;
    AccessRepository::new(state.db.pool()).remove(email).await?;
    Ok(())
}
