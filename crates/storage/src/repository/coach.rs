use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::{Coach, Dojo};

/// The resolved acting coach for one request, joined with their dojo name.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ActorRow {
    pub coach_id: Uuid,
    pub email: String,
    pub dojo_id: Option<Uuid>,
    pub dojo_name: Option<String>,
    pub is_admin: bool,
}

pub struct CoachRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CoachRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Resolve a bearer credential to an actor. An unknown token is a
    /// `NotFound`, which the web layer turns into a 401.
    pub async fn find_actor_by_token(&self, token: &str) -> Result<ActorRow> {
        let actor = sqlx::query_as::<_, ActorRow>(
            "SELECT c.id AS coach_id, c.email, c.dojo_id, d.name AS dojo_name, c.is_admin \
             FROM coaches c \
             LEFT JOIN dojos d ON d.id = c.dojo_id \
             WHERE c.api_token = ?1",
        )
        .bind(token)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(actor)
    }

    pub async fn create_dojo(&self, name: &str) -> Result<Dojo> {
        let dojo = sqlx::query_as::<_, Dojo>(
            "INSERT INTO dojos (id, name, created_at) VALUES (?1, ?2, ?3) \
             RETURNING id, name, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await?;

        Ok(dojo)
    }

    pub async fn create_coach(
        &self,
        email: &str,
        full_name: &str,
        dojo_id: Option<Uuid>,
        is_admin: bool,
        api_token: &str,
    ) -> Result<Coach> {
        let coach = sqlx::query_as::<_, Coach>(
            "INSERT INTO coaches (id, email, full_name, dojo_id, is_admin, onboarding_complete, \
             api_token, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6, ?7) \
             RETURNING id, email, full_name, dojo_id, is_admin, onboarding_complete, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(full_name)
        .bind(dojo_id)
        .bind(is_admin)
        .bind(api_token)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await?;

        Ok(coach)
    }
}
