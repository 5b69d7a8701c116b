use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::dto::athlete::{AthleteListRow, AthleteQuery, RegisterAthleteRequest, UpdateAthleteRequest};
use crate::error::{Result, StorageError};
use crate::models::Athlete;

const ATHLETE_COLUMNS: &str = "id, coach_id, dojo_id, full_name, date_of_birth, gender, belt_rank, \
     weight_kg, competition_day, kata_event, kumite_event, created_at, updated_at";

pub struct AthleteRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> AthleteRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Duplicate pre-check: does a live athlete with this trimmed name and
    /// date of birth already exist in the dojo? Callers without a dojo get
    /// an unscoped check; the composite unique constraint remains the
    /// authoritative guard either way.
    pub async fn exists(
        &self,
        full_name: &str,
        date_of_birth: chrono::NaiveDate,
        dojo_id: Option<Uuid>,
    ) -> Result<bool> {
        let count: i64 = match dojo_id {
            Some(dojo_id) => {
                sqlx::query_scalar(
                    "SELECT COUNT(1) FROM athletes \
                     WHERE full_name = ?1 AND date_of_birth = ?2 AND dojo_id = ?3",
                )
                .bind(full_name.trim())
                .bind(date_of_birth)
                .bind(dojo_id)
                .fetch_one(self.pool)
                .await?
            }
            None => {
                sqlx::query_scalar(
                    "SELECT COUNT(1) FROM athletes WHERE full_name = ?1 AND date_of_birth = ?2",
                )
                .bind(full_name.trim())
                .bind(date_of_birth)
                .fetch_one(self.pool)
                .await?
            }
        };

        Ok(count > 0)
    }

    /// Insert a new registration scoped to the given coach and dojo.
    pub async fn create(
        &self,
        coach_id: Uuid,
        dojo_id: Uuid,
        req: &RegisterAthleteRequest,
    ) -> Result<Athlete> {
        let athlete = sqlx::query_as::<_, Athlete>(&format!(
            "INSERT INTO athletes (id, coach_id, dojo_id, full_name, date_of_birth, gender, \
             belt_rank, weight_kg, competition_day, kata_event, kumite_event, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12) \
             RETURNING {ATHLETE_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(coach_id)
        .bind(dojo_id)
        .bind(req.full_name.trim())
        .bind(req.date_of_birth)
        .bind(req.gender)
        .bind(req.belt_rank)
        .bind(req.weight_kg)
        .bind(req.competition_day)
        .bind(req.kata_event)
        .bind(req.kumite_event)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await?;

        Ok(athlete)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Athlete> {
        let athlete = sqlx::query_as::<_, Athlete>(&format!(
            "SELECT {ATHLETE_COLUMNS} FROM athletes WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(athlete)
    }

    /// Apply a partial update over the existing row and stamp `updated_at`.
    pub async fn update(
        &self,
        id: Uuid,
        existing: &Athlete,
        req: &UpdateAthleteRequest,
    ) -> Result<Athlete> {
        let belt_rank = req.belt_rank.unwrap_or(existing.belt_rank);
        let weight_kg = req.weight_kg.or(existing.weight_kg);
        let competition_day = req.competition_day.unwrap_or(existing.competition_day);
        let kata_event = req.kata_event.unwrap_or(existing.kata_event);
        let kumite_event = req.kumite_event.unwrap_or(existing.kumite_event);

        let athlete = sqlx::query_as::<_, Athlete>(&format!(
            "UPDATE athletes \
             SET belt_rank = ?2, weight_kg = ?3, competition_day = ?4, kata_event = ?5, \
                 kumite_event = ?6, updated_at = ?7 \
             WHERE id = ?1 \
             RETURNING {ATHLETE_COLUMNS}"
        ))
        .bind(id)
        .bind(belt_rank)
        .bind(weight_kg)
        .bind(competition_day)
        .bind(kata_event)
        .bind(kumite_event)
        .bind(Utc::now())
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(athlete)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM athletes WHERE id = ?1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    /// List athletes joined with dojo and coach names, newest first. When
    /// `scope_coach` is set the listing is restricted to that coach's own
    /// registrations.
    pub async fn list(
        &self,
        scope_coach: Option<Uuid>,
        query: &AthleteQuery,
    ) -> Result<Vec<AthleteListRow>> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT a.id, a.full_name, a.date_of_birth, a.gender, a.belt_rank, a.weight_kg, \
             a.competition_day, a.kata_event, a.kumite_event, a.created_at, \
             d.name AS dojo_name, c.full_name AS coach_name, c.email AS coach_email \
             FROM athletes a \
             JOIN dojos d ON d.id = a.dojo_id \
             JOIN coaches c ON c.id = a.coach_id \
             WHERE 1 = 1",
        );

        if let Some(coach_id) = scope_coach {
            qb.push(" AND a.coach_id = ").push_bind(coach_id);
        }
        if let Some(search) = query.search.as_deref().filter(|s| !s.is_empty()) {
            qb.push(" AND lower(a.full_name) LIKE ")
                .push_bind(format!("%{}%", search.to_lowercase()));
        }
        if let Some(day) = query.day {
            qb.push(" AND a.competition_day = ").push_bind(day);
        }
        if let Some(belt) = query.belt {
            qb.push(" AND a.belt_rank = ").push_bind(belt);
        }

        qb.push(" ORDER BY a.created_at DESC");

        let rows = qb
            .build_query_as::<AthleteListRow>()
            .fetch_all(self.pool)
            .await?;

        Ok(rows)
    }
}
