use std::borrow::Cow;
use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::models::{Athlete, BeltRank, CompetitionDay, Gender};

/// Request payload for registering a single athlete.
///
/// Gender, belt rank and competition day are typed enums, so membership in
/// the allowed sets is enforced when the payload is deserialized (or, for
/// tabular imports, during coercion). Everything else is checked here, and
/// every rule runs regardless of earlier failures so the caller gets the
/// full error list in one pass.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_events", skip_on_field_errors = false))]
pub struct RegisterAthleteRequest {
    #[validate(custom(function = "validate_full_name"))]
    pub full_name: String,

    #[validate(custom(function = "validate_date_of_birth"))]
    pub date_of_birth: NaiveDate,

    pub gender: Gender,

    pub belt_rank: BeltRank,

    #[validate(range(min = 10.0, max = 200.0, message = "Weight must be between 10 and 200 kg"))]
    pub weight_kg: Option<f64>,

    pub competition_day: CompetitionDay,

    #[serde(default)]
    pub kata_event: bool,

    #[serde(default)]
    pub kumite_event: bool,
}

/// Partial update of an athlete's mutable fields. Name, date of birth and
/// gender are fixed at registration; identity changes go through the
/// tournament desk.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateAthleteRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub belt_rank: Option<BeltRank>,

    #[validate(range(min = 10.0, max = 200.0, message = "Weight must be between 10 and 200 kg"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub competition_day: Option<CompetitionDay>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub kata_event: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub kumite_event: Option<bool>,
}

impl UpdateAthleteRequest {
    /// JSON object holding only the fields the caller actually submitted,
    /// used verbatim as the UPDATE audit payload.
    pub fn changes(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.belt_rank.is_none()
            && self.weight_kg.is_none()
            && self.competition_day.is_none()
            && self.kata_event.is_none()
            && self.kumite_event.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AthleteResponse {
    pub id: Uuid,
    pub coach_id: Uuid,
    pub dojo_id: Uuid,
    pub full_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub belt_rank: BeltRank,
    pub weight_kg: Option<f64>,
    pub competition_day: CompetitionDay,
    pub kata_event: bool,
    pub kumite_event: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Athlete> for AthleteResponse {
    fn from(athlete: Athlete) -> Self {
        Self {
            id: athlete.id,
            coach_id: athlete.coach_id,
            dojo_id: athlete.dojo_id,
            full_name: athlete.full_name,
            date_of_birth: athlete.date_of_birth,
            gender: athlete.gender,
            belt_rank: athlete.belt_rank,
            weight_kg: athlete.weight_kg,
            competition_day: athlete.competition_day,
            kata_event: athlete.kata_event,
            kumite_event: athlete.kumite_event,
            created_at: athlete.created_at,
            updated_at: athlete.updated_at,
        }
    }
}

/// Athlete row joined with dojo and coach display names, for listings and
/// export.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct AthleteListRow {
    pub id: Uuid,
    pub full_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub belt_rank: BeltRank,
    pub weight_kg: Option<f64>,
    pub competition_day: CompetitionDay,
    pub kata_event: bool,
    pub kumite_event: bool,
    pub dojo_name: String,
    pub coach_name: String,
    pub coach_email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct AthleteQuery {
    pub search: Option<String>,
    pub day: Option<CompetitionDay>,
    pub belt: Option<BeltRank>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct BulkRegisterRequest {
    pub athletes: Vec<RegisterAthleteRequest>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BulkItemOutcome {
    pub name: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BulkRegisterResponse {
    pub successful: usize,
    pub failed: usize,
    pub results: Vec<BulkItemOutcome>,
}

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct AthleteStats {
    pub total: usize,
    #[schema(value_type = Object)]
    pub by_day: BTreeMap<String, usize>,
    #[schema(value_type = Object)]
    pub by_belt: BTreeMap<String, usize>,
    #[schema(value_type = Object)]
    pub by_gender: BTreeMap<String, usize>,
    pub kata: usize,
    pub kumite: usize,
}

/// Flattens validation errors into human-readable messages in a stable
/// field order, schema-level violations last.
pub fn collect_validation_errors(errors: &ValidationErrors) -> Vec<String> {
    const FIELD_ORDER: [&str; 7] = [
        "full_name",
        "date_of_birth",
        "gender",
        "belt_rank",
        "weight_kg",
        "competition_day",
        "__all__",
    ];

    let field_errors = errors.field_errors();
    let mut messages = Vec::new();

    for field in FIELD_ORDER {
        if let Some(errs) = field_errors.get(field) {
            for err in errs.iter() {
                messages.push(message_for(err));
            }
        }
    }

    // Anything validator reported outside the known field set.
    for (field, errs) in &field_errors {
        if !FIELD_ORDER.contains(field) {
            for err in errs.iter() {
                messages.push(message_for(err));
            }
        }
    }

    messages
}

fn message_for(err: &ValidationError) -> String {
    err.message
        .as_ref()
        .map(|m| m.to_string())
        .unwrap_or_else(|| err.code.to_string())
}

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

fn validate_full_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(invalid("name_required", "Name is required"));
    }
    if trimmed.chars().count() < 2 {
        return Err(invalid("name_too_short", "Name must be at least 2 characters"));
    }
    if trimmed.chars().count() > 100 {
        return Err(invalid("name_too_long", "Name must be less than 100 characters"));
    }
    Ok(())
}

fn validate_date_of_birth(dob: &NaiveDate) -> Result<(), ValidationError> {
    let today = Utc::now().date_naive();
    if *dob >= today {
        return Err(invalid("dob_not_past", "Date of birth must be in the past"));
    }

    let age_years = (today - *dob).num_days() as f64 / 365.25;
    if age_years < 3.0 {
        return Err(invalid("dob_too_young", "Athlete must be at least 3 years old"));
    }
    if age_years >= 100.0 {
        return Err(invalid("dob_out_of_range", "Invalid date of birth"));
    }

    Ok(())
}

fn validate_events(req: &RegisterAthleteRequest) -> Result<(), ValidationError> {
    if !req.kata_event && !req.kumite_event {
        return Err(invalid(
            "events_required",
            "At least one event (Kata or Kumite) must be selected",
        ));
    }
    Ok(())
}
