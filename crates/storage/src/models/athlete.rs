use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;

/// One tournament registration, owned by a coach and scoped to a dojo.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Athlete {
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

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Belt ranks in ascending order, White through Black 5th Dan.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
pub enum BeltRank {
    White,
    Yellow,
    Orange,
    Green,
    Blue,
    Purple,
    Brown,
    #[serde(rename = "Black 1st Dan")]
    #[sqlx(rename = "Black 1st Dan")]
    Black1stDan,
    #[serde(rename = "Black 2nd Dan")]
    #[sqlx(rename = "Black 2nd Dan")]
    Black2ndDan,
    #[serde(rename = "Black 3rd Dan")]
    #[sqlx(rename = "Black 3rd Dan")]
    Black3rdDan,
    #[serde(rename = "Black 4th Dan")]
    #[sqlx(rename = "Black 4th Dan")]
    Black4thDan,
    #[serde(rename = "Black 5th Dan")]
    #[sqlx(rename = "Black 5th Dan")]
    Black5thDan,
}

impl BeltRank {
    pub const ALL: [BeltRank; 12] = [
        BeltRank::White,
        BeltRank::Yellow,
        BeltRank::Orange,
        BeltRank::Green,
        BeltRank::Blue,
        BeltRank::Purple,
        BeltRank::Brown,
        BeltRank::Black1stDan,
        BeltRank::Black2ndDan,
        BeltRank::Black3rdDan,
        BeltRank::Black4thDan,
        BeltRank::Black5thDan,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BeltRank::White => "White",
            BeltRank::Yellow => "Yellow",
            BeltRank::Orange => "Orange",
            BeltRank::Green => "Green",
            BeltRank::Blue => "Blue",
            BeltRank::Purple => "Purple",
            BeltRank::Brown => "Brown",
            BeltRank::Black1stDan => "Black 1st Dan",
            BeltRank::Black2ndDan => "Black 2nd Dan",
            BeltRank::Black3rdDan => "Black 3rd Dan",
            BeltRank::Black4thDan => "Black 4th Dan",
            BeltRank::Black5thDan => "Black 5th Dan",
        }
    }
}

impl fmt::Display for BeltRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
pub enum CompetitionDay {
    #[serde(rename = "Day 1")]
    #[sqlx(rename = "Day 1")]
    Day1,
    #[serde(rename = "Day 2")]
    #[sqlx(rename = "Day 2")]
    Day2,
    Both,
}

impl CompetitionDay {
    pub const ALL: [CompetitionDay; 3] =
        [CompetitionDay::Day1, CompetitionDay::Day2, CompetitionDay::Both];

    pub fn as_str(&self) -> &'static str {
        match self {
            CompetitionDay::Day1 => "Day 1",
            CompetitionDay::Day2 => "Day 2",
            CompetitionDay::Both => "Both",
        }
    }
}

impl fmt::Display for CompetitionDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
