//! Column-name normalization for tabular imports. Coaches hand in sheets
//! with whatever headers their club template uses, so each field accepts a
//! handful of synonyms, matched case-insensitively after trimming.

pub const FULL_NAME: &str = "full_name";
pub const DATE_OF_BIRTH: &str = "date_of_birth";
pub const GENDER: &str = "gender";
pub const BELT_RANK: &str = "belt_rank";
pub const WEIGHT_KG: &str = "weight_kg";
pub const COMPETITION_DAY: &str = "competition_day";
pub const KATA_EVENT: &str = "kata_event";
pub const KUMITE_EVENT: &str = "kumite_event";

pub const REQUIRED: [&str; 5] = [FULL_NAME, DATE_OF_BIRTH, GENDER, BELT_RANK, COMPETITION_DAY];

/// Map a raw header cell to its canonical field name.
pub fn canonical_field(header: &str) -> Option<&'static str> {
    match header.trim().to_lowercase().as_str() {
        "name" | "full name" | "athlete name" | "full_name" => Some(FULL_NAME),
        "dob" | "date of birth" | "birthdate" | "birth date" | "date_of_birth" => {
            Some(DATE_OF_BIRTH)
        }
        "gender" | "sex" => Some(GENDER),
        "belt" | "belt rank" | "belt_rank" | "rank" => Some(BELT_RANK),
        "weight" | "weight kg" | "weight_kg" | "weight (kg)" => Some(WEIGHT_KG),
        "day" | "competition day" | "competition_day" | "comp day" => Some(COMPETITION_DAY),
        "kata" | "kata event" | "kata_event" => Some(KATA_EVENT),
        "kumite" | "kumite event" | "kumite_event" => Some(KUMITE_EVENT),
        _ => None,
    }
}
