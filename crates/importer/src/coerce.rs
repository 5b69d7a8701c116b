//! Cell-level type coercion: flexible date formats, yes/no/1/0 booleans,
//! gender synonyms, fuzzy belt-name matching. Everything here is lossy on
//! purpose; strict domain validation happens afterwards.

use chrono::NaiveDate;
use storage::models::{BeltRank, CompetitionDay, Gender};

const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y", "%m-%d-%Y"];

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
}

/// Empty cells fall back to `default` (event columns default to entered).
pub fn parse_bool(value: &str, default: bool) -> bool {
    let value = value.trim().to_lowercase();
    if value.is_empty() {
        return default;
    }
    if let Ok(n) = value.parse::<f64>() {
        return n != 0.0;
    }
    matches!(value.as_str(), "yes" | "true" | "y" | "x")
}

/// Unparseable weights become "not provided" rather than an import error.
pub fn parse_weight(value: &str) -> Option<f64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    value.parse::<f64>().ok()
}

pub fn normalize_gender(value: &str) -> Option<Gender> {
    match value.trim().to_lowercase().as_str() {
        "male" | "m" | "boy" | "man" => Some(Gender::Male),
        "female" | "f" | "girl" | "woman" => Some(Gender::Female),
        _ => None,
    }
}

/// Exact label match first, then substring in either direction, so "black
/// 2nd" or "2nd dan" both resolve to Black 2nd Dan.
pub fn normalize_belt(value: &str) -> Option<BeltRank> {
    let value = value.trim().to_lowercase();
    if value.is_empty() {
        return None;
    }

    for belt in BeltRank::ALL {
        if belt.as_str().to_lowercase() == value {
            return Some(belt);
        }
    }
    for belt in BeltRank::ALL {
        let label = belt.as_str().to_lowercase();
        if label.contains(&value) || value.contains(&label) {
            return Some(belt);
        }
    }
    None
}

pub fn normalize_day(value: &str) -> Option<CompetitionDay> {
    let value = value.trim().to_lowercase();
    if value.is_empty() {
        return None;
    }
    if value.contains('1') {
        Some(CompetitionDay::Day1)
    } else if value.contains('2') {
        Some(CompetitionDay::Day2)
    } else if value.contains("both") || value.contains("all") {
        Some(CompetitionDay::Both)
    } else {
        None
    }
}

pub fn title_case(value: &str) -> String {
    value
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
