use std::collections::HashMap;

use storage::dto::athlete::{collect_validation_errors, RegisterAthleteRequest};
use tracing::debug;
use validator::Validate;

use crate::coerce;
use crate::columns;
use crate::error::{ImporterError, Result};

/// Outcome of parsing one tabular file: the rows that survived coercion and
/// validation, plus every per-row error. A file with some bad rows still
/// yields its good ones.
#[derive(Debug, Default)]
pub struct ImportReport {
    pub athletes: Vec<RegisterAthleteRequest>,
    pub errors: Vec<String>,
}

/// Parse a CSV export of the registration template into athlete requests.
///
/// Headers are matched case-insensitively against the synonym table in
/// [`columns`]; each cell goes through [`coerce`] before the record is
/// validated. Row numbers in errors are 1-indexed including the header row,
/// matching what the coach sees in their spreadsheet program.
pub fn parse_csv(data: &[u8]) -> Result<ImportReport> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(data);

    let headers = reader.headers()?.clone();
    if headers.is_empty() {
        return Err(ImporterError::EmptyFile);
    }

    let mut field_index: HashMap<&'static str, usize> = HashMap::new();
    for (idx, header) in headers.iter().enumerate() {
        if let Some(field) = columns::canonical_field(header) {
            field_index.entry(field).or_insert(idx);
        }
    }

    let missing: Vec<&str> = columns::REQUIRED
        .iter()
        .filter(|field| !field_index.contains_key(**field))
        .copied()
        .collect();
    if !missing.is_empty() {
        return Err(ImporterError::MissingColumns(missing.join(", ")));
    }

    let mut report = ImportReport::default();
    let mut saw_rows = false;

    for (idx, record) in reader.records().enumerate() {
        let record = record?;
        saw_rows = true;
        // Header is row 1 in the coach's spreadsheet.
        let row_number = idx + 2;

        let cell = |field: &str| -> &str {
            field_index
                .get(field)
                .and_then(|&i| record.get(i))
                .unwrap_or("")
        };

        let mut row_errors = Vec::new();

        let full_name = coerce::title_case(cell(columns::FULL_NAME));

        let date_of_birth = match cell(columns::DATE_OF_BIRTH) {
            "" => {
                row_errors.push("Date of birth is required".to_string());
                None
            }
            raw => match coerce::parse_date(raw) {
                Some(date) => Some(date),
                None => {
                    row_errors.push("Invalid date format (use YYYY-MM-DD)".to_string());
                    None
                }
            },
        };

        let gender = match cell(columns::GENDER) {
            "" => {
                row_errors.push("Gender is required".to_string());
                None
            }
            raw => match coerce::normalize_gender(raw) {
                Some(gender) => Some(gender),
                None => {
                    row_errors.push("Gender must be one of: Male, Female".to_string());
                    None
                }
            },
        };

        let belt_rank = match cell(columns::BELT_RANK) {
            "" => {
                row_errors.push("Belt rank is required".to_string());
                None
            }
            raw => match coerce::normalize_belt(raw) {
                Some(belt) => Some(belt),
                None => {
                    row_errors.push("Invalid belt rank".to_string());
                    None
                }
            },
        };

        let competition_day = match cell(columns::COMPETITION_DAY) {
            "" => {
                row_errors.push("Competition day is required".to_string());
                None
            }
            raw => match coerce::normalize_day(raw) {
                Some(day) => Some(day),
                None => {
                    row_errors.push("Competition day must be one of: Day 1, Day 2, Both".to_string());
                    None
                }
            },
        };

        let weight_kg = coerce::parse_weight(cell(columns::WEIGHT_KG));
        let kata_event = coerce::parse_bool(cell(columns::KATA_EVENT), true);
        let kumite_event = coerce::parse_bool(cell(columns::KUMITE_EVENT), true);

        if !row_errors.is_empty() {
            report
                .errors
                .extend(row_errors.into_iter().map(|e| format!("Row {row_number}: {e}")));
            continue;
        }

        // All four are Some here; the guards above pushed an error otherwise.
        let (Some(date_of_birth), Some(gender), Some(belt_rank), Some(competition_day)) =
            (date_of_birth, gender, belt_rank, competition_day)
        else {
            continue;
        };

        let request = RegisterAthleteRequest {
            full_name,
            date_of_birth,
            gender,
            belt_rank,
            weight_kg,
            competition_day,
            kata_event,
            kumite_event,
        };

        match request.validate() {
            Ok(()) => report.athletes.push(request),
            Err(errors) => report.errors.extend(
                collect_validation_errors(&errors)
                    .into_iter()
                    .map(|e| format!("Row {row_number}: {e}")),
            ),
        }
    }

    if !saw_rows {
        return Err(ImporterError::EmptyFile);
    }

    debug!(
        athletes = report.athletes.len(),
        errors = report.errors.len(),
        "parsed tabular import"
    );

    Ok(report)
}
