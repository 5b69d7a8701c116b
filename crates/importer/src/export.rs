use storage::dto::athlete::AthleteListRow;

use crate::error::Result;

const HEADERS: [&str; 11] = [
    "Name",
    "Date of Birth",
    "Gender",
    "Belt Rank",
    "Weight (kg)",
    "Competition Day",
    "Kata",
    "Kumite",
    "Dojo",
    "Registered By",
    "Registration Date",
];

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

/// Render athletes (joined with dojo/coach display names) as CSV for the
/// tournament desk.
pub fn export_csv(rows: &[AthleteListRow]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(HEADERS)?;

    for row in rows {
        writer.write_record([
            row.full_name.as_str(),
            &row.date_of_birth.format("%Y-%m-%d").to_string(),
            row.gender.as_str(),
            row.belt_rank.as_str(),
            &row.weight_kg.map(|w| w.to_string()).unwrap_or_default(),
            row.competition_day.as_str(),
            yes_no(row.kata_event),
            yes_no(row.kumite_event),
            row.dojo_name.as_str(),
            row.coach_name.as_str(),
            &row.created_at.format("%Y-%m-%d").to_string(),
        ])?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
