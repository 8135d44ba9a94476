// src/pipeline/export.rs

use chrono::NaiveDate;

use crate::{error::AppError, models::record::AttemptRecord};

pub const CSV_HEADER: &str = "Examiner,Email,Department,Date,Time,AttemptId";

/// Serializes records to CSV, one row per record, rows joined by `\n`.
///
/// Only the examiner name is quoted. The other columns are written as-is,
/// so a comma or quote inside them shifts the columns of that row.
pub fn to_csv(records: &[AttemptRecord]) -> Result<String, AppError> {
    if records.is_empty() {
        return Err(AppError::BadRequest("No data to export".to_string()));
    }

    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(CSV_HEADER.to_string());
    for record in records {
        lines.push(format!(
            "\"{}\",{},{},{},{},{}",
            field(&record.name),
            field(&record.email),
            field(&record.department),
            field(&record.date),
            field(&record.time),
            field(&record.id),
        ));
    }
    Ok(lines.join("\n"))
}

/// `examiners_<YYYY-MM-DD>.csv`
pub fn export_filename(date: NaiveDate) -> String {
    format!("examiners_{}.csv", date.format("%Y-%m-%d"))
}

fn field(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}
