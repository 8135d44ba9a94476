// src/models/record.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::utils::time::parse_timestamp;

pub const UNKNOWN_EXAMINER: &str = "Unknown Examiner";
pub const NO_DEPARTMENT: &str = "No Department";
pub const NOT_AVAILABLE: &str = "N/A";

const ID_KEYS: &[&str] = &["attempt_id", "attemptId", "attempt", "id"];
const NAME_KEYS: &[&str] = &["examiner_name", "name", "examinee_name"];
const CREATED_AT_KEYS: &[&str] = &["created_at", "createdAt"];
const QUIZ_NAME_KEYS: &[&str] = &["quiz_name", "quizName"];

/// One test attempt, in the single shape the rest of the crate works with.
///
/// Every field is optional: the upstream enforces no schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptRecord {
    pub id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub department: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub created_at: Option<String>,
    pub score: Option<String>,
    pub status: Option<String>,
    pub quiz_name: Option<String>,
}

impl AttemptRecord {
    /// Maps one upstream JSON object onto the canonical record.
    ///
    /// Each field takes the first non-blank value among its source keys:
    ///
    /// * `id`: `attempt_id`, `attemptId`, `attempt`, `id`
    /// * `name`: `examiner_name`, `name`, `examinee_name`
    /// * `created_at`: `created_at`, `createdAt`
    /// * `quiz_name`: `quiz_name`, `quizName`
    /// * the rest: the key of the same name.
    ///
    /// Strings are trimmed, numbers and booleans are stringified. Nulls,
    /// arrays and objects count as missing. A non-object value yields an
    /// empty record.
    pub fn from_value(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            return Self::default();
        };

        Self {
            id: first_of(object, ID_KEYS),
            name: first_of(object, NAME_KEYS),
            email: first_of(object, &["email"]),
            department: first_of(object, &["department"]),
            date: first_of(object, &["date"]),
            time: first_of(object, &["time"]),
            created_at: first_of(object, CREATED_AT_KEYS),
            score: first_of(object, &["score"]),
            status: first_of(object, &["status"]),
            quiz_name: first_of(object, QUIZ_NAME_KEYS),
        }
    }

    pub fn from_values(values: &[Value]) -> Vec<Self> {
        values.iter().map(Self::from_value).collect()
    }

    /// Identifier used for deletes: `id`, else the `"date|time"` composite.
    pub fn attempt_key(&self) -> String {
        match &self.id {
            Some(id) => id.clone(),
            None => format!(
                "{}|{}",
                self.date.as_deref().unwrap_or(""),
                self.time.as_deref().unwrap_or("")
            ),
        }
    }

    /// Person an attempt belongs to: email, else name, else the attempt key.
    pub fn group_key(&self) -> String {
        self.email
            .clone()
            .or_else(|| self.name.clone())
            .unwrap_or_else(|| self.attempt_key())
    }

    /// Timestamp used by the date-range filter: `created_at`, else `date`.
    pub fn filter_timestamp(&self) -> Option<DateTime<Utc>> {
        self.created_at
            .as_deref()
            .and_then(parse_timestamp)
            .or_else(|| self.date.as_deref().and_then(parse_timestamp))
    }

    /// Timestamp used to order attempts: `created_at`, else `"date time"`.
    pub fn sort_timestamp(&self) -> Option<DateTime<Utc>> {
        if let Some(ts) = self.created_at.as_deref().and_then(parse_timestamp) {
            return Some(ts);
        }
        let combined = format!(
            "{} {}",
            self.date.as_deref().unwrap_or(""),
            self.time.as_deref().unwrap_or("")
        );
        parse_timestamp(&combined)
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNKNOWN_EXAMINER)
    }

    pub fn display_department(&self) -> &str {
        self.department.as_deref().unwrap_or(NO_DEPARTMENT)
    }

    pub fn numeric_score(&self) -> Option<f64> {
        self.score
            .as_deref()
            .map(|s| s.trim_end_matches('%'))
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|s| s.is_finite())
    }
}

fn first_of(object: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| object.get(*key).and_then(scalar_to_string))
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn or_na(field: &Option<String>) -> String {
    field.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Attempt as rendered in list views, with display fallbacks applied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptRow {
    pub attempt_id: String,
    pub examiner: String,
    pub email: String,
    pub department: String,
    pub date: String,
    pub time: String,
    pub score: String,
    pub status: String,
    pub quiz_name: String,
}

impl From<&AttemptRecord> for AttemptRow {
    fn from(record: &AttemptRecord) -> Self {
        Self {
            attempt_id: record.attempt_key(),
            examiner: record.display_name().to_string(),
            email: or_na(&record.email),
            department: record.display_department().to_string(),
            date: or_na(&record.date),
            time: or_na(&record.time),
            score: or_na(&record.score),
            status: or_na(&record.status),
            quiz_name: or_na(&record.quiz_name),
        }
    }
}
