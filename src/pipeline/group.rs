// src/pipeline/group.rs

use std::{cmp::Reverse, collections::HashMap};

use serde::{Deserialize, Serialize};

use crate::models::record::{AttemptRecord, AttemptRow, NO_DEPARTMENT, NOT_AVAILABLE, UNKNOWN_EXAMINER};

/// All attempts of one examinee, most recent first.
#[derive(Debug, Clone, PartialEq)]
pub struct ExamineeGroup {
    pub key: String,
    pub name: String,
    pub attempts: Vec<AttemptRecord>,
}

impl ExamineeGroup {
    pub fn latest(&self) -> Option<&AttemptRecord> {
        self.attempts.first()
    }
}

/// Collapses attempts into per-person groups.
///
/// Groups are keyed by `AttemptRecord::group_key` and ordered by name,
/// case-insensitively, with raw name and then key as tie-breakers. Inside a
/// group attempts are ordered newest first; attempts without a parseable
/// timestamp go last in their original order.
///
/// Names compare by code point after lowercasing. There is no locale
/// collation, so a name starting with `É` sorts after one starting with `Z`.
pub fn group_by_examinee(records: &[AttemptRecord]) -> Vec<ExamineeGroup> {
    let mut buckets: HashMap<String, Vec<AttemptRecord>> = HashMap::new();
    for record in records {
        buckets
            .entry(record.group_key())
            .or_default()
            .push(record.clone());
    }

    let mut groups: Vec<ExamineeGroup> = buckets
        .into_iter()
        .map(|(key, mut attempts)| {
            attempts.sort_by_cached_key(|a| Reverse(a.sort_timestamp()));
            let name = attempts
                .iter()
                .find_map(|a| a.name.clone())
                .unwrap_or_else(|| UNKNOWN_EXAMINER.to_string());
            ExamineeGroup { key, name, attempts }
        })
        .collect();

    groups.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.key.cmp(&b.key))
    });
    groups
}

/// Examinee as rendered in the grouped view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamineeRow {
    pub key: String,
    pub name: String,
    pub email: String,
    pub department: String,
    pub attempt_count: usize,
    pub latest_score: Option<String>,
    pub attempts: Vec<AttemptRow>,
}

impl From<&ExamineeGroup> for ExamineeRow {
    fn from(group: &ExamineeGroup) -> Self {
        let email = group
            .attempts
            .iter()
            .find_map(|a| a.email.clone())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());
        let department = group
            .attempts
            .iter()
            .find_map(|a| a.department.clone())
            .unwrap_or_else(|| NO_DEPARTMENT.to_string());

        Self {
            key: group.key.clone(),
            name: group.name.clone(),
            email,
            department,
            attempt_count: group.attempts.len(),
            latest_score: group.latest().and_then(|a| a.score.clone()),
            attempts: group.attempts.iter().map(AttemptRow::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Vec<AttemptRecord> {
        AttemptRecord::from_values(&[
            json!({"id": 1, "name": "bob", "email": "bob@x.com", "created_at": "2024-01-01T10:00:00Z"}),
            json!({"id": 2, "name": "Alice", "email": "alice@x.com", "date": "2024-01-05", "time": "08:00"}),
            json!({"id": 3, "name": "bob", "email": "bob@x.com", "created_at": "2024-02-01T10:00:00Z"}),
            json!({"id": 4, "name": "Alice", "email": "alice@x.com", "date": "2024-01-07"}),
            json!({"id": 5, "name": "Alice", "email": "alice@x.com"}),
            json!({"id": 6, "name": "Zed"}),
            json!({"id": 7}),
        ])
    }

    #[test]
    fn every_record_lands_in_exactly_one_group() {
        let records = sample();
        let groups = group_by_examinee(&records);
        let mut ids: Vec<_> = groups
            .iter()
            .flat_map(|g| g.attempts.iter().map(|a| a.attempt_key()))
            .collect();
        ids.sort();
        assert_eq!(ids, vec!["1", "2", "3", "4", "5", "6", "7"]);
    }

    #[test]
    fn groups_sorted_by_name_ignoring_case() {
        let groups = group_by_examinee(&sample());
        let names: Vec<_> = groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "bob", UNKNOWN_EXAMINER, "Zed"]);
    }

    #[test]
    fn attempts_are_newest_first() {
        let groups = group_by_examinee(&sample());
        let alice = &groups[0];
        let order: Vec<_> = alice.attempts.iter().map(|a| a.attempt_key()).collect();
        assert_eq!(order, vec!["4", "2", "5"]);

        for group in &groups {
            let stamps: Vec<_> = group
                .attempts
                .iter()
                .filter_map(|a| a.sort_timestamp())
                .collect();
            assert!(stamps.windows(2).all(|w| w[0] >= w[1]));
        }
    }

    #[test]
    fn row_summarises_group() {
        let groups = group_by_examinee(&sample());
        let row = ExamineeRow::from(&groups[1]);
        assert_eq!(row.email, "bob@x.com");
        assert_eq!(row.attempt_count, 2);
        assert_eq!(row.attempts[0].attempt_id, "3");
        assert_eq!(row.department, NO_DEPARTMENT);
    }

    #[test]
    fn name_order_is_by_code_point_after_lowercasing() {
        let records = AttemptRecord::from_values(&[
            json!({"id": 1, "name": "Élodie"}),
            json!({"id": 2, "name": "zed"}),
            json!({"id": 3, "name": "Eve"}),
        ]);
        let names: Vec<_> = group_by_examinee(&records).into_iter().map(|g| g.name).collect();
        assert_eq!(names, vec!["Eve", "zed", "Élodie"]);
    }
}
