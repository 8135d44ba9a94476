// src/pipeline/filter.rs

use chrono::{DateTime, Utc};

use crate::{
    models::{filter::FilterState, record::AttemptRecord},
    utils::time::{end_of_day, start_of_day},
};

/// A `FilterState` with the query lowercased and the day bounds resolved.
struct Matcher<'a> {
    query: Option<String>,
    department: Option<&'a str>,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
}

impl<'a> Matcher<'a> {
    fn new(filter: &'a FilterState) -> Self {
        Self {
            query: filter.search_query.as_deref().map(str::to_lowercase),
            department: filter.department.as_deref(),
            from: filter.date_from.map(start_of_day),
            to: filter.date_to.map(end_of_day),
        }
    }

    fn matches(&self, record: &AttemptRecord) -> bool {
        self.matches_search(record) && self.matches_department(record) && self.matches_range(record)
    }

    fn matches_search(&self, record: &AttemptRecord) -> bool {
        let Some(query) = &self.query else {
            return true;
        };
        [
            &record.name,
            &record.email,
            &record.department,
            &record.date,
            &record.time,
            &record.created_at,
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(query.as_str()))
    }

    fn matches_department(&self, record: &AttemptRecord) -> bool {
        match self.department {
            Some(department) => record.department.as_deref() == Some(department),
            None => true,
        }
    }

    fn matches_range(&self, record: &AttemptRecord) -> bool {
        if self.from.is_none() && self.to.is_none() {
            return true;
        }
        // A bound is set: records without a usable timestamp cannot satisfy it.
        let Some(ts) = record.filter_timestamp() else {
            return false;
        };
        self.from.is_none_or(|from| ts >= from) && self.to.is_none_or(|to| ts <= to)
    }
}

/// AND-composes the search, department and date-range filters.
/// Input order is preserved.
pub fn apply_filter(records: &[AttemptRecord], filter: &FilterState) -> Vec<AttemptRecord> {
    if filter.is_empty() {
        return records.to_vec();
    }
    let matcher = Matcher::new(filter);
    records
        .iter()
        .filter(|record| matcher.matches(record))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn records() -> Vec<AttemptRecord> {
        AttemptRecord::from_values(&[
            json!({"id": 1, "name": "A", "email": "a@x.com", "department": "Eng", "date": "2024-01-01"}),
            json!({"id": 2, "name": "B", "email": "b@x.com", "department": "Sales", "date": "2024-01-02"}),
            json!({"id": 3, "name": "Carla Diaz", "email": "carla@y.org", "department": "Eng",
                   "created_at": "2024-01-03T23:59:59.500Z"}),
            json!({"id": 4, "name": "No Date", "department": "Eng"}),
        ])
    }

    fn day(d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(2024, 1, d)
    }

    #[test]
    fn department_filter_selects_exact_matches() {
        let filter = FilterState {
            department: Some("Eng".into()),
            ..Default::default()
        };
        let out = apply_filter(&records()[..2], &filter);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id.as_deref(), Some("1"));

        let filter = FilterState {
            department: Some("eng".into()),
            ..Default::default()
        };
        assert!(apply_filter(&records(), &filter).is_empty());
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let filter = FilterState {
            search_query: Some("CARLA".into()),
            ..Default::default()
        };
        let out = apply_filter(&records(), &filter);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id.as_deref(), Some("3"));

        let filter = FilterState {
            search_query: Some("x.com".into()),
            ..Default::default()
        };
        assert_eq!(apply_filter(&records(), &filter).len(), 2);
    }

    #[test]
    fn search_results_always_contain_the_query() {
        let all = records();
        for query in ["a", "eng", "2024-01", "@", "zzz"] {
            let filter = FilterState {
                search_query: Some(query.into()),
                ..Default::default()
            };
            for record in apply_filter(&all, &filter) {
                assert!(all.contains(&record));
                let hit = [&record.name, &record.email, &record.department, &record.date, &record.time, &record.created_at]
                    .into_iter()
                    .flatten()
                    .any(|f| f.to_lowercase().contains(query));
                assert!(hit, "record {:?} does not contain {}", record.id, query);
            }
        }
    }

    #[test]
    fn date_range_is_inclusive_on_both_days() {
        let filter = FilterState {
            date_from: day(2),
            date_to: day(3),
            ..Default::default()
        };
        let ids: Vec<_> = apply_filter(&records(), &filter)
            .into_iter()
            .filter_map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["2", "3"]);
    }

    #[test]
    fn records_without_timestamp_fail_a_set_bound() {
        let filter = FilterState {
            date_from: day(1),
            ..Default::default()
        };
        let out = apply_filter(&records(), &filter);
        assert!(out.iter().all(|r| r.id.as_deref() != Some("4")));
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn filters_compose_with_and() {
        let filter = FilterState {
            department: Some("Eng".into()),
            search_query: Some("carla".into()),
            date_to: day(2),
            ..Default::default()
        };
        assert!(apply_filter(&records(), &filter).is_empty());
    }
}
