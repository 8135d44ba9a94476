// src/models/filter.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Search text plus attribute filters applied to a record list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterState {
    pub department: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub search_query: Option<String>,
}

impl FilterState {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Query parameters shared by the list and export endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    /// Search keyword (case-insensitive substring).
    pub q: Option<String>,

    /// Exact department name.
    pub department: Option<String>,

    /// Inclusive lower bound, `YYYY-MM-DD`.
    pub date_from: Option<String>,

    /// Inclusive upper bound, `YYYY-MM-DD`.
    pub date_to: Option<String>,

    /// 1-based page number (default: 1).
    pub page: Option<usize>,

    /// Items per page (default: configured page size).
    pub page_size: Option<usize>,
}

impl ListParams {
    /// Blank parameters mean "not set".
    pub fn filter(&self) -> Result<FilterState, AppError> {
        Ok(FilterState {
            department: non_blank(&self.department),
            date_from: parse_date("date_from", &self.date_from)?,
            date_to: parse_date("date_to", &self.date_to)?,
            search_query: non_blank(&self.q),
        })
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn parse_date(name: &str, value: &Option<String>) -> Result<Option<NaiveDate>, AppError> {
    match non_blank(value) {
        Some(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| AppError::BadRequest(format!("{} must be a YYYY-MM-DD date", name))),
        None => Ok(None),
    }
}
