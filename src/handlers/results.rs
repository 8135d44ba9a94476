// src/handlers/results.rs

use std::collections::HashSet;

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    error::AppError,
    handlers::page_window,
    models::{filter::ListParams, record::AttemptRow},
    pipeline::{export_filename, paginate, to_csv},
    state::AppState,
    utils::jwt::BearerToken,
};

/// Aggregate figures shown above the results table.
#[derive(Debug, Serialize, Deserialize)]
pub struct ResultsSummary {
    pub total_attempts: usize,
    pub total_examinees: usize,
    pub departments: usize,
    /// Mean over the numerically parseable scores, `None` when there are none.
    pub average_score: Option<f64>,
    /// A fetch of the results list is in flight.
    pub loading: bool,
}

/// Lists attempts matching the search and filters, one page at a time.
pub async fn list_results(
    State(state): State<AppState>,
    Extension(BearerToken(token)): Extension<BearerToken>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, AppError> {
    let filter = params.filter()?;
    let (page, page_size) = page_window(&params, &state.config);

    state
        .results
        .ensure_loaded(state.api.as_ref(), &token, &state.notifications)
        .await?;

    let page = state
        .results
        .with_filter(filter, |store| paginate(store.filtered(), page, page_size))
        .await?;

    Ok(Json(page.map(|record| AttemptRow::from(&record))))
}

/// Re-fetches the results list from the upstream API.
pub async fn refresh_results(
    State(state): State<AppState>,
    Extension(BearerToken(token)): Extension<BearerToken>,
) -> Result<impl IntoResponse, AppError> {
    let count = state
        .results
        .load(state.api.as_ref(), &token, &state.notifications)
        .await?;

    Ok(Json(json!({ "count": count })))
}

/// Downloads the filtered attempts as `examiners_<date>.csv`.
pub async fn export_results(
    State(state): State<AppState>,
    Extension(BearerToken(token)): Extension<BearerToken>,
    Query(params): Query<ListParams>,
) -> Result<Response, AppError> {
    let filter = params.filter()?;

    state
        .results
        .ensure_loaded(state.api.as_ref(), &token, &state.notifications)
        .await?;

    let csv = match state
        .results
        .with_filter(filter, |store| to_csv(store.filtered()))
        .await
    {
        Ok(csv) => csv,
        Err(e) => {
            tracing::warn!("Export requested for an empty selection");
            state.notifications.error("No data to export").await;
            return Err(e);
        }
    };

    let filename = export_filename(Utc::now().date_naive());
    tracing::info!("Exporting {} bytes as {}", csv.len(), filename);

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        csv,
    )
        .into_response())
}

/// Distinct departments across all loaded attempts.
pub async fn list_departments(
    State(state): State<AppState>,
    Extension(BearerToken(token)): Extension<BearerToken>,
) -> Result<impl IntoResponse, AppError> {
    state
        .results
        .ensure_loaded(state.api.as_ref(), &token, &state.notifications)
        .await?;

    let departments = state.results.read(|store| store.departments()).await;
    Ok(Json(departments))
}

/// Counts over the full, unfiltered results list.
pub async fn results_summary(
    State(state): State<AppState>,
    Extension(BearerToken(token)): Extension<BearerToken>,
) -> Result<impl IntoResponse, AppError> {
    state
        .results
        .ensure_loaded(state.api.as_ref(), &token, &state.notifications)
        .await?;

    let summary = state
        .results
        .read(|store| {
            let records = store.raw();
            let examinees: HashSet<String> = records.iter().map(|r| r.group_key()).collect();
            let scores: Vec<f64> = records.iter().filter_map(|r| r.numeric_score()).collect();
            let average_score =
                (!scores.is_empty()).then(|| scores.iter().sum::<f64>() / scores.len() as f64);

            ResultsSummary {
                total_attempts: records.len(),
                total_examinees: examinees.len(),
                departments: store.departments().len(),
                average_score,
                loading: store.is_loading(),
            }
        })
        .await;

    Ok(Json(summary))
}

/// Deletes one attempt upstream, then locally.
pub async fn delete_attempt(
    State(state): State<AppState>,
    Extension(BearerToken(token)): Extension<BearerToken>,
    Path(attempt_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state
        .results
        .delete_attempt(state.api.as_ref(), &token, &attempt_id, &state.notifications)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
