// src/handlers/examiners.rs

use axum::{
    Extension, Json,
    extract::{Query, State},
    response::IntoResponse,
};
use serde_json::json;

use crate::{
    error::AppError,
    handlers::page_window,
    models::{filter::ListParams, record::AttemptRow},
    pipeline::paginate,
    state::AppState,
    utils::jwt::BearerToken,
};

/// Lists examiners from the upstream examiners endpoint, filtered and paged.
pub async fn list_examiners(
    State(state): State<AppState>,
    Extension(BearerToken(token)): Extension<BearerToken>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, AppError> {
    let filter = params.filter()?;
    let (page, page_size) = page_window(&params, &state.config);

    state
        .examiners
        .ensure_loaded(state.api.as_ref(), &token, &state.notifications)
        .await?;

    let page = state
        .examiners
        .with_filter(filter, |store| paginate(store.filtered(), page, page_size))
        .await?;

    Ok(Json(page.map(|record| AttemptRow::from(&record))))
}

/// Re-fetches the examiners list.
pub async fn refresh_examiners(
    State(state): State<AppState>,
    Extension(BearerToken(token)): Extension<BearerToken>,
) -> Result<impl IntoResponse, AppError> {
    let count = state
        .examiners
        .load(state.api.as_ref(), &token, &state.notifications)
        .await?;

    Ok(Json(json!({ "count": count })))
}
