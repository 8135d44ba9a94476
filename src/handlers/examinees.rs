// src/handlers/examinees.rs

use axum::{
    Extension, Json,
    extract::{Query, State},
    response::IntoResponse,
};

use crate::{
    error::AppError,
    handlers::page_window,
    models::filter::ListParams,
    pipeline::{ExamineeRow, group_by_examinee, paginate},
    state::AppState,
    utils::jwt::BearerToken,
};

/// Lists examinees with their attempts, grouped per person.
///
/// Filters apply to attempts before grouping, so a group only carries the
/// attempts that matched. Pagination counts groups, not attempts.
pub async fn list_examinees(
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

    let groups = state
        .results
        .with_filter(filter, |store| group_by_examinee(store.filtered()))
        .await;

    let page = paginate(&groups, page, page_size)?;
    Ok(Json(page.map(|group| ExamineeRow::from(&group))))
}
