// src/handlers/notifications.rs

use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};

use crate::notify::Notifications;

/// Returns and clears the pending notifications, oldest first.
pub async fn drain_notifications(State(notifications): State<Arc<Notifications>>) -> impl IntoResponse {
    Json(notifications.drain().await)
}
