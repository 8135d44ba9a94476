// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{delete, get, post},
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    handlers::{auth, examinees, examiners, notifications, results},
    state::AppState,
    utils::jwt::session_middleware,
};

/// Assembles the main application router.
///
/// * Auth routes are public.
/// * Everything else requires a live session (`session_middleware`).
/// * Applies global middleware (Trace, CORS).
pub fn create_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .expose_headers([header::CONTENT_DISPOSITION]);

    let auth_routes = Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/session", get(auth::session_status));

    let dashboard_routes = Router::new()
        .route("/api/results", get(results::list_results))
        .route("/api/results/refresh", post(results::refresh_results))
        .route("/api/results/export", get(results::export_results))
        .route("/api/results/departments", get(results::list_departments))
        .route("/api/results/summary", get(results::results_summary))
        .route("/api/results/{attempt_id}", delete(results::delete_attempt))
        .route("/api/examinees", get(examinees::list_examinees))
        .route("/api/examiners", get(examiners::list_examiners))
        .route("/api/examiners/refresh", post(examiners::refresh_examiners))
        .route("/api/notifications", get(notifications::drain_notifications))
        .layer(middleware::from_fn_with_state(state.clone(), session_middleware));

    Router::new()
        .nest("/api/auth", auth_routes)
        .merge(dashboard_routes)
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
