// src/handlers/auth.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::Utc;
use validator::Validate;

use crate::{
    error::AppError,
    models::auth::{LoginRequest, SessionStatus},
    session::Session,
    state::AppState,
};

/// Logs the administrator in against the upstream API.
///
/// On success the returned token becomes the active session and every
/// cached list is dropped. The token itself is not echoed back.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let login = match state.api.login(&payload).await {
        Ok(login) => login,
        Err(e) => {
            tracing::error!("Login failed for {}: {}", payload.username, e);
            state.notifications.error("Login failed").await;
            return Err(e);
        }
    };

    let session = Session {
        token: login.token,
        system_user_id: login.system_user_id,
    };
    let expires_at = session
        .expires_at()
        .filter(|expires_at| *expires_at > Utc::now())
        .ok_or_else(|| AppError::Upstream("Upstream issued an unusable token".to_string()))?;

    state.reset_datasets().await;
    let system_user_id = session.system_user_id.clone();
    state.session.start(session).await?;
    tracing::info!("Admin {} logged in", payload.username);

    Ok(Json(SessionStatus {
        authenticated: true,
        system_user_id,
        expires_at: Some(expires_at),
    }))
}

/// Ends the session: token and user id are dropped together.
pub async fn logout(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    state.session.clear().await?;
    state.reset_datasets().await;
    tracing::info!("Admin logged out");

    Ok(StatusCode::NO_CONTENT)
}

/// Reports whether a live session exists.
pub async fn session_status(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let status = match state.session.bearer().await {
        Ok(_) => {
            let session = state.session.current().await;
            SessionStatus {
                authenticated: session.is_some(),
                system_user_id: session.as_ref().and_then(|s| s.system_user_id.clone()),
                expires_at: session.as_ref().and_then(Session::expires_at),
            }
        }
        Err(AppError::AuthError(_)) => SessionStatus {
            authenticated: false,
            system_user_id: None,
            expires_at: None,
        },
        Err(e) => return Err(e),
    };

    Ok(Json(status))
}
