// src/session.rs

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::{
    error::AppError,
    utils::jwt::{is_token_expired, token_expiry},
};

/// Credentials of the logged-in administrator.
/// Serialized with the `token` / `system_user_id` keys the dashboard has always used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    #[serde(default)]
    pub system_user_id: Option<String>,
}

impl Session {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        token_expiry(&self.token).ok()
    }
}

/// Owner of the current session.
///
/// Created once at startup (`init`) and handed to everything that needs the
/// token. `clear` tears the session down, dropping the token and the user id
/// together.
#[derive(Debug)]
pub struct SessionContext {
    current: RwLock<Option<Session>>,
    file: Option<PathBuf>,
}

impl SessionContext {
    pub fn in_memory() -> Self {
        Self {
            current: RwLock::new(None),
            file: None,
        }
    }

    /// Restores a persisted session if `file` holds one.
    /// An unreadable or corrupt file starts logged out.
    pub async fn init(file: Option<PathBuf>) -> Self {
        let restored = match &file {
            Some(path) => match tokio::fs::read(path).await {
                Ok(bytes) => match serde_json::from_slice::<Session>(&bytes) {
                    Ok(session) => {
                        tracing::info!("Restored session from {}", path.display());
                        Some(session)
                    }
                    Err(e) => {
                        tracing::warn!("Ignoring corrupt session file {}: {}", path.display(), e);
                        None
                    }
                },
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
                Err(e) => {
                    tracing::warn!("Cannot read session file {}: {}", path.display(), e);
                    None
                }
            },
            None => None,
        };

        Self {
            current: RwLock::new(restored),
            file,
        }
    }

    pub async fn start(&self, session: Session) -> Result<(), AppError> {
        if let Some(path) = &self.file {
            let bytes = serde_json::to_vec_pretty(&session)
                .map_err(|e| AppError::InternalServerError(e.to_string()))?;
            tokio::fs::write(path, bytes).await?;
        }
        *self.current.write().await = Some(session);
        Ok(())
    }

    pub async fn clear(&self) -> Result<(), AppError> {
        *self.current.write().await = None;
        if let Some(path) = &self.file {
            match tokio::fs::remove_file(path).await {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    pub async fn current(&self) -> Option<Session> {
        self.current.read().await.clone()
    }

    /// The token to send upstream.
    ///
    /// Missing sessions are `AuthError`. Expired or undecodable tokens clear
    /// the session first.
    pub async fn bearer(&self) -> Result<String, AppError> {
        let session = self
            .current()
            .await
            .ok_or_else(|| AppError::AuthError("Not logged in".to_string()))?;

        if is_token_expired(&session.token, Utc::now()) {
            tracing::info!("Session token expired, logging out");
            self.clear().await?;
            return Err(AppError::AuthError("Session expired".to_string()));
        }
        Ok(session.token)
    }
}
