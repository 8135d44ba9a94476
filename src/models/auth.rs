// src/models/auth.rs

use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::error::AppError;

/// DTO for admin login, forwarded to the upstream API.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(
        min = 3,
        max = 50,
        message = "Username length must be between 3 and 50 characters."
    ))]
    pub username: String,
    #[validate(length(
        min = 4,
        max = 128,
        message = "Password length must be between 4 and 128 characters."
    ))]
    pub password: String,
}

/// What the upstream login returns that the session needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginResponse {
    pub token: String,
    pub system_user_id: Option<String>,
}

impl LoginResponse {
    /// Accepts `token` or `access_token`, and the user id as
    /// `system_user_id`, `user_id` or `user.id`.
    pub fn from_value(value: &Value) -> Result<Self, AppError> {
        let token = ["token", "access_token"]
            .iter()
            .find_map(|key| value.get(*key).and_then(Value::as_str))
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::Upstream("Login response carried no token".to_string()))?
            .to_string();

        let system_user_id = value
            .get("system_user_id")
            .or_else(|| value.get("user_id"))
            .or_else(|| value.get("user").and_then(|u| u.get("id")))
            .and_then(|id| match id {
                Value::String(s) if !s.is_empty() => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            });

        Ok(Self {
            token,
            system_user_id,
        })
    }
}

/// Session status returned to the UI. The token itself never leaves the service.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionStatus {
    pub authenticated: bool,
    pub system_user_id: Option<String>,
    pub expires_at: Option<chrono::DateTime<chrono::Utc>>,
}
