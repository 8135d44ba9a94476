// src/api/mod.rs

//! Client side of the upstream assessment API.

pub mod http;

use async_trait::async_trait;
use serde_json::Value;

use crate::{
    error::AppError,
    models::auth::{LoginRequest, LoginResponse},
};

pub use http::HttpAssessmentApi;

/// Remote operations the dashboard depends on.
///
/// Lists come back as raw JSON objects; normalization happens in the caller.
/// Every call is attempted once.
#[async_trait]
pub trait AssessmentApi: Send + Sync {
    async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse, AppError>;

    async fn fetch_results(&self, token: &str) -> Result<Vec<Value>, AppError>;

    async fn fetch_examiners(&self, token: &str) -> Result<Vec<Value>, AppError>;

    async fn delete_attempt(&self, token: &str, attempt_id: &str) -> Result<(), AppError>;
}

/// Accepts a bare array or one wrapped in `data`, `results` or `items`.
pub fn extract_list(payload: Value) -> Result<Vec<Value>, AppError> {
    match payload {
        Value::Array(items) => Ok(items),
        Value::Object(mut object) => ["data", "results", "items"]
            .iter()
            .find_map(|key| match object.remove(*key) {
                Some(Value::Array(items)) => Some(items),
                _ => None,
            })
            .ok_or_else(|| AppError::Upstream("Unexpected list payload".to_string())),
        _ => Err(AppError::Upstream("Unexpected list payload".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unwraps_known_envelopes() {
        assert_eq!(extract_list(json!([1, 2])).unwrap().len(), 2);
        assert_eq!(extract_list(json!({"data": [1]})).unwrap().len(), 1);
        assert_eq!(extract_list(json!({"total": 3, "results": [1, 2, 3]})).unwrap().len(), 3);
    }

    #[test]
    fn rejects_other_shapes() {
        assert!(matches!(extract_list(json!({"data": {}})), Err(AppError::Upstream(_))));
        assert!(matches!(extract_list(json!("nope")), Err(AppError::Upstream(_))));
    }
}
