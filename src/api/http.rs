// src/api/http.rs

use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode};
use serde_json::Value;
use url::Url;

use super::{AssessmentApi, extract_list};
use crate::{
    config::ApiEndpoints,
    error::AppError,
    models::auth::{LoginRequest, LoginResponse},
};

/// `AssessmentApi` over HTTP/JSON with bearer authentication.
#[derive(Debug, Clone)]
pub struct HttpAssessmentApi {
    client: reqwest::Client,
    base_url: Url,
    endpoints: ApiEndpoints,
}

impl HttpAssessmentApi {
    pub fn new(base_url: Url, endpoints: ApiEndpoints) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url,
            endpoints,
        })
    }

    /// Appends `path` to the base URL, keeping any path prefix the base has.
    fn endpoint(&self, path: &str) -> Result<Url, AppError> {
        let joined = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined).map_err(|e| AppError::InternalServerError(format!("Bad endpoint '{}': {}", joined, e)))
    }

    /// Fills the `{id}` placeholder of the delete path.
    /// The id is percent-encoded as a single path segment.
    fn delete_url(&self, attempt_id: &str) -> Result<Url, AppError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| AppError::InternalServerError(format!("Base URL '{}' cannot carry a path", self.base_url)))?;
            segments.pop_if_empty();
            for segment in self.endpoints.delete_attempt.split('/').filter(|s| !s.is_empty()) {
                segments.push(&segment.replace("{id}", attempt_id));
            }
        }
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response, AppError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        tracing::warn!("Upstream responded with {}", status);
        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                AppError::AuthError("Upstream rejected the credentials".to_string())
            }
            StatusCode::NOT_FOUND => AppError::NotFound("Upstream resource not found".to_string()),
            _ => AppError::Upstream(format!("Upstream responded with {}", status)),
        })
    }

    async fn fetch_list(&self, path: &str, token: &str) -> Result<Vec<Value>, AppError> {
        let url = self.endpoint(path)?;
        tracing::debug!("GET {}", url);
        let payload: Value = self
            .send(self.client.get(url).bearer_auth(token))
            .await?
            .json()
            .await?;
        extract_list(payload)
    }
}

#[async_trait]
impl AssessmentApi for HttpAssessmentApi {
    async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse, AppError> {
        let url = self.endpoint(&self.endpoints.login)?;
        let payload: Value = self
            .send(self.client.post(url).json(credentials))
            .await?
            .json()
            .await?;
        LoginResponse::from_value(&payload)
    }

    async fn fetch_results(&self, token: &str) -> Result<Vec<Value>, AppError> {
        self.fetch_list(&self.endpoints.results, token).await
    }

    async fn fetch_examiners(&self, token: &str) -> Result<Vec<Value>, AppError> {
        self.fetch_list(&self.endpoints.examiners, token).await
    }

    async fn delete_attempt(&self, token: &str, attempt_id: &str) -> Result<(), AppError> {
        let url = self.delete_url(attempt_id)?;
        tracing::debug!("DELETE {}", url);
        self.send(self.client.delete(url).bearer_auth(token)).await?;
        Ok(())
    }
}
