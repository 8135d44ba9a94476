// src/config.rs

use std::{net::SocketAddr, path::PathBuf};

use dotenvy::dotenv;
use url::Url;

use crate::error::AppError;

/// Upstream endpoint paths, relative to `Config::api_base_url`.
/// `delete_attempt` must contain an `{id}` placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiEndpoints {
    pub login: String,
    pub results: String,
    pub examiners: String,
    pub delete_attempt: String,
}

impl Default for ApiEndpoints {
    fn default() -> Self {
        Self {
            login: "/api/auth/login".to_string(),
            results: "/api/results".to_string(),
            examiners: "/api/examiners".to_string(),
            delete_attempt: "/api/results/{id}".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: Url,
    pub bind_addr: SocketAddr,
    pub rust_log: String,
    /// Where the session survives restarts. `None` keeps it in memory only.
    pub session_file: Option<PathBuf>,
    pub page_size: usize,
    pub endpoints: ApiEndpoints,
    pub cors_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_base_url = get("API_BASE_URL")
            .ok_or_else(|| AppError::Config("API_BASE_URL must be set".to_string()))?;
        let api_base_url = Url::parse(&api_base_url)
            .map_err(|e| AppError::Config(format!("API_BASE_URL is not a valid URL: {}", e)))?;

        let bind_addr = get("BIND_ADDR")
            .unwrap_or_else(|| "0.0.0.0:3000".to_string())
            .parse::<SocketAddr>()
            .map_err(|e| AppError::Config(format!("BIND_ADDR is invalid: {}", e)))?;

        let rust_log = get("RUST_LOG").unwrap_or_else(|| "info".to_string());

        let session_file = get("SESSION_FILE").map(PathBuf::from);

        let page_size = match get("PAGE_SIZE") {
            Some(raw) => match raw.parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(AppError::Config(format!(
                        "PAGE_SIZE must be a positive integer, got '{}'",
                        raw
                    )));
                }
            },
            None => 10,
        };

        let defaults = ApiEndpoints::default();
        let endpoints = ApiEndpoints {
            login: get("LOGIN_PATH").unwrap_or(defaults.login),
            results: get("RESULTS_PATH").unwrap_or(defaults.results),
            examiners: get("EXAMINERS_PATH").unwrap_or(defaults.examiners),
            delete_attempt: get("DELETE_ATTEMPT_PATH").unwrap_or(defaults.delete_attempt),
        };
        if !endpoints.delete_attempt.contains("{id}") {
            return Err(AppError::Config(
                "DELETE_ATTEMPT_PATH must contain an {id} placeholder".to_string(),
            ));
        }

        let cors_origins = get("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Ok(Self {
            api_base_url,
            bind_addr,
            rust_log,
            session_file,
            page_size,
            endpoints,
            cors_origins,
        })
    }

    /// Default settings pointing at the given upstream.
    pub fn with_base_url(api_base_url: Url) -> Self {
        Self {
            api_base_url,
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            rust_log: "info".to_string(),
            session_file: None,
            page_size: 10,
            endpoints: ApiEndpoints::default(),
            cors_origins: vec!["http://localhost:5173".to_string()],
        }
    }
}
