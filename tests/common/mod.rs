// tests/common/mod.rs

#![allow(dead_code)]

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, AtomicI64, Ordering},
};

use async_trait::async_trait;
use exam_dashboard::{
    api::AssessmentApi,
    config::Config,
    error::AppError,
    models::{
        auth::{LoginRequest, LoginResponse},
        record::AttemptRecord,
    },
    routes,
    session::SessionContext,
    state::AppState,
    utils::jwt::Claims,
};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::{Value, json};

pub const PASSWORD: &str = "password123";

/// In-process stand-in for the upstream assessment API.
pub struct FakeApi {
    pub results: Mutex<Vec<Value>>,
    pub examiners: Mutex<Vec<Value>>,
    pub fail_fetch: AtomicBool,
    pub fail_delete: AtomicBool,
    /// Lifetime of issued tokens, in seconds. Negative issues expired tokens.
    pub token_ttl: AtomicI64,
    pub seen_tokens: Mutex<Vec<String>>,
    pub deleted: Mutex<Vec<String>>,
}

impl FakeApi {
    pub fn new(results: Vec<Value>) -> Arc<Self> {
        Arc::new(Self {
            results: Mutex::new(results),
            examiners: Mutex::new(Vec::new()),
            fail_fetch: AtomicBool::new(false),
            fail_delete: AtomicBool::new(false),
            token_ttl: AtomicI64::new(600),
            seen_tokens: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
        })
    }

    pub fn with_examiners(self: Arc<Self>, examiners: Vec<Value>) -> Arc<Self> {
        *self.examiners.lock().unwrap() = examiners;
        self
    }

    fn mint_token(&self) -> String {
        let exp = chrono::Utc::now().timestamp() + self.token_ttl.load(Ordering::SeqCst);
        encode(
            &Header::default(),
            &Claims { exp },
            &EncodingKey::from_secret(b"upstream-only-secret"),
        )
        .unwrap()
    }
}

#[async_trait]
impl AssessmentApi for FakeApi {
    async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse, AppError> {
        if credentials.password != PASSWORD {
            return Err(AppError::AuthError("Upstream rejected the credentials".to_string()));
        }
        Ok(LoginResponse {
            token: self.mint_token(),
            system_user_id: Some("7".to_string()),
        })
    }

    async fn fetch_results(&self, token: &str) -> Result<Vec<Value>, AppError> {
        self.seen_tokens.lock().unwrap().push(token.to_string());
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(AppError::Upstream("Upstream responded with 503".to_string()));
        }
        Ok(self.results.lock().unwrap().clone())
    }

    async fn fetch_examiners(&self, token: &str) -> Result<Vec<Value>, AppError> {
        self.seen_tokens.lock().unwrap().push(token.to_string());
        Ok(self.examiners.lock().unwrap().clone())
    }

    async fn delete_attempt(&self, token: &str, attempt_id: &str) -> Result<(), AppError> {
        self.seen_tokens.lock().unwrap().push(token.to_string());
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(AppError::Upstream("Upstream responded with 500".to_string()));
        }
        self.results
            .lock()
            .unwrap()
            .retain(|v| AttemptRecord::from_value(v).attempt_key() != attempt_id);
        self.deleted.lock().unwrap().push(attempt_id.to_string());
        Ok(())
    }
}

/// The two-record fixture used throughout the dashboard scenarios.
pub fn sample_results() -> Vec<Value> {
    vec![
        json!({"id": 1, "name": "A", "email": "a@x.com", "department": "Eng", "date": "2024-01-01"}),
        json!({"id": 2, "name": "B", "email": "b@x.com", "department": "Sales", "date": "2024-01-02"}),
    ]
}

/// Spawns the app on a random port for testing.
/// Returns the base URL (e.g., "http://127.0.0.1:12345").
pub async fn spawn_app(api: Arc<FakeApi>) -> String {
    let config = Config::with_base_url("http://upstream.invalid".parse().unwrap());
    let state = AppState::new(config, api, SessionContext::in_memory());
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}

/// Logs in as the admin and asserts success.
pub async fn login(client: &reqwest::Client, address: &str) {
    let response = client
        .post(format!("{}/api/auth/login", address))
        .json(&json!({"username": "admin", "password": PASSWORD}))
        .send()
        .await
        .expect("Login failed");
    assert_eq!(response.status().as_u16(), 200);
}

pub async fn get_json(client: &reqwest::Client, url: String) -> Value {
    let response = client.get(url).send().await.expect("Request failed");
    assert_eq!(response.status().as_u16(), 200);
    response.json().await.expect("Failed to parse json")
}

pub fn attempt_ids(page: &Value) -> Vec<String> {
    page["items"]
        .as_array()
        .expect("items missing")
        .iter()
        .map(|item| item["attempt_id"].as_str().unwrap().to_string())
        .collect()
}
