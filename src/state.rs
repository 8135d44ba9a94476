// src/state.rs

use std::sync::Arc;

use axum::extract::FromRef;

use crate::{
    api::AssessmentApi,
    config::Config,
    notify::Notifications,
    session::SessionContext,
    store::{Dataset, Source},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub api: Arc<dyn AssessmentApi>,
    pub session: Arc<SessionContext>,
    pub results: Arc<Dataset>,
    pub examiners: Arc<Dataset>,
    pub notifications: Arc<Notifications>,
}

impl AppState {
    pub fn new(config: Config, api: Arc<dyn AssessmentApi>, session: SessionContext) -> Self {
        Self {
            config,
            api,
            session: Arc::new(session),
            results: Arc::new(Dataset::new(Source::Results)),
            examiners: Arc::new(Dataset::new(Source::Examiners)),
            notifications: Arc::new(Notifications::new()),
        }
    }

    /// Forgets every cached list, e.g. when the logged-in user changes.
    pub async fn reset_datasets(&self) {
        self.results.reset().await;
        self.examiners.reset().await;
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for Arc<Notifications> {
    fn from_ref(state: &AppState) -> Self {
        state.notifications.clone()
    }
}
