// src/store.rs

use std::collections::BTreeSet;

use serde_json::Value;
use tokio::sync::RwLock;

use crate::{
    api::AssessmentApi,
    error::AppError,
    models::{filter::FilterState, record::AttemptRecord},
    notify::Notifications,
    pipeline::apply_filter,
};

/// Which upstream list a dataset mirrors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Results,
    Examiners,
}

impl Source {
    fn label(self) -> &'static str {
        match self {
            Source::Results => "results",
            Source::Examiners => "examiners",
        }
    }

    async fn fetch(self, api: &dyn AssessmentApi, token: &str) -> Result<Vec<Value>, AppError> {
        match self {
            Source::Results => api.fetch_results(token).await,
            Source::Examiners => api.fetch_examiners(token).await,
        }
    }
}

/// Local copy of one record list plus the filtered view over it.
///
/// `filtered` is re-derived every time the records or the filter change.
#[derive(Debug, Default)]
pub struct ResultsStore {
    raw: Vec<AttemptRecord>,
    filter: FilterState,
    filtered: Vec<AttemptRecord>,
    is_loading: bool,
    loaded: bool,
}

impl ResultsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw(&self) -> &[AttemptRecord] {
        &self.raw
    }

    pub fn filtered(&self) -> &[AttemptRecord] {
        &self.filtered
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn replace(&mut self, records: Vec<AttemptRecord>) {
        self.raw = records;
        self.loaded = true;
        self.is_loading = false;
        self.refilter();
    }

    pub fn set_filter(&mut self, filter: FilterState) {
        if self.filter != filter {
            self.filter = filter;
            self.refilter();
        }
    }

    pub fn set_search(&mut self, query: Option<String>) {
        let filter = FilterState {
            search_query: query,
            ..self.filter.clone()
        };
        self.set_filter(filter);
    }

    /// Drops every record whose attempt key equals `attempt_id`, from both
    /// the raw and the filtered list. Returns how many raw records went.
    pub fn remove_attempt(&mut self, attempt_id: &str) -> usize {
        let before = self.raw.len();
        self.raw.retain(|r| r.attempt_key() != attempt_id);
        self.filtered.retain(|r| r.attempt_key() != attempt_id);
        before - self.raw.len()
    }

    /// Distinct departments, sorted.
    pub fn departments(&self) -> Vec<String> {
        self.raw
            .iter()
            .filter_map(|r| r.department.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn refilter(&mut self) {
        self.filtered = apply_filter(&self.raw, &self.filter);
    }
}

/// A `ResultsStore` shared across requests and kept in sync with one
/// upstream list.
#[derive(Debug)]
pub struct Dataset {
    source: Source,
    store: RwLock<ResultsStore>,
}

impl Dataset {
    pub fn new(source: Source) -> Self {
        Self {
            source,
            store: RwLock::new(ResultsStore::new()),
        }
    }

    /// Fetches the full list and replaces the local copy.
    ///
    /// On failure the previous records stay in place and an error
    /// notification is queued.
    pub async fn load(
        &self,
        api: &dyn AssessmentApi,
        token: &str,
        notifications: &Notifications,
    ) -> Result<usize, AppError> {
        self.store.write().await.is_loading = true;

        match self.source.fetch(api, token).await {
            Ok(values) => {
                let records = AttemptRecord::from_values(&values);
                let count = records.len();
                self.store.write().await.replace(records);
                tracing::info!("Loaded {} {} records", count, self.source.label());
                Ok(count)
            }
            Err(e) => {
                self.store.write().await.is_loading = false;
                tracing::error!("Failed to fetch {}: {}", self.source.label(), e);
                notifications
                    .error(format!("Failed to load {}", self.source.label()))
                    .await;
                Err(e)
            }
        }
    }

    /// Loads once; later calls reuse the local copy.
    pub async fn ensure_loaded(
        &self,
        api: &dyn AssessmentApi,
        token: &str,
        notifications: &Notifications,
    ) -> Result<(), AppError> {
        if self.store.read().await.is_loaded() {
            return Ok(());
        }
        self.load(api, token, notifications).await.map(|_| ())
    }

    /// Deletes upstream first, locally only once the upstream confirms.
    pub async fn delete_attempt(
        &self,
        api: &dyn AssessmentApi,
        token: &str,
        attempt_id: &str,
        notifications: &Notifications,
    ) -> Result<usize, AppError> {
        if let Err(e) = api.delete_attempt(token, attempt_id).await {
            tracing::error!("Failed to delete attempt {}: {}", attempt_id, e);
            notifications.error("Failed to delete attempt").await;
            return Err(e);
        }

        let removed = self.store.write().await.remove_attempt(attempt_id);
        tracing::info!("Deleted attempt {} ({} local records)", attempt_id, removed);
        notifications.info("Attempt deleted").await;
        Ok(removed)
    }

    /// Applies `filter`, then runs `view` against the store.
    pub async fn with_filter<R>(&self, filter: FilterState, view: impl FnOnce(&ResultsStore) -> R) -> R {
        let mut store = self.store.write().await;
        store.set_filter(filter);
        view(&*store)
    }

    pub async fn read<R>(&self, view: impl FnOnce(&ResultsStore) -> R) -> R {
        view(&*self.store.read().await)
    }

    pub async fn reset(&self) {
        self.store.write().await.reset();
    }
}
