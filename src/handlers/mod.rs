// src/handlers/mod.rs

pub mod auth;
pub mod examinees;
pub mod examiners;
pub mod notifications;
pub mod results;

use crate::{config::Config, models::filter::ListParams};

/// Upper bound on `page_size` accepted from clients.
pub const MAX_PAGE_SIZE: usize = 100;

/// Page number and size for a list request, falling back to the configured size.
pub(crate) fn page_window(params: &ListParams, config: &Config) -> (usize, usize) {
    (
        params.page.unwrap_or(1),
        params.page_size.unwrap_or(config.page_size).min(MAX_PAGE_SIZE),
    )
}
