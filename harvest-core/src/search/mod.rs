//! Search sources used to attach real recipe pages to generated meal names.

mod allrecipes;
mod config;
mod fake;

pub use allrecipes::{clean_title, parse_search_results, AllRecipesSearch};
pub use config::{
    SearchConfig, DEFAULT_SEARCH_BASE_URL, DEFAULT_SEARCH_CONCURRENCY,
    DEFAULT_SEARCH_RATE_LIMIT_MS, DEFAULT_SEARCH_TIMEOUT_SECS,
};
pub use fake::FakeSearch;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::error::FetchError;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Search request failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Search timed out after {0:?}")]
    Timeout(Duration),
}

/// One recipe detail page found by a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCandidate {
    /// Cleaned display text of the result link; may be empty.
    pub title: String,
    /// Absolute URL of the detail page.
    pub url: String,
}

/// Anything that can turn a query into candidate detail pages, best first.
#[async_trait]
pub trait SearchSource: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<SearchCandidate>, SearchError>;
}
