//! Attach recipe links to generated meal names.
//!
//! Every meal name is looked up against a [`SearchSource`]. The first detail
//! page not already handed to an earlier meal in the batch wins; anything else
//! (no match, failed or slow search) degrades to a search-engine link.

use std::collections::HashSet;
use std::time::Duration;

use futures::stream::{self, StreamExt};

use crate::search::{SearchCandidate, SearchConfig, SearchError, SearchSource};
use crate::types::EnrichedMeal;

/// Search engine used when no detail page can be claimed.
pub const FALLBACK_SEARCH_URL: &str = "https://www.google.com/search";

/// Deterministic fallback link: a web search for `"<meal name> recipe"`.
pub fn fallback_search_url(meal_name: &str) -> String {
    let query = format!("{} recipe", meal_name.trim());
    let encoded: String = url::form_urlencoded::byte_serialize(query.as_bytes()).collect();
    format!("{}?q={}", FALLBACK_SEARCH_URL, encoded)
}

/// URLs already assigned within one enrichment batch.
#[derive(Debug, Default)]
pub struct ClaimedUrls {
    urls: HashSet<String>,
}

impl ClaimedUrls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `url`. Returns false if an earlier meal already holds it.
    pub fn claim(&mut self, url: &str) -> bool {
        self.urls.insert(url.to_string())
    }

    pub fn is_claimed(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

pub struct Enricher<S> {
    source: S,
    timeout: Duration,
    concurrency: usize,
}

impl<S: SearchSource> Enricher<S> {
    pub fn new(source: S, timeout: Duration, concurrency: usize) -> Self {
        Self {
            source,
            timeout,
            concurrency: concurrency.max(1),
        }
    }

    pub fn from_config(source: S, config: &SearchConfig) -> Self {
        Self::new(source, config.timeout, config.concurrency)
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// One [`EnrichedMeal`] per input name, in input order. Never fails.
    pub async fn enrich<M: AsRef<str>>(&self, meals: &[M]) -> Vec<EnrichedMeal> {
        let names: Vec<String> = meals
            .iter()
            .map(|meal| meal.as_ref().trim().to_string())
            .collect();

        let lookups: Vec<_> = stream::iter(names.clone())
            .map(|meal| async move { self.lookup(&meal).await })
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut claimed = ClaimedUrls::new();
        names
            .iter()
            .zip(lookups)
            .map(|(meal, lookup)| assign(meal, lookup, &mut claimed))
            .collect()
    }

    async fn lookup(&self, meal_name: &str) -> Result<Vec<SearchCandidate>, SearchError> {
        match tokio::time::timeout(self.timeout, self.source.search(meal_name)).await {
            Ok(result) => result,
            Err(_) => Err(SearchError::Timeout(self.timeout)),
        }
    }
}

fn assign(
    meal_name: &str,
    lookup: Result<Vec<SearchCandidate>, SearchError>,
    claimed: &mut ClaimedUrls,
) -> EnrichedMeal {
    let candidates = match lookup {
        Ok(candidates) => candidates,
        Err(e) => {
            tracing::debug!(
                meal = meal_name,
                error = %e,
                "enrichment: search failed, using fallback link"
            );
            return fallback(meal_name);
        }
    };

    for candidate in candidates {
        if claimed.claim(&candidate.url) {
            let display = if candidate.title.is_empty() {
                meal_name.to_string()
            } else {
                candidate.title
            };
            return EnrichedMeal {
                meal_name: display,
                recipe_link: candidate.url,
            };
        }
    }

    tracing::debug!(
        meal = meal_name,
        "enrichment: no unclaimed match, using fallback link"
    );
    fallback(meal_name)
}

fn fallback(meal_name: &str) -> EnrichedMeal {
    EnrichedMeal {
        meal_name: meal_name.to_string(),
        recipe_link: fallback_search_url(meal_name),
    }
}
