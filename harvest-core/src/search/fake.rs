use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use super::{SearchCandidate, SearchError, SearchSource};
use crate::error::FetchError;

#[derive(Debug, Clone)]
enum Scripted {
    Found(Vec<SearchCandidate>),
    Fail(String),
    Delay(Duration, Vec<SearchCandidate>),
}

/// In-memory search source for tests and offline runs.
///
/// Queries without a scripted answer return no candidates.
#[derive(Debug, Default)]
pub struct FakeSearch {
    answers: HashMap<String, Scripted>,
    queries: Mutex<Vec<String>>,
}

impl FakeSearch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `query` with `(title, url)` candidates in order.
    pub fn with_results(mut self, query: &str, results: &[(&str, &str)]) -> Self {
        self.answers
            .insert(query.to_string(), Scripted::Found(candidates(results)));
        self
    }

    /// Fail every search for `query`.
    pub fn with_failure(mut self, query: &str, message: &str) -> Self {
        self.answers
            .insert(query.to_string(), Scripted::Fail(message.to_string()));
        self
    }

    /// Answer `query` only after `delay` has passed.
    pub fn with_delay(mut self, query: &str, delay: Duration, results: &[(&str, &str)]) -> Self {
        self.answers
            .insert(query.to_string(), Scripted::Delay(delay, candidates(results)));
        self
    }

    /// Queries received so far, in call order.
    pub fn queries(&self) -> Vec<String> {
        self.queries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

fn candidates(results: &[(&str, &str)]) -> Vec<SearchCandidate> {
    results
        .iter()
        .map(|(title, url)| SearchCandidate {
            title: title.to_string(),
            url: url.to_string(),
        })
        .collect()
}

#[async_trait]
impl SearchSource for FakeSearch {
    async fn search(&self, query: &str) -> Result<Vec<SearchCandidate>, SearchError> {
        self.queries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(query.to_string());

        match self.answers.get(query).cloned() {
            Some(Scripted::Found(found)) => Ok(found),
            Some(Scripted::Fail(message)) => {
                Err(SearchError::Fetch(FetchError::Network(message)))
            }
            Some(Scripted::Delay(delay, found)) => {
                tokio::time::sleep(delay).await;
                Ok(found)
            }
            None => Ok(Vec::new()),
        }
    }
}
