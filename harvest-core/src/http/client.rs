//! HTTP client trait and implementations.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use crate::error::FetchError;

use super::rate_limiter::RateLimiter;

/// Browser-like user agent; recipe sites reject obvious bots.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Trait for HTTP clients, enabling mockability in tests.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Fetch HTML content from a URL.
    async fn fetch_html(&self, url: &str) -> Result<String, FetchError>;
}

/// Configuration for RateLimitedClient.
#[derive(Clone)]
pub struct RateLimitedClientBuilder {
    rate_limit_ms: u64,
    timeout: Duration,
    user_agent: String,
}

impl Default for RateLimitedClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RateLimitedClientBuilder {
    pub fn new() -> Self {
        Self {
            rate_limit_ms: 200,
            timeout: Duration::from_secs(10),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Set the rate limit delay in milliseconds. 0 disables rate limiting.
    pub fn rate_limit_ms(mut self, ms: u64) -> Self {
        self.rate_limit_ms = ms;
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    pub fn user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = user_agent;
        self
    }

    pub fn build(self) -> Result<RateLimitedClient, reqwest::Error> {
        let inner = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .build()?;

        Ok(RateLimitedClient {
            inner,
            rate_limiter: RateLimiter::new(Duration::from_millis(self.rate_limit_ms)),
        })
    }
}

/// Production HTTP client with per-host rate limiting and a request timeout.
pub struct RateLimitedClient {
    /// Shared reqwest client for connection pooling.
    inner: reqwest::Client,
    rate_limiter: RateLimiter,
}

impl RateLimitedClient {
    /// Create a client with default configuration.
    pub fn new() -> Result<Self, reqwest::Error> {
        RateLimitedClientBuilder::new().build()
    }

    pub fn builder() -> RateLimitedClientBuilder {
        RateLimitedClientBuilder::new()
    }
}

#[async_trait]
impl HttpClient for RateLimitedClient {
    async fn fetch_html(&self, url: &str) -> Result<String, FetchError> {
        let parsed = reqwest::Url::parse(url).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;

        if let Some(host) = parsed.host_str() {
            self.rate_limiter.wait(host).await;
        }

        tracing::debug!(url, "network: fetching");
        let response = self.inner.get(parsed).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(url, status = %status, "network: request failed");
            return Err(FetchError::Status(status.as_u16()));
        }

        tracing::debug!(url, status = %status, "network: fetched successfully");
        Ok(response.text().await?)
    }
}

/// Mock response for testing.
#[derive(Clone)]
pub enum MockResponse {
    Html(String),
    Status(u16),
    Error(String),
}

/// Mock HTTP client for testing.
///
/// Unknown URLs fail like a network error. Every requested URL is recorded.
#[derive(Default)]
pub struct MockClient {
    responses: HashMap<String, MockResponse>,
    requests: Mutex<Vec<String>>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a response for a URL.
    pub fn with_response(mut self, url: &str, response: MockResponse) -> Self {
        self.responses.insert(url.to_string(), response);
        self
    }

    /// Add an HTML response for a URL.
    pub fn with_html(self, url: &str, html: &str) -> Self {
        self.with_response(url, MockResponse::Html(html.to_string()))
    }

    /// Add a non-success status for a URL.
    pub fn with_status(self, url: &str, status: u16) -> Self {
        self.with_response(url, MockResponse::Status(status))
    }

    /// Add an error response for a URL.
    pub fn with_error(self, url: &str, error: &str) -> Self {
        self.with_response(url, MockResponse::Error(error.to_string()))
    }

    /// URLs fetched so far, in call order.
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl HttpClient for MockClient {
    async fn fetch_html(&self, url: &str) -> Result<String, FetchError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(url.to_string());

        match self.responses.get(url) {
            Some(MockResponse::Html(html)) => Ok(html.clone()),
            Some(MockResponse::Status(status)) => Err(FetchError::Status(*status)),
            Some(MockResponse::Error(e)) => Err(FetchError::Network(e.clone())),
            None => Err(FetchError::InvalidUrl(format!(
                "No mock response for URL: {}",
                url
            ))),
        }
    }
}
