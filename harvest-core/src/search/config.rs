//! Search configuration from environment variables.

use std::env;
use std::time::Duration;

use url::Url;

use crate::ai::{parse_or, ConfigError};

/// Default site searched for recipe detail pages.
pub const DEFAULT_SEARCH_BASE_URL: &str = "https://www.allrecipes.com";

pub const DEFAULT_SEARCH_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_SEARCH_CONCURRENCY: usize = 4;
pub const DEFAULT_SEARCH_RATE_LIMIT_MS: u64 = 200;

#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Site whose `/search?q=` page is scraped.
    pub base_url: Url,
    /// Upper bound for one search lookup.
    pub timeout: Duration,
    /// Lookups allowed in flight at once.
    pub concurrency: usize,
    /// Minimum spacing between requests to the same host.
    pub rate_limit_ms: u64,
}

impl SearchConfig {
    /// Load configuration from environment variables.
    ///
    /// All optional:
    /// - `HARVEST_SEARCH_BASE_URL` (default: "https://www.allrecipes.com")
    /// - `HARVEST_SEARCH_TIMEOUT_SECS` (default: 10)
    /// - `HARVEST_SEARCH_CONCURRENCY` (default: 4)
    /// - `HARVEST_SEARCH_RATE_LIMIT_MS` (default: 200)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_base = lookup("HARVEST_SEARCH_BASE_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SEARCH_BASE_URL.to_string());
        let base_url = Url::parse(raw_base.trim()).map_err(|e| ConfigError::InvalidValue {
            name: "HARVEST_SEARCH_BASE_URL".to_string(),
            reason: e.to_string(),
        })?;

        let timeout_secs = parse_or(
            &lookup,
            "HARVEST_SEARCH_TIMEOUT_SECS",
            DEFAULT_SEARCH_TIMEOUT_SECS,
        )?;
        let concurrency = parse_or(
            &lookup,
            "HARVEST_SEARCH_CONCURRENCY",
            DEFAULT_SEARCH_CONCURRENCY,
        )?;
        let rate_limit_ms = parse_or(
            &lookup,
            "HARVEST_SEARCH_RATE_LIMIT_MS",
            DEFAULT_SEARCH_RATE_LIMIT_MS,
        )?;

        if timeout_secs == 0 || concurrency == 0 {
            return Err(ConfigError::InvalidValue {
                name: if timeout_secs == 0 {
                    "HARVEST_SEARCH_TIMEOUT_SECS"
                } else {
                    "HARVEST_SEARCH_CONCURRENCY"
                }
                .to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
            concurrency,
            rate_limit_ms,
        })
    }
}
