//! AI configuration from environment variables.

use std::env;
use std::time::Duration;

use thiserror::Error;

use crate::credentials::CredentialPool;

/// Default OpenRouter base URL.
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Default model to use.
pub const DEFAULT_MODEL: &str = "google/gemini-2.0-flash-001";

/// Default upper bound for one generation call, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {name}: {reason}")]
    InvalidValue { name: String, reason: String },
}

/// Generation client configuration.
#[derive(Debug, Clone)]
pub struct AiConfig {
    /// Keys tried in random order on every request.
    pub credentials: CredentialPool,
    /// Model name (e.g., "google/gemini-2.0-flash-001").
    pub model: String,
    /// Base URL of the OpenAI-compatible API.
    pub base_url: String,
    /// Upper bound for a single generation call.
    pub timeout: Duration,
}

impl AiConfig {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `OPENROUTER_API_KEYS`: comma-separated API keys
    ///
    /// Optional:
    /// - `HARVEST_AI_MODEL`: Model name (default: "google/gemini-2.0-flash-001")
    /// - `HARVEST_AI_BASE_URL`: API base URL (default: "https://openrouter.ai/api/v1")
    /// - `HARVEST_AI_TIMEOUT_SECS`: Per-call timeout in seconds (default: 20)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let keys = lookup("OPENROUTER_API_KEYS")
            .ok_or_else(|| ConfigError::MissingEnvVar("OPENROUTER_API_KEYS".to_string()))?;
        let credentials = CredentialPool::from_comma_separated(&keys).map_err(|e| {
            ConfigError::InvalidValue {
                name: "OPENROUTER_API_KEYS".to_string(),
                reason: e.to_string(),
            }
        })?;

        let model = lookup("HARVEST_AI_MODEL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let base_url = lookup("HARVEST_AI_BASE_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout_secs = parse_or(&lookup, "HARVEST_AI_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                name: "HARVEST_AI_TIMEOUT_SECS".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(Self {
            credentials,
            model,
            base_url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// Parse an optional numeric variable, keeping `default` when unset.
pub(crate) fn parse_or<F, T>(lookup: &F, name: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) if raw.trim().is_empty() => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidValue {
                name: name.to_string(),
                reason: e.to_string(),
            }),
    }
}
