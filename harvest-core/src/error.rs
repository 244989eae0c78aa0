use thiserror::Error;

/// Failure of a single generation call.
///
/// The adapter never classifies failures; auth rejections, rate limits,
/// timeouts and broken bodies all land here with their cause as text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ProviderError {
    pub message: String,
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    Provider(#[from] ProviderError),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("All API keys failed. Last error: {last_error}")]
    AllProvidersExhausted { attempts: usize, last_error: String },
}

impl GenerationError {
    /// Whether the fallback pipeline should move on to the next credential.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GenerationError::Provider(_) | GenerationError::MalformedResponse(_)
        )
    }
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("HTTP {0}")]
    Status(u16),

    /// Transport failure reported without a `reqwest::Error`, e.g. by test doubles.
    #[error("Network error: {0}")]
    Network(String),
}
