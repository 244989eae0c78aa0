//! Credential fallback pipeline.
//!
//! One request makes at most one pass over a freshly shuffled credential
//! list. The prompt is built once, then each credential is tried in turn:
//!
//! ```text
//! Trying(i) --ok + coerced--------> Succeeded        (remaining keys untouched)
//! Trying(i) --provider error------> Trying(i + 1)
//! Trying(i) --malformed response--> Trying(i + 1)
//! Trying(n) ----------------------> Exhausted        (AllProvidersExhausted)
//! ```
//!
//! There is no backoff and no second try with the same credential.

use std::time::Duration;

use crate::ai::prompts::{build_prompt, SchemaDescriptor};
use crate::ai::GenerationClient;
use crate::credentials::{Credential, CredentialPool};
use crate::error::GenerationError;

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutcome<T> {
    pub value: T,
    /// Credentials tried, including the one that succeeded.
    pub attempts: usize,
}

enum TrialState<T> {
    Trying {
        index: usize,
        last_error: Option<GenerationError>,
    },
    Succeeded {
        value: T,
        attempts: usize,
    },
    Exhausted {
        attempts: usize,
        last_error: Option<GenerationError>,
    },
}

pub struct FallbackPipeline<C> {
    pool: CredentialPool,
    client: C,
    timeout: Duration,
}

impl<C: GenerationClient> FallbackPipeline<C> {
    pub fn new(pool: CredentialPool, client: C, timeout: Duration) -> Self {
        Self {
            pool,
            client,
            timeout,
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Build the prompt for `terms`, then try credentials until one yields
    /// output that `coerce` accepts.
    ///
    /// `coerce` failures that are not retryable end the run immediately.
    pub async fn run<S, T, F>(
        &self,
        terms: &[S],
        schema: &SchemaDescriptor,
        coerce: F,
    ) -> Result<PipelineOutcome<T>, GenerationError>
    where
        S: AsRef<str>,
        F: Fn(&str) -> Result<T, GenerationError>,
    {
        let prompt = build_prompt(terms, schema)?;
        let order = self.pool.next_order();

        tracing::debug!(
            schema = schema.name,
            terms = terms.len(),
            credentials = order.len(),
            model = self.client.model_name(),
            "Starting generation"
        );

        let mut state = TrialState::Trying {
            index: 0,
            last_error: None,
        };

        loop {
            state = match state {
                TrialState::Trying { index, last_error } => match order.get(index) {
                    None => TrialState::Exhausted {
                        attempts: index,
                        last_error,
                    },
                    Some(credential) => match self.attempt(&prompt, credential, &coerce).await {
                        Ok(value) => TrialState::Succeeded {
                            value,
                            attempts: index + 1,
                        },
                        Err(err) if err.is_retryable() => {
                            tracing::warn!(
                                schema = schema.name,
                                attempt = index + 1,
                                of = order.len(),
                                error = %err,
                                "Generation attempt failed, trying next key"
                            );
                            TrialState::Trying {
                                index: index + 1,
                                last_error: Some(err),
                            }
                        }
                        Err(err) => return Err(err),
                    },
                },
                TrialState::Succeeded { value, attempts } => {
                    tracing::debug!(schema = schema.name, attempts, "Generation succeeded");
                    return Ok(PipelineOutcome { value, attempts });
                }
                TrialState::Exhausted {
                    attempts,
                    last_error,
                } => {
                    let last_error = last_error
                        .map(|e| e.to_string())
                        .unwrap_or_else(|| "no attempts were made".to_string());
                    tracing::error!(
                        schema = schema.name,
                        attempts,
                        last_error = %last_error,
                        "All API keys failed"
                    );
                    return Err(GenerationError::AllProvidersExhausted {
                        attempts,
                        last_error,
                    });
                }
            };
        }
    }

    async fn attempt<T, F>(
        &self,
        prompt: &str,
        credential: &Credential,
        coerce: &F,
    ) -> Result<T, GenerationError>
    where
        F: Fn(&str) -> Result<T, GenerationError>,
    {
        let raw = self
            .client
            .complete(prompt, credential, self.timeout)
            .await?;
        coerce(&raw)
    }
}
