//! Credential pool with a fresh random trial order per call.
//!
//! The pool keeps no rotation index or per-key statistics. Every call to
//! [`CredentialPool::next_order`] shuffles independently, so concurrent
//! requests never observe each other's trial order.

use std::fmt;
use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::GenerationError;

/// One opaque API key for the generation provider.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(Arc<str>);

impl Credential {
    pub fn new(secret: impl AsRef<str>) -> Self {
        Self(Arc::from(secret.as_ref()))
    }

    /// The raw secret, for building the Authorization header.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

// Never print any part of the secret.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Fixed set of credentials, read-only after construction.
#[derive(Debug, Clone)]
pub struct CredentialPool {
    credentials: Arc<[Credential]>,
}

impl CredentialPool {
    /// Build a pool. An empty pool is a fatal configuration error.
    pub fn new(credentials: Vec<Credential>) -> Result<Self, GenerationError> {
        if credentials.is_empty() {
            return Err(GenerationError::Configuration(
                "No API keys configured".to_string(),
            ));
        }
        Ok(Self {
            credentials: credentials.into(),
        })
    }

    /// Parse a comma-separated key list such as `OPENROUTER_API_KEYS`.
    ///
    /// Entries are trimmed; empty entries are ignored.
    pub fn from_comma_separated(keys: &str) -> Result<Self, GenerationError> {
        let credentials = keys
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(Credential::new)
            .collect();
        Self::new(credentials)
    }

    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }

    /// A uniformly random permutation of every credential.
    pub fn next_order(&self) -> Vec<Credential> {
        self.next_order_with(&mut rand::rng())
    }

    /// Same as [`next_order`](Self::next_order) with a caller-supplied RNG.
    pub fn next_order_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Credential> {
        let mut order = self.credentials.to_vec();
        order.shuffle(rng);
        order
    }
}
