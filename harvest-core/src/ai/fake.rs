//! Fake generation client for testing.
//!
//! Replies are scripted per credential so tests can decide exactly which
//! keys succeed, fail, stall or return junk, and then inspect the order in
//! which keys were tried.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use super::client::GenerationClient;
use crate::credentials::Credential;
use crate::error::ProviderError;

/// What the fake does when called with a given credential.
#[derive(Debug, Clone)]
pub enum FakeReply {
    /// Return this completion text.
    Text(String),
    /// Fail with this provider error message.
    Fail(String),
    /// Never answer; the call ends when the timeout elapses.
    Stall,
}

#[derive(Debug, Default)]
pub struct FakeGenerationClient {
    replies: HashMap<String, FakeReply>,
    default_reply: Option<FakeReply>,
    attempts: Mutex<Vec<String>>,
    prompts: Mutex<Vec<String>>,
}

impl FakeGenerationClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the reply for one credential.
    pub fn with_reply(mut self, credential: &str, reply: FakeReply) -> Self {
        self.replies.insert(credential.to_string(), reply);
        self
    }

    pub fn with_text(self, credential: &str, text: &str) -> Self {
        self.with_reply(credential, FakeReply::Text(text.to_string()))
    }

    pub fn with_failure(self, credential: &str, message: &str) -> Self {
        self.with_reply(credential, FakeReply::Fail(message.to_string()))
    }

    /// Reply used for credentials without a scripted reply.
    pub fn with_default_reply(mut self, reply: FakeReply) -> Self {
        self.default_reply = Some(reply);
        self
    }

    /// Credentials tried so far, in call order.
    pub fn attempts(&self) -> Vec<String> {
        self.attempts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl GenerationClient for FakeGenerationClient {
    async fn complete(
        &self,
        prompt: &str,
        credential: &Credential,
        timeout: Duration,
    ) -> Result<String, ProviderError> {
        self.attempts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(credential.expose().to_string());
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(prompt.to_string());

        let reply = self
            .replies
            .get(credential.expose())
            .or(self.default_reply.as_ref())
            .cloned();

        match reply {
            Some(FakeReply::Text(text)) => Ok(text),
            Some(FakeReply::Fail(message)) => Err(ProviderError::new(message)),
            Some(FakeReply::Stall) => {
                tokio::time::sleep(timeout).await;
                Err(ProviderError::new(format!(
                    "request timed out after {}s",
                    timeout.as_secs_f32()
                )))
            }
            None => Err(ProviderError::new(format!(
                "FakeGenerationClient: no reply scripted for {:?}",
                credential
            ))),
        }
    }

    fn model_name(&self) -> &str {
        "fake-model"
    }
}
