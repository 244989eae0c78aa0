//! Generation client module for LLM integration via OpenRouter.
//!
//! This module provides:
//! - `GenerationClient` trait: one prompt, one credential, one bounded call
//! - `OpenRouterClient` for any OpenAI-compatible chat-completions API
//! - `FakeGenerationClient` with replies scripted per credential
//! - Configuration via environment variables
//! - Prompt templates that declare the JSON shape they expect
//!
//! # Configuration
//!
//! - `OPENROUTER_API_KEYS` (required): comma-separated API keys
//! - `HARVEST_AI_MODEL` (optional): Model name, e.g., "google/gemini-2.0-flash-001"
//! - `HARVEST_AI_BASE_URL` (optional): API base URL
//! - `HARVEST_AI_TIMEOUT_SECS` (optional): Per-call timeout in seconds

mod client;
mod config;
mod fake;
pub mod prompts;
mod types;

pub use client::{GenerationClient, OpenRouterClient};
pub use config::{AiConfig, ConfigError};
pub(crate) use config::parse_or;
pub use fake::{FakeGenerationClient, FakeReply};
