//! HTTP client with rate limiting for search lookups.
//!
//! All outgoing search requests go through this module so that a batch of
//! lookups never hammers one host.

mod client;
mod rate_limiter;

pub use client::{
    HttpClient, MockClient, MockResponse, RateLimitedClient, RateLimitedClientBuilder,
    DEFAULT_USER_AGENT,
};
pub use rate_limiter::RateLimiter;
