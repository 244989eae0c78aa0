//! Per-host rate limiting for HTTP requests.

use dashmap::DashMap;
use std::time::Duration;
use tokio::time::{sleep_until, Instant};

/// Per-host rate limiter to avoid hammering external servers.
///
/// Each caller reserves the next free slot for its host before sleeping, so
/// concurrent requests to one host are spaced `min_delay` apart instead of
/// all waking at once.
pub struct RateLimiter {
    min_delay: Duration,
    /// Earliest instant the next request to each host may start.
    next_slot: DashMap<String, Instant>,
}

impl RateLimiter {
    pub fn new(min_delay: Duration) -> Self {
        Self {
            min_delay,
            next_slot: DashMap::new(),
        }
    }

    /// Wait until this caller's slot for `host` arrives.
    pub async fn wait(&self, host: &str) {
        if self.min_delay.is_zero() {
            return;
        }

        let start = {
            let now = Instant::now();
            let mut slot = self.next_slot.entry(host.to_string()).or_insert(now);
            let start = (*slot).max(now);
            *slot = start + self.min_delay;
            start
        };

        sleep_until(start).await;
    }

    /// Get the number of hosts we've tracked.
    pub fn tracked_hosts(&self) -> usize {
        self.next_slot.len()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(Duration::from_millis(200))
    }
}
