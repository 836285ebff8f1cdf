//! External service port traits (rate limit counter store).

use async_trait::async_trait;

use super::error::RateLimitError;

/// Half-open window `[start, end)` in unix seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterWindow {
    pub start: i64,
    pub end: i64,
}

/// Shared counter store backing the request rate limiter.
///
/// Counters are fixed-window: a counter is identified by `key` and the start
/// of its window. Moving to a new window starts from zero.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RateLimitStore: Send + Sync {
    /// Add one hit to the counter and return the count including this hit.
    async fn increment(&self, key: &str, window: CounterWindow) -> Result<u64, RateLimitError>;

    /// Drop counters whose window ended at or before `now`. Returns how many
    /// were removed.
    async fn purge_expired(&self, now: i64) -> Result<usize, RateLimitError>;
}
