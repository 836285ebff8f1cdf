//! Fixed-window request rate limiting.
//!
//! Limits are written the way operators usually configure them, e.g.
//! `"200 per day;50 per hour"`. Each limit keeps one counter per client per
//! window in a `RateLimitStore`; a request is rejected once any counter goes
//! over its ceiling.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;

use crate::infrastructure::ports::{ClockPort, CounterWindow, RateLimitError, RateLimitStore};

/// A single ceiling: at most `max_requests` per `window`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    pub max_requests: u64,
    pub window: Duration,
}

#[derive(Debug, thiserror::Error)]
#[error("invalid rate limit '{0}', expected something like '50 per hour'")]
pub struct InvalidRateLimit(String);

impl RateLimit {
    pub fn new(max_requests: u64, window: Duration) -> Self {
        Self {
            max_requests,
            window,
        }
    }

    /// Parse `"<count> per <unit>"` or `"<count>/<unit>"`.
    ///
    /// Units: second, minute, hour, day (singular or plural).
    pub fn parse(raw: &str) -> Result<Self, InvalidRateLimit> {
        let invalid = || InvalidRateLimit(raw.trim().to_string());
        let normalized = raw.trim().to_ascii_lowercase().replace('/', " per ");
        let mut parts = normalized.split_whitespace();

        let max_requests: u64 = parts
            .next()
            .and_then(|n| n.parse().ok())
            .ok_or_else(invalid)?;
        if parts.next() != Some("per") {
            return Err(invalid());
        }
        let seconds = match parts.next().map(|u| u.trim_end_matches('s')) {
            Some("second") | Some("sec") => 1,
            Some("minute") | Some("min") => 60,
            Some("hour") => 60 * 60,
            Some("day") => 24 * 60 * 60,
            _ => return Err(invalid()),
        };
        if parts.next().is_some() || max_requests == 0 {
            return Err(invalid());
        }

        Ok(Self::new(max_requests, Duration::from_secs(seconds)))
    }

    /// Parse a `;`-separated list of limits.
    pub fn parse_list(raw: &str) -> Result<Vec<Self>, InvalidRateLimit> {
        raw.split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Self::parse)
            .collect()
    }

    fn window_secs(&self) -> i64 {
        i64::try_from(self.window.as_secs()).unwrap_or(i64::MAX).max(1)
    }

    /// The window containing `now` (unix seconds).
    fn window(&self, now: i64) -> CounterWindow {
        let start = now - now.rem_euclid(self.window_secs());
        CounterWindow {
            start,
            end: start.saturating_add(self.window_secs()),
        }
    }
}

impl std::fmt::Display for RateLimit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} per {}s", self.max_requests, self.window.as_secs())
    }
}

// =============================================================================
// Limiter
// =============================================================================

/// Outcome of a rate limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed,
    Limited(RateLimit),
}

/// How often expired counters are swept from the store.
const PURGE_INTERVAL_SECS: i64 = 60;

/// Applies a set of limits to client keys.
pub struct RateLimiter {
    store: Arc<dyn RateLimitStore>,
    limits: Vec<RateLimit>,
    clock: Arc<dyn ClockPort>,
    next_purge: AtomicI64,
}

impl RateLimiter {
    pub fn new(
        store: Arc<dyn RateLimitStore>,
        limits: Vec<RateLimit>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            store,
            limits,
            clock,
            next_purge: AtomicI64::new(i64::MIN),
        }
    }

    /// Count one request from `client` against every limit.
    ///
    /// A counter store failure lets the request through; an unavailable
    /// limiter must not take the API down with it.
    pub async fn check(&self, client: &str) -> RateDecision {
        let now = self.clock.now().timestamp();
        self.purge_if_due(now).await;

        let mut decision = RateDecision::Allowed;
        for limit in &self.limits {
            let key = format!("{client}:{}:{}", limit.max_requests, limit.window_secs());
            match self.store.increment(&key, limit.window(now)).await {
                Ok(count) if count > limit.max_requests => {
                    decision = RateDecision::Limited(*limit);
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(error = %e, client = %client, "Rate limit check failed, allowing request");
                }
            }
        }

        decision
    }

    /// At most once per interval, drop counters from finished windows.
    async fn purge_if_due(&self, now: i64) {
        let due = self.next_purge.load(Ordering::Relaxed);
        if now < due {
            return;
        }
        // Only the caller that moves the deadline does the sweep
        if self
            .next_purge
            .compare_exchange(due, now + PURGE_INTERVAL_SECS, Ordering::Relaxed, Ordering::Relaxed)
            .is_err()
        {
            return;
        }

        match self.store.purge_expired(now).await {
            Ok(0) => {}
            Ok(removed) => tracing::debug!(removed, "Purged expired rate limit counters"),
            Err(e) => tracing::warn!(error = %e, "Rate limit counter purge failed"),
        }
    }
}

// =============================================================================
// In-memory counter store
// =============================================================================

/// Process-local counter store.
///
/// Holds one counter per key. A counter from an older window is reset on its
/// next hit; counters nobody hits again are dropped by `purge_expired`.
#[derive(Default)]
pub struct InMemoryRateLimitStore {
    counters: DashMap<String, (CounterWindow, u64)>,
}

impl InMemoryRateLimitStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.counters.len()
    }
}

#[async_trait]
impl RateLimitStore for InMemoryRateLimitStore {
    async fn increment(&self, key: &str, window: CounterWindow) -> Result<u64, RateLimitError> {
        let mut counter = self
            .counters
            .entry(key.to_string())
            .or_insert((window, 0));

        if counter.0 != window {
            *counter = (window, 0);
        }
        counter.1 += 1;

        Ok(counter.1)
    }

    async fn purge_expired(&self, now: i64) -> Result<usize, RateLimitError> {
        let before = self.counters.len();
        self.counters.retain(|_, (window, _)| window.end > now);
        Ok(before.saturating_sub(self.counters.len()))
    }
}
