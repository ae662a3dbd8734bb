//! Per-client submission rate limiting
//!
//! Fixed-window accounting keyed by client identifier (usually the peer
//! address reported by proxy headers). Consulted by the HTTP layer before
//! the word store is touched; a refused client never reaches the store.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use tracing::debug;

/// Outcome of a rate limit check
///
/// Pure accounting: never an error. The HTTP boundary decides how a
/// refusal is surfaced to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    /// Requests the client has left in the current window
    pub remaining: u32,
}

struct Entry {
    /// Requests observed in the current window
    count: u32,
    /// When the window resets
    window_resets_at: DateTime<Utc>,
}

/// Shared handle to the rate limiter
///
/// Same lifecycle pattern as [`super::WordStore`]: one process-wide
/// instance, cheap clones, all state behind a single lock. The `*_at`
/// variants take an explicit `now` for deterministic windowing in tests.
#[derive(Clone)]
pub struct RateLimiter {
    inner: Arc<RwLock<HashMap<String, Entry>>>,
    max_requests: u32,
    window: Duration,
}

impl RateLimiter {
    /// Create a rate limiter allowing `max_requests` per `window`
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            max_requests,
            window,
        }
    }

    /// Account for one request from `client_id`
    pub async fn check(&self, client_id: &str) -> RateLimitDecision {
        self.check_at(client_id, Utc::now()).await
    }

    /// `check` with an explicit clock reading
    pub async fn check_at(&self, client_id: &str, now: DateTime<Utc>) -> RateLimitDecision {
        let mut entries = self.inner.write().await;

        match entries.get_mut(client_id) {
            Some(entry) if now <= entry.window_resets_at => {
                if entry.count >= self.max_requests {
                    // Idempotent refusal: the count stays at the cap so a
                    // hammering client is not penalized past the window
                    debug!("Rate limit exceeded for {}", client_id);
                    RateLimitDecision {
                        allowed: false,
                        remaining: 0,
                    }
                } else {
                    entry.count += 1;
                    RateLimitDecision {
                        allowed: true,
                        remaining: self.max_requests - entry.count,
                    }
                }
            }
            _ => {
                // First request, or previous window elapsed: start fresh
                entries.insert(
                    client_id.to_string(),
                    Entry {
                        count: 1,
                        window_resets_at: now + self.window,
                    },
                );
                RateLimitDecision {
                    allowed: true,
                    remaining: self.max_requests.saturating_sub(1),
                }
            }
        }
    }

    /// Drop entries whose window has elapsed, to bound memory
    ///
    /// Safe to call opportunistically: stale entries self-correct on the
    /// next `check` regardless.
    pub async fn sweep(&self) {
        self.sweep_at(Utc::now()).await;
    }

    /// `sweep` with an explicit clock reading
    pub async fn sweep_at(&self, now: DateTime<Utc>) {
        let mut entries = self.inner.write().await;
        let before = entries.len();
        entries.retain(|_, entry| now <= entry.window_resets_at);
        let removed = before - entries.len();
        if removed > 0 {
            debug!("Swept {} stale rate limit entries", removed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(max_requests: u32) -> RateLimiter {
        RateLimiter::new(max_requests, Duration::seconds(60))
    }

    #[tokio::test]
    async fn test_allows_up_to_cap_then_refuses() {
        let limiter = limiter(3);
        let now = Utc::now();

        for expected_remaining in [2, 1, 0] {
            let decision = limiter.check_at("10.0.0.1", now).await;
            assert!(decision.allowed);
            assert_eq!(decision.remaining, expected_remaining);
        }

        let decision = limiter.check_at("10.0.0.1", now).await;
        assert!(!decision.allowed);
        assert_eq!(decision.remaining, 0);
    }

    #[tokio::test]
    async fn test_refusal_is_idempotent() {
        let limiter = limiter(2);
        let now = Utc::now();

        limiter.check_at("10.0.0.1", now).await;
        limiter.check_at("10.0.0.1", now).await;

        // Hammering past the cap keeps refusing without over-counting
        for _ in 0..10 {
            let decision = limiter.check_at("10.0.0.1", now).await;
            assert!(!decision.allowed);
        }

        // Window elapses: the client is welcome again
        let later = now + Duration::seconds(61);
        let decision = limiter.check_at("10.0.0.1", later).await;
        assert!(decision.allowed);
        assert_eq!(decision.remaining, 1);
    }

    #[tokio::test]
    async fn test_window_reset_restarts_count() {
        let limiter = limiter(5);
        let now = Utc::now();

        limiter.check_at("10.0.0.1", now).await;
        limiter.check_at("10.0.0.1", now).await;

        let later = now + Duration::seconds(61);
        let decision = limiter.check_at("10.0.0.1", later).await;
        assert!(decision.allowed);
        assert_eq!(decision.remaining, 4);
    }

    #[tokio::test]
    async fn test_clients_are_independent() {
        let limiter = limiter(1);
        let now = Utc::now();

        assert!(limiter.check_at("10.0.0.1", now).await.allowed);
        assert!(!limiter.check_at("10.0.0.1", now).await.allowed);
        assert!(limiter.check_at("10.0.0.2", now).await.allowed);
    }

    #[tokio::test]
    async fn test_sweep_drops_only_elapsed_windows() {
        let limiter = limiter(5);
        let now = Utc::now();

        limiter.check_at("old", now).await;
        limiter.check_at("fresh", now + Duration::seconds(30)).await;

        limiter.sweep_at(now + Duration::seconds(61)).await;

        let entries = limiter.inner.read().await;
        assert!(!entries.contains_key("old"));
        assert!(entries.contains_key("fresh"));
    }
}
