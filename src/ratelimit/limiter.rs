//! Admission decisions for inbound requests.

use std::time::Instant;
use tracing::{debug, trace};

use super::counter::CounterStore;
use super::policy::RateLimitPolicy;

/// Outcome of an admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Path is not subject to throttling; pass through untouched.
    Skip,
    /// Request admitted; quota values to surface as response headers.
    Allow {
        /// The configured per-window limit
        limit: u32,
        /// Requests left in the current window
        remaining: u32,
    },
    /// Request over limit; reject with 429.
    Deny,
}

/// The core rate limiter: one window counter per client key, checked against
/// a static policy.
///
/// This struct is thread-safe and is shared across request handlers.
pub struct RateLimiter {
    /// The policy in force
    policy: RateLimitPolicy,
    /// Per-key window counters
    store: CounterStore,
}

impl RateLimiter {
    /// Create a rate limiter enforcing the given policy.
    pub fn new(policy: RateLimitPolicy) -> Self {
        let store = CounterStore::new(policy.window);
        Self { policy, store }
    }

    /// Decide whether the request identified by `client_key` against `path`
    /// may pass.
    ///
    /// Total over its inputs: every call yields a well-formed decision.
    /// Requests to paths outside the protected set never touch the store.
    pub fn decide(&self, path: &str, client_key: &str, now: Instant) -> Decision {
        if !self.policy.is_protected(path) {
            return Decision::Skip;
        }

        let (count, reset_at) = self.store.record(client_key, now);

        trace!(
            client = %client_key,
            path = %path,
            count = count,
            reset_in = ?reset_at.saturating_duration_since(now),
            "Recorded request against window"
        );

        if count > self.policy.limit {
            debug!(client = %client_key, path = %path, "Rate limit exceeded");
            return Decision::Deny;
        }

        Decision::Allow {
            limit: self.policy.limit,
            remaining: self.policy.limit - count,
        }
    }

    /// Drop expired window entries, bounding the store under high key
    /// cardinality. Invoked periodically by the sweeper task.
    pub fn sweep(&self, now: Instant) -> usize {
        let removed = self.store.evict_expired(now);
        if removed > 0 {
            debug!(
                removed = removed,
                tracked = self.store.len(),
                "Swept expired rate limit windows"
            );
        }
        removed
    }

    /// Number of client keys currently tracked.
    pub fn tracked_keys(&self) -> usize {
        self.store.len()
    }

    /// The policy in force.
    pub fn policy(&self) -> &RateLimitPolicy {
        &self.policy
    }
}
