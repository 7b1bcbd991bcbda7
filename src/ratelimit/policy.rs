//! Throttling policy: limits and protected-path matching.

use std::time::Duration;

/// Default maximum requests per window.
const DEFAULT_LIMIT: u32 = 10;
/// Default window duration.
const DEFAULT_WINDOW: Duration = Duration::from_secs(60);
/// Default protected path prefix, the public image view pages.
const DEFAULT_PROTECTED_PATH: &str = "/image/";

/// Static throttling policy, read once at startup.
///
/// Every prefix listed in `protected_paths` is enforced. Operators who want
/// additional surfaces throttled (for example `/dashboard/`) add them to the
/// list; there is no declared-but-unenforced matching.
#[derive(Debug, Clone)]
pub struct RateLimitPolicy {
    /// Maximum requests allowed per client within one window
    pub limit: u32,
    /// Window duration
    pub window: Duration,
    /// Path prefixes subject to throttling
    pub protected_paths: Vec<String>,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            window: DEFAULT_WINDOW,
            protected_paths: vec![DEFAULT_PROTECTED_PATH.to_string()],
        }
    }
}

impl RateLimitPolicy {
    /// Create a policy with the given values.
    pub fn new(limit: u32, window: Duration, protected_paths: Vec<String>) -> Self {
        Self {
            limit,
            window,
            protected_paths,
        }
    }

    /// Whether requests to `path` are subject to throttling.
    pub fn is_protected(&self, path: &str) -> bool {
        self.protected_paths
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = RateLimitPolicy::default();
        assert_eq!(policy.limit, 10);
        assert_eq!(policy.window, Duration::from_secs(60));
        assert_eq!(policy.protected_paths, vec!["/image/"]);
    }

    #[test]
    fn test_protected_path_matching() {
        let policy = RateLimitPolicy::default();
        assert!(policy.is_protected("/image/abc123"));
        assert!(policy.is_protected("/image/abc123/full"));
        assert!(!policy.is_protected("/image"));
        assert!(!policy.is_protected("/"));
        assert!(!policy.is_protected("/health"));
        assert!(!policy.is_protected("/login"));
    }

    #[test]
    fn test_every_listed_prefix_is_enforced() {
        let policy = RateLimitPolicy::new(
            10,
            Duration::from_secs(60),
            vec!["/image/".to_string(), "/dashboard/".to_string()],
        );
        assert!(policy.is_protected("/image/42"));
        assert!(policy.is_protected("/dashboard/uploads"));
        assert!(!policy.is_protected("/api/download"));
    }
}
