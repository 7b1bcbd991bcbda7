//! Per-client window counters.

use dashmap::DashMap;
use std::time::{Duration, Instant};

/// State of a single client's current window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowState {
    /// Requests observed in the current window
    pub count: u32,
    /// Instant at which the window resets
    pub reset_at: Instant,
}

/// Keyed store of window counters.
///
/// Holds one [`WindowState`] per client key. Entries are sharded by key hash,
/// so the check-expire-then-increment sequence is atomic for a single key
/// while unrelated keys proceed in parallel. Expiry is detected lazily on
/// access; [`CounterStore::evict_expired`] exists only to bound memory.
pub struct CounterStore {
    /// Window duration applied to every key
    window: Duration,
    /// Counter state indexed by client key
    entries: DashMap<String, WindowState>,
}

impl CounterStore {
    /// Create an empty store with the given window duration.
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            entries: DashMap::new(),
        }
    }

    /// Record one request for `key` and return the count after the increment
    /// together with the window's reset instant.
    ///
    /// A missing entry, or an entry whose window has expired
    /// (`reset_at <= now`), starts a fresh window at
    /// `{count: 1, reset_at: now + window}`. The entry guard holds its shard
    /// lock for the duration of the update, so concurrent calls for the same
    /// key observe the sequence `1, 2, 3, ...`.
    pub fn record(&self, key: &str, now: Instant) -> (u32, Instant) {
        let mut entry = self.entries.entry(key.to_owned()).or_insert(WindowState {
            count: 0,
            reset_at: now + self.window,
        });

        if entry.reset_at <= now {
            // Window expired, start a new one
            *entry = WindowState {
                count: 1,
                reset_at: now + self.window,
            };
        } else {
            // Denied requests keep counting; saturate rather than wrap
            entry.count = entry.count.saturating_add(1);
        }

        (entry.count, entry.reset_at)
    }

    /// Drop entries whose window has already passed.
    ///
    /// Behavior-neutral: the next request for an evicted key would have
    /// started a fresh window anyway. Returns the number of entries removed.
    pub fn evict_expired(&self, now: Instant) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, state| state.reset_at > now);
        before.saturating_sub(self.entries.len())
    }

    /// Number of keys currently tracked.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current state for a key, if present.
    pub fn get(&self, key: &str) -> Option<WindowState> {
        self.entries.get(key).map(|entry| *entry.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_secs(60);

    #[test]
    fn test_first_request_starts_window() {
        let store = CounterStore::new(WINDOW);
        let now = Instant::now();

        let (count, reset_at) = store.record("1.2.3.4", now);

        assert_eq!(count, 1);
        assert_eq!(reset_at, now + WINDOW);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_counts_increase_within_window() {
        let store = CounterStore::new(WINDOW);
        let now = Instant::now();

        for expected in 1..=5 {
            let (count, _) = store.record("1.2.3.4", now);
            assert_eq!(count, expected);
        }
    }

    #[test]
    fn test_reset_instant_stable_within_window() {
        let store = CounterStore::new(WINDOW);
        let now = Instant::now();

        let (_, first_reset) = store.record("1.2.3.4", now);
        let (_, later_reset) = store.record("1.2.3.4", now + Duration::from_secs(30));

        assert_eq!(first_reset, later_reset);
    }

    #[test]
    fn test_expired_window_restarts_at_one() {
        let store = CounterStore::new(WINDOW);
        let now = Instant::now();

        for _ in 0..7 {
            store.record("1.2.3.4", now);
        }

        // Exactly at the reset instant the window is expired
        let (count, reset_at) = store.record("1.2.3.4", now + WINDOW);
        assert_eq!(count, 1);
        assert_eq!(reset_at, now + WINDOW + WINDOW);
    }

    #[test]
    fn test_keys_do_not_share_counts() {
        let store = CounterStore::new(WINDOW);
        let now = Instant::now();

        store.record("1.2.3.4", now);
        store.record("1.2.3.4", now);
        store.record("5.6.7.8", now);

        assert_eq!(store.get("1.2.3.4").unwrap().count, 2);
        assert_eq!(store.get("5.6.7.8").unwrap().count, 1);
    }

    #[test]
    fn test_evict_expired_removes_only_stale_entries() {
        let store = CounterStore::new(WINDOW);
        let now = Instant::now();

        store.record("stale", now);
        store.record("live", now + Duration::from_secs(30));

        let removed = store.evict_expired(now + WINDOW);

        assert_eq!(removed, 1);
        assert!(store.get("stale").is_none());
        assert!(store.get("live").is_some());
    }

    #[test]
    fn test_evict_on_empty_store() {
        let store = CounterStore::new(WINDOW);
        assert_eq!(store.evict_expired(Instant::now()), 0);
        assert!(store.is_empty());
    }
}
