//! FILENAME: core/persistence/src/cache.rs
//! PURPOSE: Expiring key-value store for loaded tables.
//! CONTEXT: Entries live for a fixed window from the moment they were stored.
//! There is no explicit invalidation; a later insert for the same key wins.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Default lifetime of a cached load.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

/// Monotonic time source, measured from an arbitrary origin.
pub trait Clock: Send + Sync {
    fn now(&self) -> Duration;
}

/// Wall clock backed by `Instant`.
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        SystemClock { origin: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Clock that only moves when told to.
#[derive(Default)]
pub struct ManualClock {
    now: Mutex<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        if let Ok(mut now) = self.now.lock() {
            *now += by;
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.lock().map(|now| *now).unwrap_or_default()
    }
}

// ============================================================================
// LOAD CACHE
// ============================================================================

pub struct LoadCache<K, V> {
    entries: Mutex<HashMap<K, (Duration, V)>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<K, V> LoadCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        LoadCache {
            entries: Mutex::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns a copy of the entry if it is younger than the TTL.
    /// Expired entries are evicted on access.
    pub fn get(&self, key: &K) -> Option<V> {
        let now = self.clock.now();
        let mut entries = self.entries.lock().ok()?;
        let (stored_at, value) = entries.get(key)?;
        if now.saturating_sub(*stored_at) < self.ttl {
            return Some(value.clone());
        }
        entries.remove(key);
        None
    }

    pub fn insert(&self, key: K, value: V) {
        let now = self.clock.now();
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key, (now, value));
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache(clock: &Arc<ManualClock>) -> LoadCache<&'static str, u32> {
        LoadCache::new(DEFAULT_TTL, clock.clone())
    }

    #[test]
    fn test_hit_within_window() {
        let clock = Arc::new(ManualClock::new());
        let cache = cache(&clock);
        cache.insert("a", 1);
        clock.advance(Duration::from_secs(59));
        assert_eq!(cache.get(&"a"), Some(1));
    }

    #[test]
    fn test_expiry_evicts() {
        let clock = Arc::new(ManualClock::new());
        let cache = cache(&clock);
        cache.insert("a", 1);
        clock.advance(Duration::from_secs(60));
        assert_eq!(cache.get(&"a"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_last_write_wins() {
        let clock = Arc::new(ManualClock::new());
        let cache = cache(&clock);
        cache.insert("a", 1);
        clock.advance(Duration::from_secs(30));
        cache.insert("a", 2);
        clock.advance(Duration::from_secs(45));
        // Window restarts at the second insert
        assert_eq!(cache.get(&"a"), Some(2));
    }

    #[test]
    fn test_system_clock_moves_forward() {
        let clock = SystemClock::new();
        let a = clock.now();
        assert!(clock.now() >= a);
    }
}
