//! Time-to-live caches for upstream entities.
//!
//! Each cache is an explicit object constructed once with its TTL and owned by
//! the aggregator, so entry lifetime and test isolation are visible rather
//! than hidden in module-level state. Invalidation is purely time-based; there
//! is no clear operation. Writes are last-write-wins, which is acceptable
//! because entries are idempotent snapshots.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Mutex;
use std::time::{Duration, Instant};

struct CacheEntry<V> {
    value: V,
    fetched_at: Instant,
}

/// A keyed cache whose entries expire `ttl` after they were stored.
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: Mutex<HashMap<K, CacheEntry<V>>>,
}

impl<K: Eq + Hash, V: Clone> TtlCache<K, V> {
    pub fn new(ttl: Duration) -> Self {
        TtlCache {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the cached value if present and still within its TTL.
    pub fn get(&self, key: &K) -> Option<V> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries
            .get(key)
            .filter(|entry| entry.fetched_at.elapsed() < self.ttl)
            .map(|entry| entry.value.clone())
    }

    pub fn insert(&self, key: K, value: V) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(
            key,
            CacheEntry {
                value,
                fetched_at: Instant::now(),
            },
        );
    }
}
