//! In-process TTL cache with a key registry for bulk invalidation.
//!
//! The backing map offers no "list keys" operation that is safe to use for
//! eviction, so every `put` also records its key in a registry set;
//! `invalidate_all` walks the registry and clears it. Expiry is lazy: an
//! entry older than its TTL is treated as absent on read and removed then.
//! Operations never fail, so a degraded cache is indistinguishable from a
//! miss.
//!
//! Concurrent `put` / `invalidate_all` calls are not mutually exclusive; a
//! key registered while a bulk invalidation is in flight may survive until
//! the next one. Accepted looseness for a best-effort cache.

use dashmap::{DashMap, DashSet};
use std::time::{Duration, Instant};

struct CacheEntry<T> {
    value: T,
    expires_at: Instant,
}

pub struct TtlCache<T> {
    entries: DashMap<String, CacheEntry<T>>,
    registry: DashSet<String>,
}

impl<T: Clone> TtlCache<T> {
    pub fn new() -> Self {
        TtlCache {
            entries: DashMap::new(),
            registry: DashSet::new(),
        }
    }

    /// Returns the stored value if present and not expired.
    pub fn get(&self, key: &str) -> Option<T> {
        let hit = match self.entries.get(key) {
            None => return None,
            Some(entry) if Instant::now() < entry.expires_at => Some(entry.value.clone()),
            Some(_) => None,
        };

        if hit.is_none() {
            self.entries.remove(key);
            self.registry.remove(key);
        }

        hit
    }

    /// Stores a value with the given TTL, overwriting any existing entry,
    /// and registers the key for bulk invalidation.
    pub fn put(&self, key: &str, value: T, ttl: Duration) {
        self.entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                expires_at: Instant::now() + ttl,
            },
        );
        self.registry.insert(key.to_string());
    }

    /// Removes a single entry by its exact key.
    pub fn invalidate(&self, key: &str) {
        self.entries.remove(key);
        self.registry.remove(key);
    }

    /// Removes every registered entry, then clears the registry.
    pub fn invalidate_all(&self) {
        let keys: Vec<String> = self.registry.iter().map(|k| k.key().clone()).collect();
        for key in &keys {
            self.entries.remove(key);
        }
        self.registry.clear();
    }

    /// Number of keys currently registered for bulk invalidation.
    pub fn registered_keys(&self) -> usize {
        self.registry.len()
    }
}

impl<T: Clone> Default for TtlCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_then_get_within_ttl_returns_value() {
        let cache = TtlCache::new();
        cache.put("k", 42, Duration::from_secs(30));
        assert_eq!(cache.get("k"), Some(42));
    }

    #[test]
    fn get_after_ttl_elapsed_returns_absent() {
        let cache = TtlCache::new();
        cache.put("k", 42, Duration::from_millis(20));
        std::thread::sleep(Duration::from_millis(40));
        assert_eq!(cache.get("k"), None);
        // lazy expiry also drops the registry entry
        assert_eq!(cache.registered_keys(), 0);
    }

    #[test]
    fn put_overwrites_existing_entry() {
        let cache = TtlCache::new();
        cache.put("k", 1, Duration::from_secs(30));
        cache.put("k", 2, Duration::from_secs(30));
        assert_eq!(cache.get("k"), Some(2));
        assert_eq!(cache.registered_keys(), 1);
    }

    #[test]
    fn invalidate_all_evicts_every_registered_key() {
        let cache = TtlCache::new();
        for i in 0..5 {
            cache.put(&format!("k{i}"), i, Duration::from_secs(30));
        }
        assert_eq!(cache.registered_keys(), 5);

        cache.invalidate_all();

        for i in 0..5 {
            assert_eq!(cache.get(&format!("k{i}")), None);
        }
        assert_eq!(cache.registered_keys(), 0);
    }

    #[test]
    fn invalidate_removes_only_the_named_key() {
        let cache = TtlCache::new();
        cache.put("a", 1, Duration::from_secs(30));
        cache.put("b", 2, Duration::from_secs(30));

        cache.invalidate("a");

        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), Some(2));
        assert_eq!(cache.registered_keys(), 1);
    }

    #[test]
    fn missing_key_is_a_plain_miss() {
        let cache: TtlCache<i32> = TtlCache::new();
        assert_eq!(cache.get("nope"), None);
    }
}
