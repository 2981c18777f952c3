//! An owned, injected TTL cache.
//!
//! Replaces the module-level mutable maps the surrounding application would
//! otherwise accumulate: the cache is constructed by its owner, passed where
//! needed, and testable in isolation. Entries expire after a fixed TTL
//! (7 days by default, matching the persisted airport cache) and the oldest
//! entry is evicted when capacity is exceeded. Duplicate keys overwrite:
//! whichever write lands last wins.

use std::collections::HashMap;
use std::hash::Hash;

use chrono::{DateTime, Duration, Utc};

/// A key/value cache with per-entry insertion timestamps.
#[derive(Debug, Clone)]
pub struct TtlCache<K, V> {
    entries: HashMap<K, Entry<V>>,
    ttl: Duration,
    capacity: usize,
}

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    stored_at: DateTime<Utc>,
}

impl<K: Eq + Hash + Clone, V> TtlCache<K, V> {
    /// Create a cache with the given TTL and capacity.
    ///
    /// A zero capacity is treated as capacity one.
    #[must_use]
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
            capacity: capacity.max(1),
        }
    }

    /// Insert a value, stamped with the current time.
    ///
    /// Overwrites any existing entry for the key. Evicts the oldest entry
    /// if the cache would exceed its capacity.
    pub fn insert(&mut self, key: K, value: V) {
        self.insert_at(key, value, Utc::now());
    }

    /// Insert a value with an explicit timestamp.
    ///
    /// Used when hydrating from persisted entries that carry their original
    /// store time, so their remaining TTL is honored.
    pub fn insert_at(&mut self, key: K, value: V, stored_at: DateTime<Utc>) {
        self.entries.insert(key, Entry { value, stored_at });
        if self.entries.len() > self.capacity {
            self.evict_oldest();
        }
    }

    /// Look up a value, expiring it lazily if its TTL has passed.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let expired = self
            .entries
            .get(key)
            .is_some_and(|entry| Utc::now() - entry.stored_at > self.ttl);
        if expired {
            self.entries.remove(key);
        }
        self.entries.get(key).map(|entry| &entry.value)
    }

    /// Number of entries, including any not yet lazily expired.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every expired entry, returning how many were removed.
    pub fn purge_expired(&mut self) -> usize {
        let cutoff = Utc::now() - self.ttl;
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.stored_at >= cutoff);
        before - self.entries.len()
    }

    fn evict_oldest(&mut self) {
        if let Some(oldest) = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.stored_at)
            .map(|(key, _)| key.clone())
        {
            self.entries.remove(&oldest);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache() -> TtlCache<String, f64> {
        TtlCache::new(Duration::days(7), 8)
    }

    #[test]
    fn test_insert_and_get() {
        let mut cache = cache();
        cache.insert("KORD".to_string(), 9.58);

        assert_eq!(cache.get(&"KORD".to_string()), Some(&9.58));
        assert_eq!(cache.get(&"KJFK".to_string()), None);
    }

    #[test]
    fn test_last_writer_wins() {
        let mut cache = cache();
        cache.insert("KORD".to_string(), 9.58);
        cache.insert("KORD".to_string(), 10.10);

        assert_eq!(cache.get(&"KORD".to_string()), Some(&10.10));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_expired_entry_is_dropped_on_get() {
        let mut cache = cache();
        let eight_days_ago = Utc::now() - Duration::days(8);
        cache.insert_at("KORD".to_string(), 9.58, eight_days_ago);

        assert_eq!(cache.get(&"KORD".to_string()), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_entry_within_ttl_survives() {
        let mut cache = cache();
        let six_days_ago = Utc::now() - Duration::days(6);
        cache.insert_at("KORD".to_string(), 9.58, six_days_ago);

        assert_eq!(cache.get(&"KORD".to_string()), Some(&9.58));
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut cache: TtlCache<String, f64> = TtlCache::new(Duration::days(7), 2);
        let now = Utc::now();
        cache.insert_at("KORD".to_string(), 1.0, now - Duration::hours(3));
        cache.insert_at("KJFK".to_string(), 2.0, now - Duration::hours(2));
        cache.insert_at("KLAX".to_string(), 3.0, now - Duration::hours(1));

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&"KORD".to_string()), None);
        assert_eq!(cache.get(&"KJFK".to_string()), Some(&2.0));
        assert_eq!(cache.get(&"KLAX".to_string()), Some(&3.0));
    }

    #[test]
    fn test_zero_capacity_becomes_one() {
        let mut cache: TtlCache<String, f64> = TtlCache::new(Duration::days(7), 0);
        cache.insert("KORD".to_string(), 1.0);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_purge_expired() {
        let mut cache = cache();
        let now = Utc::now();
        cache.insert_at("OLD1".to_string(), 1.0, now - Duration::days(10));
        cache.insert_at("OLD2".to_string(), 2.0, now - Duration::days(9));
        cache.insert_at("NEW1".to_string(), 3.0, now);

        assert_eq!(cache.purge_expired(), 2);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&"NEW1".to_string()), Some(&3.0));
    }
}
