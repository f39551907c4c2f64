//! Time-to-live memoization of computed results
//!
//! Entries carry their own expiry. Every operation has an `_at` form that
//! takes the current instant explicitly; the plain forms read the wall clock.

use chrono::{DateTime, Duration, Utc};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::hash::Hash;
use tracing::debug;

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    expires_at: DateTime<Utc>,
}

/// Key-value cache whose entries expire a fixed time after insertion
#[derive(Debug, Clone)]
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: HashMap<K, CacheEntry<V>>,
}

impl<K: Eq + Hash, V> TtlCache<K, V> {
    /// Create a cache with the given time to live
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Create a cache whose entries live for `secs` seconds
    pub fn with_ttl_secs(secs: u32) -> Self {
        Self::new(Duration::seconds(i64::from(secs)))
    }

    /// Time to live of new entries
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn expiry_from(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_add_signed(self.ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Insert a value that expires `ttl` after `now`
    pub fn insert_at(&mut self, key: K, value: V, now: DateTime<Utc>) {
        let expires_at = self.expiry_from(now);
        self.entries.insert(key, CacheEntry { value, expires_at });
    }

    /// Insert a value that expires `ttl` from now
    pub fn insert(&mut self, key: K, value: V) {
        self.insert_at(key, value, Utc::now());
    }

    /// Look up a live entry; an expired entry is removed and reported missing
    pub fn get_at(&mut self, key: &K, now: DateTime<Utc>) -> Option<&V> {
        let expired = match self.entries.get(key) {
            None => {
                debug!("cache miss");
                return None;
            }
            Some(entry) => entry.expires_at <= now,
        };

        if expired {
            self.entries.remove(key);
            debug!("cache entry expired");
            return None;
        }

        debug!("cache hit");
        self.entries.get(key).map(|entry| &entry.value)
    }

    /// Look up a live entry against the wall clock
    pub fn get(&mut self, key: &K) -> Option<&V> {
        self.get_at(key, Utc::now())
    }

    /// Return the live entry for `key`, computing and storing it if absent
    /// or expired
    pub fn get_or_insert_with_at<F>(&mut self, key: K, now: DateTime<Utc>, compute: F) -> &V
    where
        F: FnOnce() -> V,
    {
        let expires_at = self.expiry_from(now);
        match self.entries.entry(key) {
            Entry::Occupied(mut occupied) => {
                if occupied.get().expires_at <= now {
                    debug!("cache entry expired, recomputing");
                    occupied.insert(CacheEntry {
                        value: compute(),
                        expires_at,
                    });
                }
                &occupied.into_mut().value
            }
            Entry::Vacant(vacant) => {
                debug!("cache miss, computing value");
                &vacant
                    .insert(CacheEntry {
                        value: compute(),
                        expires_at,
                    })
                    .value
            }
        }
    }

    /// Remove an entry, returning whether it was present
    pub fn invalidate(&mut self, key: &K) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Remove every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Drop expired entries, returning how many were removed
    pub fn purge_expired_at(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.expires_at > now);
        let purged = before - self.entries.len();
        if purged > 0 {
            debug!(purged, "purged expired cache entries");
        }
        purged
    }

    /// Drop entries expired as of now
    pub fn purge_expired(&mut self) -> usize {
        self.purge_expired_at(Utc::now())
    }

    /// Number of stored entries, including expired ones not yet purged
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_hit_then_expiry() {
        let mut cache = TtlCache::with_ttl_secs(300);
        cache.insert_at("correlation:180", 42, t0());

        assert_eq!(cache.get_at(&"correlation:180", t0() + Duration::seconds(299)), Some(&42));
        assert_eq!(cache.get_at(&"correlation:180", t0() + Duration::seconds(300)), None);
        // expired entries are removed on access
        assert!(cache.is_empty());
    }

    #[test]
    fn test_get_or_insert_with() {
        let mut cache = TtlCache::new(Duration::minutes(5));
        let mut calls = 0;

        let v = *cache.get_or_insert_with_at("k", t0(), || {
            calls += 1;
            10
        });
        assert_eq!(v, 10);

        let v = *cache.get_or_insert_with_at("k", t0() + Duration::minutes(1), || {
            calls += 1;
            20
        });
        assert_eq!(v, 10);

        let v = *cache.get_or_insert_with_at("k", t0() + Duration::minutes(6), || {
            calls += 1;
            30
        });
        assert_eq!(v, 30);
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_invalidate_and_purge() {
        let mut cache = TtlCache::with_ttl_secs(60);
        cache.insert_at(1, "a", t0());
        cache.insert_at(2, "b", t0() + Duration::seconds(30));

        assert!(cache.invalidate(&1));
        assert!(!cache.invalidate(&1));

        cache.insert_at(3, "c", t0());
        assert_eq!(cache.purge_expired_at(t0() + Duration::seconds(61)), 1);
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }
}
