//! Key/value cache contract for reference data.
//!
//! # Design
//! The cache is always passed in explicitly. `NullCache` is the default and
//! never stores anything; `MemoryCache` keeps entries in a mutex-guarded map
//! with optional expiry. Neither enforces at-most-one fetch per key.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

pub trait Cache: Send + Sync {
    fn read(&self, key: &str) -> Option<String>;

    /// Store `value`; with `ttl` set the entry expires after that duration.
    fn write(&self, key: &str, value: String, ttl: Option<Duration>);
}

/// A cache that forgets everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCache;

impl Cache for NullCache {
    fn read(&self, _key: &str) -> Option<String> {
        None
    }

    fn write(&self, _key: &str, _value: String, _ttl: Option<Duration>) {}
}

#[derive(Debug)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

/// In-process cache.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        // A panic while holding the lock cannot leave an entry half-written.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl Cache for MemoryCache {
    fn read(&self, key: &str) -> Option<String> {
        let mut entries = self.lock();
        let expired = match entries.get(key) {
            None => return None,
            Some(entry) => entry.expires_at.is_some_and(|at| Instant::now() >= at),
        };
        if expired {
            entries.remove(key);
            return None;
        }
        entries.get(key).map(|entry| entry.value.clone())
    }

    fn write(&self, key: &str, value: String, ttl: Option<Duration>) {
        let expires_at = ttl.map(|ttl| Instant::now() + ttl);
        self.lock().insert(key.to_string(), Entry { value, expires_at });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_cache_never_hits() {
        let cache = NullCache;
        cache.write("k", "v".to_string(), None);
        assert_eq!(cache.read("k"), None);
    }

    #[test]
    fn memory_cache_round_trip() {
        let cache = MemoryCache::new();
        assert_eq!(cache.read("k"), None);
        cache.write("k", "v".to_string(), None);
        assert_eq!(cache.read("k").as_deref(), Some("v"));
        cache.write("k", "w".to_string(), None);
        assert_eq!(cache.read("k").as_deref(), Some("w"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn expired_entries_are_dropped() {
        let cache = MemoryCache::new();
        cache.write("k", "v".to_string(), Some(Duration::ZERO));
        assert_eq!(cache.read("k"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn long_ttl_survives() {
        let cache = MemoryCache::new();
        cache.write("k", "v".to_string(), Some(Duration::from_secs(3600)));
        assert_eq!(cache.read("k").as_deref(), Some("v"));
        cache.clear();
        assert_eq!(cache.read("k"), None);
    }
}
