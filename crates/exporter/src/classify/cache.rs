use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};

use lru::LruCache;
use parking_lot::Mutex;
use serde::Serialize;
use thiserror::Error;

use super::model::UaLabels;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Classification cache capacity must be > 0")]
pub struct ZeroCapacity;

/// Bounded user-agent → labels cache
///
/// Parsing a user agent with the fallback classifier is the most expensive
/// step of classifying a line, and real traffic repeats a small set of user
/// agents. Keyed by the raw user-agent string.
///
/// The LRU list is behind a single mutex: `get` moves the entry to the front,
/// so even lookups mutate. Capacity is fixed at construction and never exceeded.
#[derive(Debug)]
pub struct ClassificationCache {
    entries: Mutex<LruCache<String, UaLabels>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ClassificationCache {
    pub fn new(capacity: usize) -> Result<Self, ZeroCapacity> {
        let capacity = NonZeroUsize::new(capacity).ok_or(ZeroCapacity)?;
        Ok(Self {
            entries: Mutex::new(LruCache::new(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        })
    }

    /// Look up the labels for a user agent, refreshing its recency.
    pub fn get(&self, user_agent: &str) -> Option<UaLabels> {
        let found = self.entries.lock().get(user_agent).cloned();
        if found.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
        found
    }

    /// Store labels, evicting the least recently used entry when full.
    pub fn set(&self, user_agent: String, labels: UaLabels) {
        self.entries.lock().put(user_agent, labels);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        let entries = self.entries.lock();
        CacheStats {
            entries: entries.len(),
            capacity: entries.cap().get(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn labels(name: &str) -> UaLabels {
        UaLabels::new(name, "Linux", "Other")
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert_eq!(ClassificationCache::new(0).unwrap_err(), ZeroCapacity);
    }

    #[test]
    fn test_get_and_evict_single_slot() {
        let cache = ClassificationCache::new(1).unwrap();

        cache.set("test_key1".to_string(), labels("a"));
        assert_eq!(cache.get("test_key1"), Some(labels("a")));

        cache.set("test_key2".to_string(), labels("b"));
        assert_eq!(cache.get("test_key1"), None);
        assert_eq!(cache.get("nonexistent"), None);
    }

    #[test]
    fn test_len_never_exceeds_capacity() {
        let cache = ClassificationCache::new(2).unwrap();

        cache.set("key1".to_string(), labels("1"));
        assert_eq!(cache.len(), 1);
        cache.set("key2".to_string(), labels("2"));
        assert_eq!(cache.len(), 2);
        cache.set("key3".to_string(), labels("3"));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.stats().capacity, 2);
    }

    #[test]
    fn test_evicts_least_recently_accessed() {
        let cache = ClassificationCache::new(3).unwrap();
        cache.set("a".to_string(), labels("a"));
        cache.set("b".to_string(), labels("b"));
        cache.set("c".to_string(), labels("c"));

        // touch "a" so "b" becomes the oldest
        assert!(cache.get("a").is_some());

        cache.set("d".to_string(), labels("d"));

        assert_eq!(cache.len(), 3);
        assert!(cache.get("b").is_none(), "b should have been evicted");
        assert!(cache.get("a").is_some());
        assert!(cache.get("c").is_some());
        assert!(cache.get("d").is_some());
    }

    #[test]
    fn test_stats_track_hits_and_misses() {
        let cache = ClassificationCache::new(4).unwrap();
        cache.set("a".to_string(), labels("a"));
        cache.get("a");
        cache.get("a");
        cache.get("missing");

        let stats = cache.stats();
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.capacity, 4);
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn test_concurrent_access_respects_capacity() {
        let cache = Arc::new(ClassificationCache::new(16).unwrap());

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    for i in 0..200 {
                        let key = format!("ua-{}-{}", t, i % 40);
                        if cache.get(&key).is_none() {
                            cache.set(key, labels("x"));
                        }
                        assert!(cache.len() <= 16);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(cache.len(), 16);
    }
}
