//! In-memory key/value store backing each cache namespace.

use parking_lot::Mutex;
use std::any::Any;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct CacheOptions {
    /// Lifetime of an entry unless `set_with_ttl` overrides it.
    pub default_ttl: Duration,
    /// Oldest entry is evicted when inserting a new key at capacity.
    pub max_size: Option<usize>,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            default_ttl: Duration::from_secs(300),
            max_size: None,
        }
    }
}

struct CacheEntry {
    value: Arc<dyn Any + Send + Sync>,
    created_at: Instant,
    expires_at: Instant,
}

/// Thread-safe cache of arbitrary values with lazy expiry.
pub struct MemoryCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    options: CacheOptions,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl MemoryCache {
    pub fn new(options: CacheOptions) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            options,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Typed lookup. A value stored under a different type counts as a miss.
    pub fn get<T>(&self, key: &str) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let mut entries = self.entries.lock();
        let now = Instant::now();

        let expired = match entries.get(key) {
            Some(entry) => now > entry.expires_at,
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                return None;
            }
        };
        if expired {
            entries.remove(key);
            self.misses.fetch_add(1, Ordering::Relaxed);
            return None;
        }

        let value = entries
            .get(key)
            .and_then(|entry| entry.value.downcast_ref::<T>().cloned());
        match value {
            Some(_) => self.hits.fetch_add(1, Ordering::Relaxed),
            None => self.misses.fetch_add(1, Ordering::Relaxed),
        };
        value
    }

    pub fn set<T>(&self, key: impl Into<String>, value: T)
    where
        T: Send + Sync + 'static,
    {
        self.set_with_ttl(key, value, self.options.default_ttl);
    }

    pub fn set_with_ttl<T>(&self, key: impl Into<String>, value: T, ttl: Duration)
    where
        T: Send + Sync + 'static,
    {
        let key = key.into();
        let mut entries = self.entries.lock();

        if let Some(max) = self.options.max_size {
            if entries.len() >= max && !entries.contains_key(&key) {
                evict_oldest(&mut entries);
            }
        }

        let now = Instant::now();
        entries.insert(
            key,
            CacheEntry {
                value: Arc::new(value),
                created_at: now,
                expires_at: now + ttl,
            },
        );
    }

    /// Removing an absent key is a no-op.
    pub fn delete(&self, key: &str) -> bool {
        self.entries.lock().remove(key).is_some()
    }

    pub fn has(&self, key: &str) -> bool {
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some(entry) if Instant::now() > entry.expires_at => {
                entries.remove(key);
                false
            }
            Some(_) => true,
            None => false,
        }
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits.load(Ordering::Relaxed);
        let total = hits + self.misses.load(Ordering::Relaxed);
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(CacheOptions::default())
    }
}

fn evict_oldest(entries: &mut HashMap<String, CacheEntry>) {
    let oldest = entries
        .iter()
        .min_by_key(|(_, entry)| entry.created_at)
        .map(|(key, _)| key.clone());
    if let Some(key) = oldest {
        entries.remove(&key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_delete() {
        let cache = MemoryCache::default();
        cache.set("a", 42u32);

        assert_eq!(cache.get::<u32>("a"), Some(42));
        assert!(cache.has("a"));
        assert!(cache.delete("a"));
        assert!(!cache.delete("a"));
        assert_eq!(cache.get::<u32>("a"), None);
    }

    #[test]
    fn test_wrong_type_is_miss() {
        let cache = MemoryCache::default();
        cache.set("a", "text".to_string());
        assert_eq!(cache.get::<u32>("a"), None);
        assert_eq!(cache.get::<String>("a"), Some("text".to_string()));
    }

    #[test]
    fn test_expired_entries_are_dropped() {
        let cache = MemoryCache::default();
        cache.set_with_ttl("a", 1u8, Duration::from_millis(0));
        std::thread::sleep(Duration::from_millis(5));

        assert_eq!(cache.get::<u8>("a"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_max_size_evicts_oldest() {
        let cache = MemoryCache::new(CacheOptions {
            max_size: Some(2),
            ..Default::default()
        });
        cache.set("first", 1u8);
        std::thread::sleep(Duration::from_millis(2));
        cache.set("second", 2u8);
        std::thread::sleep(Duration::from_millis(2));
        cache.set("third", 3u8);

        assert_eq!(cache.len(), 2);
        assert!(!cache.has("first"));
        assert!(cache.has("second"));
        assert!(cache.has("third"));
    }

    #[test]
    fn test_overwrite_at_capacity_keeps_others() {
        let cache = MemoryCache::new(CacheOptions {
            max_size: Some(2),
            ..Default::default()
        });
        cache.set("a", 1u8);
        cache.set("b", 2u8);
        cache.set("a", 3u8);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get::<u8>("a"), Some(3));
        assert_eq!(cache.get::<u8>("b"), Some(2));
    }

    #[test]
    fn test_hit_rate() {
        let cache = MemoryCache::default();
        cache.set("a", 1u8);
        let _ = cache.get::<u8>("a");
        let _ = cache.get::<u8>("missing");
        assert!((cache.hit_rate() - 0.5).abs() < f64::EPSILON);
    }
}
