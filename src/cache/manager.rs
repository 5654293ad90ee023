use super::memory::{CacheOptions, MemoryCache};
use super::{AGENTS, DIRECTORIES, FILESYSTEM};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct CacheStats {
    pub name: String,
    pub size: usize,
    pub hit_rate: f64,
}

/// Registry of independent named caches.
///
/// Namespaces share nothing; keeping them coherent with the filesystem is the
/// job of [`CacheInvalidationStrategy`](super::CacheInvalidationStrategy).
#[derive(Default)]
pub struct CacheManager {
    caches: RwLock<BTreeMap<String, Arc<MemoryCache>>>,
}

impl CacheManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Manager with the `agents`, `filesystem` and `directories` namespaces registered.
    pub fn with_default_namespaces(options: CacheOptions) -> Self {
        let manager = Self::new();
        for name in [AGENTS, FILESYSTEM, DIRECTORIES] {
            manager.register_cache(name, Arc::new(MemoryCache::new(options.clone())));
        }
        manager
    }

    pub fn register_cache(&self, name: &str, cache: Arc<MemoryCache>) {
        self.caches.write().insert(name.to_string(), cache);
        debug!(name, "cache registered");
    }

    pub fn cache(&self, name: &str) -> Option<Arc<MemoryCache>> {
        self.caches.read().get(name).cloned()
    }

    pub fn invalidate_cache(&self, name: &str) {
        if let Some(cache) = self.cache(name) {
            cache.clear();
            debug!(name, "cache invalidated");
        }
    }

    pub fn invalidate_all(&self) {
        for cache in self.caches.read().values() {
            cache.clear();
        }
        debug!("all caches invalidated");
    }

    pub fn stats(&self) -> Vec<CacheStats> {
        self.caches
            .read()
            .iter()
            .map(|(name, cache)| CacheStats {
                name: name.clone(),
                size: cache.len(),
                hit_rate: cache.hit_rate(),
            })
            .collect()
    }
}
