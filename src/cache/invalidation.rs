use super::manager::CacheManager;
use super::{cache_key, parent_key, AGENTS, DIRECTORIES, FILESYSTEM};
use crate::filesystem::FileEvent;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Evicts cache entries made stale by a filesystem event.
///
/// Every step runs for every event and deleting an absent key is a no-op, so
/// duplicate or reordered watcher events are harmless. No debouncing here.
#[derive(Clone)]
pub struct CacheInvalidationStrategy {
    caches: Arc<CacheManager>,
}

impl CacheInvalidationStrategy {
    pub fn new(caches: Arc<CacheManager>) -> Self {
        Self { caches }
    }

    pub fn handle_file_system_event(&self, event: &FileEvent) {
        debug!(path = %event.path.display(), kind = event.kind.as_str(), "invalidating caches");

        if is_agent_file(&event.path) {
            self.invalidate_agent(&event.path);
        }

        self.invalidate_path(FILESYSTEM, &event.path);

        if event.kind.is_structural() {
            self.invalidate_path(DIRECTORIES, &event.path);
        }
    }

    fn invalidate_agent(&self, path: &Path) {
        let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
            return;
        };
        if let Some(cache) = self.caches.cache(AGENTS) {
            cache.delete(name);
            debug!(agent = name, "agent cache invalidated");
        }
    }

    /// Drop the entry for `path` and for its parent, one level up only.
    fn invalidate_path(&self, namespace: &str, path: &Path) {
        let Some(cache) = self.caches.cache(namespace) else {
            return;
        };
        cache.delete(&cache_key(path));
        if let Some(parent) = parent_key(path) {
            cache.delete(&parent);
        }
    }
}

/// `<...>/.amazonq/cli-agents/<name>.json` or `<...>/amazonq/cli-agents/<name>.json`.
///
/// Only direct children of `cli-agents` count: agents are never loaded from
/// subdirectories and the watcher is non-recursive.
pub fn is_agent_file(path: &Path) -> bool {
    if path.extension().and_then(|e| e.to_str()) != Some("json") {
        return false;
    }
    let Some(dir) = path.parent() else {
        return false;
    };
    let dir_name = dir.file_name().and_then(|n| n.to_str());
    let parent_name = dir
        .parent()
        .and_then(|p| p.file_name())
        .and_then(|n| n.to_str());
    dir_name == Some("cli-agents") && matches!(parent_name, Some(".amazonq") | Some("amazonq"))
}
