use super::FileSystem;
use crate::cache::{cache_key, parent_key, CacheManager, DIRECTORIES, FILESYSTEM};
use crate::error::Result;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
struct FsEntry {
    exists: bool,
    contents: Option<Arc<str>>,
}

/// Memoizing wrapper around another [`FileSystem`].
///
/// Reads fill the `filesystem` and `directories` namespaces; writes through
/// this wrapper evict the touched path and its parent right away.
pub struct CachedFileSystem {
    inner: Arc<dyn FileSystem>,
    caches: Arc<CacheManager>,
}

impl CachedFileSystem {
    pub fn new(inner: Arc<dyn FileSystem>, caches: Arc<CacheManager>) -> Self {
        Self { inner, caches }
    }

    fn entry(&self, key: &str) -> Option<FsEntry> {
        self.caches.cache(FILESYSTEM)?.get::<FsEntry>(key)
    }

    fn store_entry(&self, key: String, entry: FsEntry) {
        if let Some(cache) = self.caches.cache(FILESYSTEM) {
            cache.set(key, entry);
        }
    }

    fn evict(&self, path: &Path) {
        for namespace in [FILESYSTEM, DIRECTORIES] {
            if let Some(cache) = self.caches.cache(namespace) {
                cache.delete(&cache_key(path));
                if let Some(parent) = parent_key(path) {
                    cache.delete(&parent);
                }
            }
        }
    }
}

impl FileSystem for CachedFileSystem {
    fn exists(&self, path: &Path) -> bool {
        let key = cache_key(path);
        if let Some(entry) = self.entry(&key) {
            return entry.exists;
        }
        let exists = self.inner.exists(path);
        self.store_entry(
            key,
            FsEntry {
                exists,
                contents: None,
            },
        );
        exists
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<String>> {
        let key = cache_key(path);
        let cache = self.caches.cache(DIRECTORIES);
        if let Some(names) = cache.as_ref().and_then(|c| c.get::<Vec<String>>(&key)) {
            return Ok(names);
        }
        let names = self.inner.read_dir(path)?;
        if let Some(cache) = cache {
            cache.set(key, names.clone());
        }
        Ok(names)
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        self.inner.create_dir_all(path)?;
        self.evict(path);
        Ok(())
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        let key = cache_key(path);
        if let Some(FsEntry {
            contents: Some(contents),
            ..
        }) = self.entry(&key)
        {
            return Ok(contents.to_string());
        }
        let contents = self.inner.read_to_string(path)?;
        self.store_entry(
            key,
            FsEntry {
                exists: true,
                contents: Some(Arc::from(contents.as_str())),
            },
        );
        Ok(contents)
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        self.inner.write(path, contents)?;
        self.evict(path);
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        self.inner.remove_file(path)?;
        self.evict(path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheInvalidationStrategy, CacheOptions};
    use crate::filesystem::{FileEvent, FileEventKind, StdFileSystem};
    use std::fs;
    use tempfile::TempDir;

    fn cached() -> (Arc<CacheManager>, CachedFileSystem) {
        let caches = Arc::new(CacheManager::with_default_namespaces(CacheOptions::default()));
        let fs = CachedFileSystem::new(Arc::new(StdFileSystem), caches.clone());
        (caches, fs)
    }

    #[test]
    fn test_read_is_served_from_cache_until_invalidated() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("agent.json");
        fs::write(&file, "one").unwrap();

        let (caches, cached_fs) = cached();
        assert_eq!(cached_fs.read_to_string(&file).unwrap(), "one");

        // External rewrite is not visible until the watcher event arrives.
        fs::write(&file, "two").unwrap();
        assert_eq!(cached_fs.read_to_string(&file).unwrap(), "one");

        CacheInvalidationStrategy::new(caches)
            .handle_file_system_event(&FileEvent::new(&file, FileEventKind::Changed));
        assert_eq!(cached_fs.read_to_string(&file).unwrap(), "two");
    }

    #[test]
    fn test_own_writes_evict_immediately() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.json");

        let (_caches, cached_fs) = cached();
        assert!(!cached_fs.exists(&file));
        assert!(cached_fs.read_dir(dir.path()).unwrap().is_empty());

        cached_fs.write(&file, "{}").unwrap();
        assert!(cached_fs.exists(&file));
        assert_eq!(cached_fs.read_dir(dir.path()).unwrap(), vec!["a.json"]);
    }

    #[test]
    fn test_directory_listing_cached_until_structural_event() {
        let dir = TempDir::new().unwrap();
        let (caches, cached_fs) = cached();
        assert!(cached_fs.read_dir(dir.path()).unwrap().is_empty());

        let file = dir.path().join("new.json");
        fs::write(&file, "{}").unwrap();
        let strategy = CacheInvalidationStrategy::new(caches);

        strategy.handle_file_system_event(&FileEvent::new(&file, FileEventKind::Changed));
        assert!(cached_fs.read_dir(dir.path()).unwrap().is_empty());

        strategy.handle_file_system_event(&FileEvent::new(&file, FileEventKind::Created));
        assert_eq!(cached_fs.read_dir(dir.path()).unwrap(), vec!["new.json"]);
    }
}
