//! Named caches kept coherent with the filesystem.
//!
//! Three namespaces are used:
//! - `agents`: parsed [`Agent`](crate::agents::Agent) values keyed by agent name
//! - `filesystem`: existence and contents keyed by path
//! - `directories`: directory listings keyed by path
//!
//! Path keys always go through [`cache_key`] so the code that fills a cache
//! and the code that invalidates it agree on the key.

pub mod invalidation;
pub mod manager;
pub mod memory;

use std::path::Path;

pub use invalidation::CacheInvalidationStrategy;
pub use manager::{CacheManager, CacheStats};
pub use memory::{CacheOptions, MemoryCache};

pub const AGENTS: &str = "agents";
pub const FILESYSTEM: &str = "filesystem";
pub const DIRECTORIES: &str = "directories";

/// Canonical cache key for a filesystem path.
///
/// Trailing separators are dropped so `/a/b/` and `/a/b` share a key.
pub fn cache_key(path: &Path) -> String {
    let text = path.to_string_lossy();
    let trimmed = text.trim_end_matches(['/', '\\']);
    if trimmed.is_empty() {
        text.into_owned()
    } else {
        trimmed.to_string()
    }
}

/// Parent used for one-level upward invalidation; `None` for roots.
pub fn parent_key(path: &Path) -> Option<String> {
    let parent = path.parent()?;
    if parent.as_os_str().is_empty() || parent.parent().is_none() {
        return None;
    }
    Some(cache_key(parent))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_trims_trailing_separator() {
        assert_eq!(cache_key(Path::new("/ws/.amazonq/")), "/ws/.amazonq");
        assert_eq!(cache_key(Path::new("/ws/a.json")), "/ws/a.json");
        assert_eq!(cache_key(Path::new("/")), "/");
    }

    #[test]
    fn test_parent_key() {
        assert_eq!(
            parent_key(Path::new("/ws/.amazonq/cli-agents/foo.json")),
            Some("/ws/.amazonq/cli-agents".to_string())
        );
        assert_eq!(parent_key(Path::new("/foo")), None);
        assert_eq!(parent_key(Path::new("foo")), None);
        assert_eq!(parent_key(Path::new("/")), None);
    }
}
