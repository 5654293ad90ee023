//! Filesystem access used by the agent services.
//!
//! Services take an `Arc<dyn FileSystem>` so the same code runs against the
//! real disk, the cached wrapper, or a test double.

pub mod cached;
pub mod watcher;

use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

pub use cached::CachedFileSystem;
pub use watcher::AgentWatcher;

pub trait FileSystem: Send + Sync {
    /// Non-throwing existence probe.
    fn exists(&self, path: &Path) -> bool;

    /// Entry names (not full paths) of a directory.
    fn read_dir(&self, path: &Path) -> Result<Vec<String>>;

    /// Recursive directory creation; succeeds when the directory already exists.
    fn create_dir_all(&self, path: &Path) -> Result<()>;

    fn read_to_string(&self, path: &Path) -> Result<String>;

    fn write(&self, path: &Path, contents: &str) -> Result<()>;

    fn remove_file(&self, path: &Path) -> Result<()>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StdFileSystem;

impl FileSystem for StdFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            names.push(entry.file_name().to_string_lossy().to_string());
        }
        names.sort();
        Ok(names)
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path)?;
        Ok(())
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        Ok(fs::read_to_string(path)?)
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        fs::write(path, contents)?;
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        fs::remove_file(path)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileEventKind {
    Created,
    Changed,
    Deleted,
}

impl FileEventKind {
    /// Created and deleted entries change directory listings; edits do not.
    pub fn is_structural(&self) -> bool {
        matches!(self, FileEventKind::Created | FileEventKind::Deleted)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileEventKind::Created => "created",
            FileEventKind::Changed => "changed",
            FileEventKind::Deleted => "deleted",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEvent {
    pub path: PathBuf,
    pub kind: FileEventKind,
}

impl FileEvent {
    pub fn new(path: impl Into<PathBuf>, kind: FileEventKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}
