use crate::error::Result;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// How the workspace root was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkspaceSource {
    Explicit,
    Git,
    CurrentDir,
}

#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
    source: WorkspaceSource,
}

impl Workspace {
    /// Use `dir` as the workspace root.
    pub fn at(dir: &Path) -> Result<Self> {
        let root = dir.canonicalize()?;
        Ok(Self {
            root,
            source: WorkspaceSource::Explicit,
        })
    }

    /// Detect the workspace for the current directory.
    /// Priority: git top-level (worktree root when inside one), then current directory.
    pub fn detect() -> Result<Self> {
        if let Some(root) = git_toplevel() {
            debug!(root = %root.display(), "workspace from git");
            return Ok(Self {
                root,
                source: WorkspaceSource::Git,
            });
        }

        let root = std::env::current_dir()?;
        debug!(root = %root.display(), "workspace from current directory");
        Ok(Self {
            root,
            source: WorkspaceSource::CurrentDir,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn source(&self) -> WorkspaceSource {
        self.source
    }

    /// Display name, the last path component.
    pub fn name(&self) -> String {
        self.root
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.root.display().to_string())
    }
}

fn git_toplevel() -> Option<PathBuf> {
    let output = Command::new("git")
        .args(["rev-parse", "--show-toplevel"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let root = String::from_utf8_lossy(&output.stdout).trim().to_string();
    PathBuf::from(root).canonicalize().ok()
}
