//! Where agent files live: per-workspace ("local") and per-user ("global").

use super::definition::is_valid_agent_name;
use crate::error::{QcliAgentsError, Result};
use crate::filesystem::FileSystem;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AgentLocation {
    #[default]
    Local,
    Global,
}

impl AgentLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentLocation::Local => "local",
            AgentLocation::Global => "global",
        }
    }
}

impl fmt::Display for AgentLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendedAction {
    UseLocal,
    UseGlobal,
    Rename,
}

impl RecommendedAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendedAction::UseLocal => "use_local",
            RecommendedAction::UseGlobal => "use_global",
            RecommendedAction::Rename => "rename",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentConflictInfo {
    pub has_conflict: bool,
    pub local_exists: bool,
    pub global_exists: bool,
    pub recommended_action: RecommendedAction,
}

impl AgentConflictInfo {
    /// Local always wins when both files exist.
    pub fn effective_location(&self) -> Option<AgentLocation> {
        if self.local_exists {
            Some(AgentLocation::Local)
        } else if self.global_exists {
            Some(AgentLocation::Global)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentsByLocation {
    pub local: Vec<String>,
    pub global: Vec<String>,
}

/// Resolves agent directories and files. Holds no cache of its own; pass a
/// cached [`FileSystem`] to memoize probes.
#[derive(Clone)]
pub struct AgentLocationService {
    fs: Arc<dyn FileSystem>,
    workspace_root: Option<PathBuf>,
    home_dir: PathBuf,
}

impl AgentLocationService {
    pub fn new(fs: Arc<dyn FileSystem>, workspace_root: Option<PathBuf>, home_dir: PathBuf) -> Self {
        Self {
            fs,
            workspace_root,
            home_dir,
        }
    }

    pub fn has_workspace(&self) -> bool {
        self.workspace_root.is_some()
    }

    pub fn workspace_root(&self) -> Option<&Path> {
        self.workspace_root.as_deref()
    }

    pub fn home_dir(&self) -> &Path {
        &self.home_dir
    }

    /// `<workspace>/.amazonq/cli-agents`
    pub fn local_agents_path(&self) -> Result<PathBuf> {
        let root = self
            .workspace_root
            .as_ref()
            .ok_or(QcliAgentsError::NoWorkspace)?;
        Ok(root.join(".amazonq").join("cli-agents"))
    }

    /// `<home>/.aws/amazonq/cli-agents`
    pub fn global_agents_path(&self) -> PathBuf {
        self.home_dir.join(".aws").join("amazonq").join("cli-agents")
    }

    pub fn agents_path(&self, location: AgentLocation) -> Result<PathBuf> {
        match location {
            AgentLocation::Local => self.local_agents_path(),
            AgentLocation::Global => Ok(self.global_agents_path()),
        }
    }

    /// Directories that exist or may exist for this workspace, local first.
    pub fn agent_dirs(&self) -> Vec<PathBuf> {
        let mut dirs = Vec::new();
        if let Ok(local) = self.local_agents_path() {
            dirs.push(local);
        }
        dirs.push(self.global_agents_path());
        dirs
    }

    /// `<agents dir>/<name>.json`. Names outside `[A-Za-z0-9_-]+` are rejected
    /// before any path is built.
    pub fn resolve_agent_path(&self, name: &str, location: AgentLocation) -> Result<PathBuf> {
        if !is_valid_agent_name(name) {
            return Err(QcliAgentsError::InvalidAgentName(name.to_string()));
        }
        Ok(self.agents_path(location)?.join(format!("{}.json", name)))
    }

    /// Create the location's directory if missing. Safe to call repeatedly.
    pub fn ensure_directory_exists(&self, location: AgentLocation) -> Result<PathBuf> {
        let dir = self.agents_path(location)?;
        if !self.fs.exists(&dir) {
            self.fs.create_dir_all(&dir)?;
        }
        Ok(dir)
    }

    /// Probe both locations; each probe always runs.
    pub fn detect_name_conflicts(&self, name: &str) -> AgentConflictInfo {
        let local_exists = self.agent_exists(name, AgentLocation::Local);
        let global_exists = self.agent_exists(name, AgentLocation::Global);

        let recommended_action = match (local_exists, global_exists) {
            (true, _) => RecommendedAction::UseLocal,
            (false, true) => RecommendedAction::UseGlobal,
            (false, false) => RecommendedAction::Rename,
        };

        AgentConflictInfo {
            has_conflict: local_exists && global_exists,
            local_exists,
            global_exists,
            recommended_action,
        }
    }

    pub fn agent_exists(&self, name: &str, location: AgentLocation) -> bool {
        self.resolve_agent_path(name, location)
            .map(|path| self.fs.exists(&path))
            .unwrap_or(false)
    }

    /// Agent names per location. A missing directory (or workspace) yields an
    /// empty list for that location only.
    pub fn list_agents_by_location(&self) -> AgentsByLocation {
        let local = self
            .local_agents_path()
            .map(|dir| self.agents_in_directory(&dir))
            .unwrap_or_default();
        let global = self.agents_in_directory(&self.global_agents_path());
        AgentsByLocation { local, global }
    }

    fn agents_in_directory(&self, dir: &Path) -> Vec<String> {
        let Ok(entries) = self.fs.read_dir(dir) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .iter()
            .filter(|entry| !entry.starts_with('.'))
            .filter_map(|entry| entry.strip_suffix(".json"))
            .filter(|stem| is_valid_agent_name(stem))
            .map(str::to_string)
            .collect();
        names.sort();
        names
    }
}
