//! Loading and saving agent files with local-over-global resolution.

use super::definition::{is_valid_agent_name, Agent, AgentConfig};
use super::location::{AgentLocation, AgentLocationService};
use crate::cache::{CacheManager, AGENTS};
use crate::error::{QcliAgentsError, Result};
use crate::filesystem::FileSystem;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// One row of [`AgentStore::list`].
#[derive(Debug, Clone, PartialEq)]
pub struct AgentEntry {
    pub name: String,
    pub location: AgentLocation,
    pub has_conflict: bool,
}

pub struct AgentStore {
    fs: Arc<dyn FileSystem>,
    locations: AgentLocationService,
    caches: Arc<CacheManager>,
}

impl AgentStore {
    pub fn new(fs: Arc<dyn FileSystem>, locations: AgentLocationService, caches: Arc<CacheManager>) -> Self {
        Self {
            fs,
            locations,
            caches,
        }
    }

    pub fn locations(&self) -> &AgentLocationService {
        &self.locations
    }

    /// Effective agent for `name`: the local file when present, else the global one.
    pub fn load(&self, name: &str) -> Result<Arc<Agent>> {
        if !is_valid_agent_name(name) {
            return Err(QcliAgentsError::InvalidAgentName(name.to_string()));
        }
        let cache = self.caches.cache(AGENTS);
        if let Some(agent) = cache.as_ref().and_then(|c| c.get::<Arc<Agent>>(name)) {
            return Ok(agent);
        }

        let location = self
            .locations
            .detect_name_conflicts(name)
            .effective_location()
            .ok_or_else(|| QcliAgentsError::AgentNotFound(name.to_string()))?;

        let agent = Arc::new(self.load_from(name, location)?);
        if let Some(cache) = cache {
            cache.set(name, agent.clone());
        }
        Ok(agent)
    }

    /// Read the agent file at a specific location, bypassing the cache.
    pub fn load_from(&self, name: &str, location: AgentLocation) -> Result<Agent> {
        let path = self.locations.resolve_agent_path(name, location)?;
        if !self.fs.exists(&path) {
            return Err(QcliAgentsError::AgentNotFound(name.to_string()));
        }
        debug!(agent = name, path = %path.display(), "loading agent");
        read_agent(self.fs.as_ref(), name, &path)
    }

    /// Every distinct agent name with its effective location, sorted by name.
    pub fn list(&self) -> Vec<AgentEntry> {
        let by_location = self.locations.list_agents_by_location();
        let local: BTreeSet<&String> = by_location.local.iter().collect();
        let global: BTreeSet<&String> = by_location.global.iter().collect();

        local
            .union(&global)
            .map(|name| {
                let in_local = local.contains(name);
                AgentEntry {
                    name: name.to_string(),
                    location: if in_local {
                        AgentLocation::Local
                    } else {
                        AgentLocation::Global
                    },
                    has_conflict: in_local && global.contains(name),
                }
            })
            .collect()
    }

    /// Agents that parse, skipping broken files with a warning.
    pub fn load_all(&self) -> Vec<Arc<Agent>> {
        self.list()
            .into_iter()
            .filter_map(|entry| match self.load(&entry.name) {
                Ok(agent) => Some(agent),
                Err(e) => {
                    warn!(agent = %entry.name, "skipping agent: {}", e);
                    None
                }
            })
            .collect()
    }

    /// Write `agent` to its own file path as pretty JSON.
    pub fn save(&self, agent: &Agent) -> Result<()> {
        if let Some(parent) = agent.file_path().parent() {
            self.fs.create_dir_all(parent)?;
        }
        self.fs
            .write(agent.file_path(), &agent.config().to_json_pretty()?)?;
        self.evict(agent.name());
        Ok(())
    }

    pub fn delete(&self, name: &str, location: AgentLocation) -> Result<()> {
        let path = self.locations.resolve_agent_path(name, location)?;
        if !self.fs.exists(&path) {
            return Err(QcliAgentsError::AgentNotFound(name.to_string()));
        }
        self.fs.remove_file(&path)?;
        self.evict(name);
        Ok(())
    }

    fn evict(&self, name: &str) {
        if let Some(cache) = self.caches.cache(AGENTS) {
            cache.delete(name);
        }
    }
}

fn read_agent(fs: &dyn FileSystem, name: &str, path: &Path) -> Result<Agent> {
    let text = fs.read_to_string(path)?;
    let config: AgentConfig =
        serde_json::from_str(&text).map_err(|source| QcliAgentsError::AgentParse {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(Agent::new(name, config, path))
}
