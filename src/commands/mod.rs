pub mod agent;
pub mod catalog;
pub mod config;
pub mod context;
pub mod promptz;
pub mod watch;

use crate::agents::form::RefreshListener;
use crate::agents::{AgentCreationFormService, AgentLocation, AgentLocationService, AgentStore};
use crate::cache::{CacheManager, AGENTS, DIRECTORIES};
use crate::cli::Commands;
use crate::config::Config;
use crate::error::Result;
use crate::filesystem::{CachedFileSystem, FileSystem, StdFileSystem};
use std::path::PathBuf;
use std::sync::Arc;

/// Services shared by every command for one invocation.
pub struct App {
    pub config: Config,
    pub caches: Arc<CacheManager>,
    pub fs: Arc<dyn FileSystem>,
    pub store: AgentStore,
}

impl App {
    pub fn new(config: Config, workspace: Option<PathBuf>, home: PathBuf) -> Self {
        let caches = Arc::new(CacheManager::with_default_namespaces(config.cache_options()));
        let fs: Arc<dyn FileSystem> =
            Arc::new(CachedFileSystem::new(Arc::new(StdFileSystem), caches.clone()));
        let locations = AgentLocationService::new(fs.clone(), workspace, home);
        let store = AgentStore::new(fs.clone(), locations, caches.clone());
        Self {
            config,
            caches,
            fs,
            store,
        }
    }

    pub fn locations(&self) -> &AgentLocationService {
        self.store.locations()
    }

    pub fn form_service(&self) -> AgentCreationFormService {
        AgentCreationFormService::new(
            self.fs.clone(),
            self.locations().clone(),
            Arc::new(ReloadListings(self.caches.clone())),
        )
    }

    /// `--global` wins, otherwise the configured default.
    pub fn location(&self, global: bool) -> AgentLocation {
        if global {
            AgentLocation::Global
        } else {
            self.config.agents.default_location
        }
    }
}

/// Drops cached agents and directory listings so the next listing rereads disk.
struct ReloadListings(Arc<CacheManager>);

impl RefreshListener for ReloadListings {
    fn refresh(&self) {
        self.0.invalidate_cache(AGENTS);
        self.0.invalidate_cache(DIRECTORIES);
    }
}

pub fn execute(app: &App, command: &Commands) -> Result<()> {
    match command {
        Commands::Agent { command } => agent::execute(app, command),
        Commands::Context { command } => context::execute(app, command),
        Commands::Templates => catalog::templates(),
        Commands::Tools => catalog::tools(),
        Commands::Hooks { category } => catalog::hooks(category.as_deref()),
        Commands::Watch => watch::execute(app),
        Commands::Promptz { command } => promptz::execute(app, command),
        Commands::Config { command } => config::execute(app, command),
    }
}
