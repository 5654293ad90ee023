use crate::agents::AgentLocation;
use crate::cache::CacheOptions;
use crate::cli::Cli;
use crate::error::{QcliAgentsError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILE_NAME: &str = ".qcli-agents.toml";

pub const ENV_PROMPTZ_API_URL: &str = "QCLI_AGENTS_PROMPTZ_API_URL";
pub const ENV_PROMPTZ_API_KEY: &str = "QCLI_AGENTS_PROMPTZ_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub promptz: PromptzConfig,

    #[serde(default)]
    pub agents: AgentsConfig,

    /// Verbose logging (not stored in config file)
    #[serde(skip)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            max_entries: default_max_entries(),
        }
    }
}

fn default_ttl_secs() -> u64 {
    300
}

fn default_max_entries() -> usize {
    1000
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptzConfig {
    #[serde(default)]
    pub api_url: String,

    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for PromptzConfig {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            api_key: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl PromptzConfig {
    pub fn is_configured(&self) -> bool {
        !self.api_url.is_empty() && !self.api_key.is_empty()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AgentsConfig {
    /// Location used by `agent create` and `agent new` without `--global`
    #[serde(default)]
    pub default_location: AgentLocation,
}

impl Config {
    /// Load configuration with precedence:
    /// CLI flags > environment > workspace file > global file > defaults
    pub fn load(home: Option<&Path>, workspace: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();

        // 1. Global config
        if let Some(global) = home.map(global_config_path) {
            if global.exists() {
                config = config.merge(Self::from_file(&global)?);
            }
        }

        // 2. Workspace config
        if let Some(local) = workspace.map(workspace_config_path) {
            if local.exists() {
                config = config.merge(Self::from_file(&local)?);
            }
        }

        // 3. Environment
        config = config.merge_env();

        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Merge another config into this one; values that differ from the
    /// defaults in `other` win.
    fn merge(mut self, other: Self) -> Self {
        if other.cache.ttl_secs != default_ttl_secs() {
            self.cache.ttl_secs = other.cache.ttl_secs;
        }
        if other.cache.max_entries != default_max_entries() {
            self.cache.max_entries = other.cache.max_entries;
        }

        if !other.promptz.api_url.is_empty() {
            self.promptz.api_url = other.promptz.api_url;
        }
        if !other.promptz.api_key.is_empty() {
            self.promptz.api_key = other.promptz.api_key;
        }
        if other.promptz.timeout_secs != default_timeout_secs() {
            self.promptz.timeout_secs = other.promptz.timeout_secs;
        }

        if other.agents.default_location != AgentLocation::default() {
            self.agents.default_location = other.agents.default_location;
        }

        self
    }

    fn merge_env(mut self) -> Self {
        if let Ok(url) = std::env::var(ENV_PROMPTZ_API_URL) {
            if !url.is_empty() {
                self.promptz.api_url = url;
            }
        }
        if let Ok(key) = std::env::var(ENV_PROMPTZ_API_KEY) {
            if !key.is_empty() {
                self.promptz.api_key = key;
            }
        }
        self
    }

    /// Apply CLI overrides (highest precedence)
    pub fn with_cli_overrides(mut self, cli: &Cli) -> Self {
        self.verbose = cli.verbose;
        self
    }

    /// Semantic checks that TOML parsing cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.cache.ttl_secs == 0 {
            return Err(QcliAgentsError::InvalidConfig(
                "cache.ttl_secs must be greater than 0".to_string(),
            ));
        }
        if self.cache.max_entries == 0 {
            return Err(QcliAgentsError::InvalidConfig(
                "cache.max_entries must be greater than 0".to_string(),
            ));
        }
        let url = &self.promptz.api_url;
        if !url.is_empty() && !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(QcliAgentsError::InvalidConfig(format!(
                "Invalid PromptZ API URL format: {}",
                url
            )));
        }
        Ok(())
    }

    pub fn cache_options(&self) -> CacheOptions {
        CacheOptions {
            default_ttl: Duration::from_secs(self.cache.ttl_secs),
            max_size: Some(self.cache.max_entries),
        }
    }

    /// Copy safe to print: the API key is masked.
    pub fn masked(&self) -> Self {
        let mut config = self.clone();
        config.promptz.api_key = mask_secret(&config.promptz.api_key);
        config
    }
}

pub fn global_config_path(home: &Path) -> PathBuf {
    home.join(CONFIG_FILE_NAME)
}

pub fn workspace_config_path(workspace: &Path) -> PathBuf {
    workspace.join(CONFIG_FILE_NAME)
}

fn mask_secret(secret: &str) -> String {
    let count = secret.chars().count();
    if count == 0 {
        String::new()
    } else if count <= 4 {
        "*".repeat(count)
    } else {
        let tail: String = secret.chars().skip(count - 4).collect();
        format!("{}{}", "*".repeat(count - 4), tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.cache.ttl_secs, 300);
        assert_eq!(config.cache.max_entries, 1000);
        assert_eq!(config.promptz.timeout_secs, 30);
        assert_eq!(config.agents.default_location, AgentLocation::Local);
        assert!(!config.promptz.is_configured());
    }

    #[test]
    fn test_merge_config() {
        let base = Config::default();
        let mut other = Config::default();
        other.cache.ttl_secs = 60;
        other.promptz.api_url = "https://api.example.com/graphql".to_string();

        let merged = base.merge(other);
        assert_eq!(merged.cache.ttl_secs, 60);
        assert_eq!(merged.cache.max_entries, 1000);
        assert_eq!(merged.promptz.api_url, "https://api.example.com/graphql");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [agents]
            default_location = "global"

            [promptz]
            api_key = "secret"
            "#,
        )
        .unwrap();
        assert_eq!(config.agents.default_location, AgentLocation::Global);
        assert_eq!(config.cache.ttl_secs, 300);
        assert_eq!(config.promptz.timeout_secs, 30);
    }

    #[test]
    #[serial]
    fn test_load_precedence() {
        let home = TempDir::new().unwrap();
        let ws = TempDir::new().unwrap();
        std::fs::write(
            global_config_path(home.path()),
            "[cache]\nttl_secs = 10\nmax_entries = 5\n[promptz]\napi_url = \"https://global\"\n",
        )
        .unwrap();
        std::fs::write(
            workspace_config_path(ws.path()),
            "[cache]\nttl_secs = 20\n",
        )
        .unwrap();
        std::env::set_var(ENV_PROMPTZ_API_URL, "https://env");

        let config = Config::load(Some(home.path()), Some(ws.path())).unwrap();
        std::env::remove_var(ENV_PROMPTZ_API_URL);

        assert_eq!(config.cache.ttl_secs, 20);
        assert_eq!(config.cache.max_entries, 5);
        assert_eq!(config.promptz.api_url, "https://env");
    }

    #[test]
    #[serial]
    fn test_load_reports_parse_errors() {
        let home = TempDir::new().unwrap();
        std::fs::write(global_config_path(home.path()), "[cache\nttl_secs = ").unwrap();
        let err = Config::load(Some(home.path()), None).unwrap_err();
        assert!(matches!(err, QcliAgentsError::ConfigParse(_)));
    }

    #[test]
    fn test_validate() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.promptz.api_url = "ftp://nope".to_string();
        assert!(config.validate().is_err());

        config.promptz.api_url = "https://ok".to_string();
        config.cache.ttl_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_masked() {
        let mut config = Config::default();
        config.promptz.api_key = "abcdefgh1234".to_string();
        assert_eq!(config.masked().promptz.api_key, "********1234");
        assert_eq!(mask_secret("abc"), "***");
        assert_eq!(mask_secret(""), "");
    }
}
