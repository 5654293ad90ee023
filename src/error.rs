use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QcliAgentsError {
    #[error("No workspace folder found")]
    NoWorkspace,

    #[error("Agent name is required")]
    AgentNameRequired,

    #[error("Invalid agent: {}", .0.join(", "))]
    InvalidAgent(Vec<String>),

    #[error("Agent \"{0}\" already exists")]
    AgentExists(String),

    #[error("Invalid agent name \"{0}\": only letters, numbers, hyphens, and underscores are allowed")]
    InvalidAgentName(String),

    #[error("Agent \"{0}\" not found")]
    AgentNotFound(String),

    #[error("Invalid agent form: {0}")]
    InvalidForm(String),

    #[error("Invalid context item: {0}")]
    InvalidContext(String),

    #[error("Failed to parse {path}: {source}")]
    AgentParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File watcher error: {0}")]
    Watch(#[from] notify::Error),

    #[error("PromptZ API URL and API Key must be configured. Set [promptz] api_url and api_key in ~/.qcli-agents.toml or QCLI_AGENTS_PROMPTZ_API_URL / QCLI_AGENTS_PROMPTZ_API_KEY")]
    PromptzNotConfigured,

    #[error("PromptZ error: {0}")]
    Promptz(String),
}

impl From<reqwest::Error> for QcliAgentsError {
    fn from(err: reqwest::Error) -> Self {
        QcliAgentsError::Promptz(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, QcliAgentsError>;
