//! Agent configuration records as persisted in `<name>.json` files.

use crate::error::{QcliAgentsError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Schema URI written by [`Agent::create`].
pub const DEFAULT_SCHEMA: &str = "https://json.schemastore.org/amazon-q-developer-cli-agent.json";

/// Schema URI written for agents created through the creation form.
pub const AGENT_V1_SCHEMA: &str =
    "https://raw.githubusercontent.com/aws/amazon-q-developer-cli/refs/heads/main/schemas/agent-v1.json";

/// Resource URI prefix accepted for agent resources.
pub const FILE_SCHEME: &str = "file://";

fn name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("valid agent name regex"))
}

/// Agent names double as file stems, so only `[A-Za-z0-9_-]+` is accepted.
pub fn is_valid_agent_name(name: &str) -> bool {
    name_pattern().is_match(name)
}

/// Declarative configuration of one agent.
///
/// Field order matches the on-disk layout so pretty-printed files stay stable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentConfig {
    #[serde(rename = "$schema", default)]
    pub schema: String,

    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub prompt: Option<String>,

    #[serde(default)]
    pub mcp_servers: BTreeMap<String, Value>,

    #[serde(default)]
    pub tools: Vec<String>,

    #[serde(default)]
    pub tool_aliases: BTreeMap<String, String>,

    #[serde(default)]
    pub allowed_tools: Vec<String>,

    #[serde(default)]
    pub tools_settings: BTreeMap<String, Value>,

    #[serde(default)]
    pub resources: Vec<String>,

    #[serde(default)]
    pub hooks: BTreeMap<String, Value>,

    #[serde(default)]
    pub use_legacy_mcp_json: bool,
}

impl AgentConfig {
    /// Default shape for a new agent named `name`.
    pub fn default_for(name: &str) -> Self {
        Self {
            schema: DEFAULT_SCHEMA.to_string(),
            name: name.to_string(),
            description: format!("{} agent", name),
            prompt: None,
            mcp_servers: BTreeMap::new(),
            tools: Vec::new(),
            tool_aliases: BTreeMap::new(),
            allowed_tools: Vec::new(),
            tools_settings: BTreeMap::new(),
            resources: Vec::new(),
            hooks: BTreeMap::new(),
            use_legacy_mcp_json: false,
        }
    }

    /// Shallow merge: every field set in `patch` replaces the current value.
    pub fn merged(&self, patch: &AgentConfigPatch) -> Self {
        let mut next = self.clone();
        if let Some(schema) = &patch.schema {
            next.schema = schema.clone();
        }
        if let Some(name) = &patch.name {
            next.name = name.clone();
        }
        if let Some(description) = &patch.description {
            next.description = description.clone();
        }
        if let Some(prompt) = &patch.prompt {
            next.prompt = prompt.clone();
        }
        if let Some(mcp_servers) = &patch.mcp_servers {
            next.mcp_servers = mcp_servers.clone();
        }
        if let Some(tools) = &patch.tools {
            next.tools = tools.clone();
        }
        if let Some(tool_aliases) = &patch.tool_aliases {
            next.tool_aliases = tool_aliases.clone();
        }
        if let Some(allowed_tools) = &patch.allowed_tools {
            next.allowed_tools = allowed_tools.clone();
        }
        if let Some(tools_settings) = &patch.tools_settings {
            next.tools_settings = tools_settings.clone();
        }
        if let Some(resources) = &patch.resources {
            next.resources = resources.clone();
        }
        if let Some(hooks) = &patch.hooks {
            next.hooks = hooks.clone();
        }
        if let Some(legacy) = patch.use_legacy_mcp_json {
            next.use_legacy_mcp_json = legacy;
        }
        next
    }

    /// Invariants of the record itself, independent of the owning agent.
    pub fn structural_errors(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for allowed in &self.allowed_tools {
            if !self.tools.contains(allowed) {
                errors.push(format!("Allowed tool \"{}\" must be in tools", allowed));
            }
        }

        for (index, resource) in self.resources.iter().enumerate() {
            if !resource.is_empty() && !resource.starts_with(FILE_SCHEME) {
                errors.push(format!(
                    "Resource {} must start with \"{}\"",
                    index + 1,
                    FILE_SCHEME
                ));
            }
        }

        errors
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Partial update of an [`AgentConfig`]; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgentConfigPatch {
    pub schema: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub prompt: Option<Option<String>>,
    pub mcp_servers: Option<BTreeMap<String, Value>>,
    pub tools: Option<Vec<String>>,
    pub tool_aliases: Option<BTreeMap<String, String>>,
    pub allowed_tools: Option<Vec<String>>,
    pub tools_settings: Option<BTreeMap<String, Value>>,
    pub resources: Option<Vec<String>>,
    pub hooks: Option<BTreeMap<String, Value>>,
    pub use_legacy_mcp_json: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

/// An agent loaded from (or destined for) a JSON file.
///
/// Agents are immutable; updates produce a new value. The file on disk is the
/// source of truth and an `Agent` is stale once the file changes.
#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    name: String,
    config: AgentConfig,
    file_path: PathBuf,
}

impl Agent {
    pub fn new(name: impl Into<String>, config: AgentConfig, file_path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            config,
            file_path: file_path.into(),
        }
    }

    /// Build an agent from the default config with `overrides` applied.
    ///
    /// An empty name fails with the bare "Agent name is required" message;
    /// any other validation failure is wrapped as "Invalid agent: ...".
    pub fn create(
        name: &str,
        file_path: impl Into<PathBuf>,
        overrides: Option<&AgentConfigPatch>,
    ) -> Result<Self> {
        if name.trim().is_empty() {
            return Err(QcliAgentsError::AgentNameRequired);
        }

        let base = AgentConfig::default_for(name);
        let mut config = match overrides {
            Some(patch) => base.merged(patch),
            None => base,
        };
        config.name = name.to_string();

        let agent = Self::new(name, config, file_path);
        let validation = agent.validate();
        if !validation.is_valid {
            return Err(QcliAgentsError::InvalidAgent(validation.errors));
        }

        Ok(agent)
    }

    /// Check the agent without touching the filesystem. All failures are reported.
    pub fn validate(&self) -> ValidationResult {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push("Agent name is required".to_string());
        }

        if self.name != self.config.name {
            errors.push("Agent name must match config name".to_string());
        }

        if self.config.description.trim().is_empty() {
            errors.push("Agent description is required".to_string());
        }

        ValidationResult::from_errors(errors)
    }

    /// Return a new agent with `patch` shallow-merged into the config.
    pub fn update_config(&self, patch: &AgentConfigPatch) -> Self {
        Self {
            name: self.name.clone(),
            config: self.config.merged(patch),
            file_path: self.file_path.clone(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }
}
