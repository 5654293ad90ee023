use super::{PromptzItem, PromptzItemType};
use crate::agents::definition::{Agent, AgentConfig};
use crate::agents::{AgentLocation, AgentStore};
use crate::error::{QcliAgentsError, Result};
use crate::filesystem::FileSystem;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

const DEFAULT_SYNCED_TOOLS: &[&str] = &["fs_read", "fs_write", "execute_bash"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    pub kind: PromptzItemType,
    pub name: String,
    pub path: PathBuf,
}

/// Lowercase, with every run of characters outside `[a-z0-9]` collapsed to `-`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_was_dash = false;
    for c in name.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            slug.push(c);
            last_was_dash = false;
        } else if !last_was_dash {
            slug.push('-');
            last_was_dash = true;
        }
    }
    slug
}

/// File stem for an item: its slugged name, else its slugged id.
pub fn item_slug(item: &PromptzItem) -> String {
    let slug = slugify(&item.name);
    if slug.is_empty() {
        slugify(&item.id)
    } else {
        slug
    }
}

/// Object fields may arrive as real JSON or as a JSON-encoded string.
fn object_field<T: DeserializeOwned>(data: &Value, key: &str) -> Option<T> {
    let value = data.get(key)?;
    match value {
        Value::Null => None,
        Value::String(text) => serde_json::from_str(text).ok(),
        other => serde_json::from_value(other.clone()).ok(),
    }
}

fn string_list(data: &Value, key: &str) -> Option<Vec<String>> {
    let items = data.get(key)?.as_array()?;
    Some(
        items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
    )
}

/// Map a remote agent record onto the default agent shape.
///
/// `content` is the full body from the API. When it is not JSON it is used
/// as the prompt.
pub fn agent_config_from_item(item: &PromptzItem, content: &str) -> AgentConfig {
    let name = item_slug(item);
    let data: Value = serde_json::from_str(content).unwrap_or(Value::Null);
    let parsed = data.is_object();

    let mut config = AgentConfig::default_for(&name);
    config.description = format!("Synced from PromptZ {}: {}", item.kind, item.name);

    let prompt = data.get("prompt").and_then(Value::as_str).filter(|p| !p.is_empty());
    config.prompt = match prompt {
        Some(prompt) => Some(prompt.to_string()),
        None if !parsed && !content.is_empty() => Some(content.to_string()),
        None if !item.content.is_empty() => Some(item.content.clone()),
        None => None,
    };

    config.tools = string_list(&data, "tools")
        .unwrap_or_else(|| DEFAULT_SYNCED_TOOLS.iter().map(|t| t.to_string()).collect());
    config.resources = string_list(&data, "resources").unwrap_or_default();
    if let Some(allowed) = string_list(&data, "allowedTools") {
        config.allowed_tools = allowed;
    }
    if let Some(mcp_servers) = object_field(&data, "mcpServers") {
        config.mcp_servers = mcp_servers;
    }
    if let Some(hooks) = object_field(&data, "hooks") {
        config.hooks = hooks;
    }
    if let Some(tools_settings) = object_field(&data, "toolsSettings") {
        config.tools_settings = tools_settings;
    }
    if let Some(tool_aliases) = object_field(&data, "toolAliases") {
        config.tool_aliases = tool_aliases;
    }
    if let Some(legacy) = data.get("useLegacyMcpJson").and_then(Value::as_bool) {
        config.use_legacy_mcp_json = legacy;
    }

    config
}

pub fn render_rule_markdown(item: &PromptzItem, content: &str, synced_at: DateTime<Utc>) -> String {
    format!(
        "# {name}\n\n\
         **Type:** {kind}  \n\
         **Source:** PromptZ  \n\
         **ID:** {id}  \n\
         **Synced:** {synced}\n\n\
         ## Content\n\n\
         {content}\n\n\
         ---\n\
         *This file was automatically synced from PromptZ*\n",
        name = item.name,
        kind = item.kind.title(),
        id = item.id,
        synced = synced_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        content = content,
    )
}

/// Writes fetched PromptZ items into the workspace.
pub struct PromptzSync<'a> {
    fs: Arc<dyn FileSystem>,
    store: &'a AgentStore,
}

impl<'a> PromptzSync<'a> {
    pub fn new(fs: Arc<dyn FileSystem>, store: &'a AgentStore) -> Self {
        Self { fs, store }
    }

    /// Agents become local agent files; prompts and rules become markdown
    /// under `<workspace>/.amazonq/rules/`. Existing files are overwritten.
    pub fn sync_item(&self, item: &PromptzItem, content: &str) -> Result<SyncOutcome> {
        let name = item_slug(item);
        if name.is_empty() {
            return Err(QcliAgentsError::Promptz(format!(
                "PromptZ {} has neither a name nor an id to name its file after",
                item.kind
            )));
        }
        let path = match item.kind {
            PromptzItemType::Agent => {
                let config = agent_config_from_item(item, content);
                let path = self
                    .store
                    .locations()
                    .resolve_agent_path(&name, AgentLocation::Local)?;
                self.store.save(&Agent::new(name.clone(), config, path.clone()))?;
                path
            }
            PromptzItemType::Prompt | PromptzItemType::Rule => {
                let workspace = self
                    .store
                    .locations()
                    .workspace_root()
                    .ok_or(QcliAgentsError::NoWorkspace)?;
                let rules_dir = workspace.join(".amazonq").join("rules");
                self.fs.create_dir_all(&rules_dir)?;

                let body = if !content.is_empty() {
                    content.to_string()
                } else if !item.content.is_empty() {
                    item.content.clone()
                } else {
                    format!("{}: {}", item.kind, item.name)
                };
                let path = rules_dir.join(format!("{}.md", name));
                self.fs
                    .write(&path, &render_rule_markdown(item, &body, Utc::now()))?;
                path
            }
        };

        info!(kind = %item.kind, id = %item.id, path = %path.display(), "synced PromptZ item");
        Ok(SyncOutcome {
            kind: item.kind,
            name,
            path,
        })
    }
}
