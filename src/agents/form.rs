//! Agent creation from user-supplied form data.

use super::definition::{
    is_valid_agent_name, AgentConfig, AgentConfigPatch, AGENT_V1_SCHEMA, FILE_SCHEME,
};
use super::location::{AgentLocation, AgentLocationService};
use crate::catalog::experimental::EXPERIMENTAL_WARNING;
use crate::error::{QcliAgentsError, Result};
use crate::filesystem::FileSystem;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolCategory {
    Filesystem,
    Execution,
    Aws,
    Utility,
    Development,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BuiltInTool {
    pub name: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    pub category: ToolCategory,
    pub default_allowed: bool,
    pub is_experimental: bool,
}

const fn tool(
    name: &'static str,
    display_name: &'static str,
    description: &'static str,
    category: ToolCategory,
    default_allowed: bool,
    is_experimental: bool,
) -> BuiltInTool {
    BuiltInTool {
        name,
        display_name,
        description,
        category,
        default_allowed,
        is_experimental,
    }
}

pub const BUILT_IN_TOOLS: &[BuiltInTool] = &[
    tool("fs_read", "File Read", "Read files and directories", ToolCategory::Filesystem, true, false),
    tool("fs_write", "File Write", "Create and edit files", ToolCategory::Filesystem, false, false),
    tool("execute_bash", "Execute Bash", "Run shell commands", ToolCategory::Execution, false, false),
    tool("use_aws", "Use AWS", "Make AWS CLI API calls", ToolCategory::Aws, false, false),
    tool("knowledge", "Knowledge Base", "Store and retrieve information across sessions", ToolCategory::Utility, false, true),
    tool("thinking", "Thinking Process", "Show internal reasoning for complex problems", ToolCategory::Utility, false, true),
    tool("todo_list", "TODO List", "Track multi-step tasks", ToolCategory::Utility, false, true),
    tool("introspect", "Introspect", "Answer questions about the CLI itself", ToolCategory::Development, false, false),
    tool("report_issue", "Report Issue", "Open a GitHub issue template", ToolCategory::Development, false, false),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolSection {
    pub title: &'static str,
    pub description: &'static str,
    pub tools: Vec<BuiltInTool>,
    pub is_experimental: bool,
    pub warning_message: Option<&'static str>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolSelection {
    pub available: Vec<String>,
    pub allowed: Vec<String>,
    #[serde(default)]
    pub experimental: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentFormData {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub location: AgentLocation,
    pub tools: ToolSelection,
    pub resources: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormField {
    Name,
    Tools,
    Resources,
}

impl FormField {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormField::Name => "name",
            FormField::Tools => "tools",
            FormField::Resources => "resources",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormIssue {
    pub field: FormField,
    pub message: String,
}

impl FormIssue {
    fn new(field: FormField, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FormIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field.as_str(), self.message)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormValidationResult {
    pub is_valid: bool,
    pub errors: Vec<FormIssue>,
    pub warnings: Vec<FormIssue>,
}

/// Outcome of a successful creation.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentCreated {
    /// Relative to the workspace root for local agents, absolute for global ones.
    pub display_path: PathBuf,
    pub file_path: PathBuf,
    pub config: AgentConfig,
}

/// Notified after an agent file has been written so listings can reload.
pub trait RefreshListener: Send + Sync {
    fn refresh(&self);
}

#[derive(Debug, Default)]
pub struct NoopRefresh;

impl RefreshListener for NoopRefresh {
    fn refresh(&self) {}
}

pub struct AgentCreationFormService {
    fs: Arc<dyn FileSystem>,
    locations: AgentLocationService,
    refresh: Arc<dyn RefreshListener>,
}

impl AgentCreationFormService {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        locations: AgentLocationService,
        refresh: Arc<dyn RefreshListener>,
    ) -> Self {
        Self {
            fs,
            locations,
            refresh,
        }
    }

    pub fn default_form_data() -> AgentFormData {
        AgentFormData {
            name: String::new(),
            description: String::new(),
            prompt: String::new(),
            location: AgentLocation::Local,
            tools: ToolSelection {
                available: BUILT_IN_TOOLS
                    .iter()
                    .filter(|t| !t.is_experimental)
                    .map(|t| t.name.to_string())
                    .collect(),
                allowed: BUILT_IN_TOOLS
                    .iter()
                    .filter(|t| t.default_allowed)
                    .map(|t| t.name.to_string())
                    .collect(),
                experimental: Vec::new(),
            },
            resources: vec![
                "file://AmazonQ.md".to_string(),
                "file://README.md".to_string(),
                "file://.amazonq/rules/**/*.md".to_string(),
            ],
        }
    }

    pub fn available_tools() -> &'static [BuiltInTool] {
        BUILT_IN_TOOLS
    }

    pub fn tool_sections() -> Vec<ToolSection> {
        let (experimental, standard): (Vec<BuiltInTool>, Vec<BuiltInTool>) =
            BUILT_IN_TOOLS.iter().copied().partition(|t| t.is_experimental);
        vec![
            ToolSection {
                title: "Standard Tools",
                description: "Stable tools for everyday agent work",
                tools: standard,
                is_experimental: false,
                warning_message: None,
            },
            ToolSection {
                title: "Experimental Tools",
                description: "Tools that are still in active development",
                tools: experimental,
                is_experimental: true,
                warning_message: Some(EXPERIMENTAL_WARNING),
            },
        ]
    }

    /// Check form data without touching the filesystem.
    pub fn validate_form_data(form: &AgentFormData) -> FormValidationResult {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        if form.name.trim().is_empty() {
            errors.push(FormIssue::new(FormField::Name, "Agent name is required"));
        } else if !is_valid_agent_name(&form.name) {
            errors.push(FormIssue::new(
                FormField::Name,
                "Agent name can only contain letters, numbers, hyphens, and underscores",
            ));
        }

        for allowed in &form.tools.allowed {
            if !form.tools.available.contains(allowed) {
                errors.push(FormIssue::new(
                    FormField::Tools,
                    format!("Allowed tool \"{}\" must be in available tools", allowed),
                ));
            }
        }

        let mut seen = HashSet::new();
        for (index, resource) in form.resources.iter().enumerate() {
            if !resource.starts_with(FILE_SCHEME) {
                errors.push(FormIssue::new(
                    FormField::Resources,
                    format!("Resource {} must start with \"{}\"", index + 1, FILE_SCHEME),
                ));
            }
            if !seen.insert(resource.as_str()) {
                warnings.push(FormIssue::new(
                    FormField::Resources,
                    format!("Duplicate resource: {}", resource),
                ));
            }
        }

        FormValidationResult {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    /// Config written for a form: the default shape with the form merged in.
    pub fn build_config(form: &AgentFormData) -> AgentConfig {
        let mut tools = form.tools.available.clone();
        for name in &form.tools.experimental {
            if !tools.contains(name) {
                tools.push(name.clone());
            }
        }

        let prompt = if form.prompt.trim().is_empty() {
            None
        } else {
            Some(form.prompt.clone())
        };

        AgentConfig::default_for(&form.name).merged(&AgentConfigPatch {
            schema: Some(AGENT_V1_SCHEMA.to_string()),
            description: Some(form.description.clone()),
            prompt: Some(prompt),
            tools: Some(tools),
            allowed_tools: Some(form.tools.allowed.clone()),
            resources: Some(form.resources.clone()),
            use_legacy_mcp_json: Some(true),
            ..Default::default()
        })
    }

    /// Validate and persist a new agent, then notify the refresh listener.
    ///
    /// Fails before any write when no workspace is open or the agent file
    /// already exists. The existence check is advisory; a concurrent creator
    /// with the same name can still win.
    pub fn create_agent_from_form_data(&self, form: &AgentFormData) -> Result<AgentCreated> {
        let workspace = self
            .locations
            .workspace_root()
            .map(PathBuf::from)
            .ok_or(QcliAgentsError::NoWorkspace)?;

        // An invalid name never resolves to a file, so it falls through to the form errors.
        if self.locations.agent_exists(&form.name, form.location) {
            return Err(QcliAgentsError::AgentExists(form.name.clone()));
        }

        let validation = Self::validate_form_data(form);
        if !validation.is_valid {
            let messages: Vec<String> = validation.errors.iter().map(|e| e.message.clone()).collect();
            return Err(QcliAgentsError::InvalidForm(messages.join(", ")));
        }

        let file_path = self.locations.resolve_agent_path(&form.name, form.location)?;
        self.locations.ensure_directory_exists(form.location)?;
        let config = Self::build_config(form);
        self.fs.write(&file_path, &config.to_json_pretty()?)?;
        info!(agent = %form.name, path = %file_path.display(), "created agent");

        self.refresh.refresh();

        let display_path = match form.location {
            AgentLocation::Local => file_path
                .strip_prefix(&workspace)
                .map(PathBuf::from)
                .unwrap_or_else(|_| file_path.clone()),
            AgentLocation::Global => file_path.clone(),
        };

        Ok(AgentCreated {
            display_path,
            file_path,
            config,
        })
    }
}
