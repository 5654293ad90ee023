//! Context resources: the files, directories and globs an agent reads.
//!
//! Resources are stored on the agent as `file://` URIs. [`ContextItem`] is
//! the unpersisted view used for validation and display.

pub mod rules;

use crate::agents::definition::{Agent, AgentConfigPatch, FILE_SCHEME};
use crate::error::{QcliAgentsError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

pub use rules::{check_path, validate_context_path, RuleViolation, Severity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextType {
    File,
    Directory,
    #[serde(rename = "glob")]
    GlobPattern,
}

impl ContextType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContextType::File => "file",
            ContextType::Directory => "directory",
            ContextType::GlobPattern => "glob",
        }
    }

    /// Best guess from the path text alone.
    pub fn infer(path: &str) -> Self {
        if path.contains(['*', '?', '[']) {
            ContextType::GlobPattern
        } else if path.ends_with('/') {
            ContextType::Directory
        } else {
            ContextType::File
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContextMetadata {
    pub size: Option<u64>,
    pub last_modified: Option<DateTime<Utc>>,
    pub encoding: Option<String>,
    pub description: Option<String>,
}

impl ContextMetadata {
    /// Fields set in `other` win.
    fn merged(&self, other: &ContextMetadata) -> Self {
        Self {
            size: other.size.or(self.size),
            last_modified: other.last_modified.or(self.last_modified),
            encoding: other.encoding.clone().or_else(|| self.encoding.clone()),
            description: other.description.clone().or_else(|| self.description.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContextItem {
    path: String,
    kind: ContextType,
    metadata: Option<ContextMetadata>,
}

impl ContextItem {
    pub fn new(path: impl Into<String>, kind: ContextType, metadata: Option<ContextMetadata>) -> Self {
        Self {
            path: path.into(),
            kind,
            metadata,
        }
    }

    /// Build and validate an item.
    pub fn create(path: &str, kind: ContextType, metadata: Option<ContextMetadata>) -> Result<Self> {
        if path.trim().is_empty() {
            return Err(QcliAgentsError::InvalidContext(
                "Context path is required".to_string(),
            ));
        }

        let item = Self::new(path, kind, metadata);
        let errors = item.validate();
        if !errors.is_empty() {
            return Err(QcliAgentsError::InvalidContext(errors.join(", ")));
        }
        Ok(item)
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn kind(&self) -> ContextType {
        self.kind
    }

    pub fn metadata(&self) -> Option<&ContextMetadata> {
        self.metadata.as_ref()
    }

    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.path.trim().is_empty() {
            errors.push("Context path is required".to_string());
        }

        match self.kind {
            ContextType::File if self.path.contains(['*', '?']) => {
                errors.push("Invalid file path format".to_string());
            }
            ContextType::GlobPattern if !self.path.contains(['*', '?', '[']) => {
                errors.push("Invalid glob pattern format".to_string());
            }
            _ => {}
        }

        errors
    }

    pub fn with_metadata(&self, metadata: ContextMetadata) -> Self {
        let merged = match &self.metadata {
            Some(current) => current.merged(&metadata),
            None => metadata,
        };
        Self {
            path: self.path.clone(),
            kind: self.kind,
            metadata: Some(merged),
        }
    }

    /// Resource URI as stored on an agent.
    pub fn to_resource(&self) -> String {
        to_resource(&self.path)
    }
}

pub fn to_resource(path: &str) -> String {
    if path.starts_with(FILE_SCHEME) {
        path.to_string()
    } else {
        format!("{}{}", FILE_SCHEME, path)
    }
}

/// Inverse of [`to_resource`]; other schemes come back unchanged.
pub fn resource_path(resource: &str) -> &str {
    resource.strip_prefix(FILE_SCHEME).unwrap_or(resource)
}

/// Context items for every resource on the agent, typed by inference.
pub fn context_items(agent: &Agent) -> Vec<ContextItem> {
    agent
        .config()
        .resources
        .iter()
        .filter(|r| !r.is_empty())
        .map(|r| {
            let path = resource_path(r);
            ContextItem::new(path, ContextType::infer(path), None)
        })
        .collect()
}

/// Check a path for use as a resource. Warnings are returned; errors fail.
pub fn check_resource(path: &str) -> Result<(ContextItem, Vec<&'static str>)> {
    let path = resource_path(path);
    let kind = ContextType::infer(path);
    let item = ContextItem::create(path, kind, None)?;
    validate_context_path(path, kind)
        .map_err(|message| QcliAgentsError::InvalidContext(message.to_string()))?;

    let mut warnings = Vec::new();
    for violation in check_path(path, kind) {
        match violation.severity {
            Severity::Error => {
                return Err(QcliAgentsError::InvalidContext(violation.message.to_string()))
            }
            Severity::Warning => warnings.push(violation.message),
        }
    }
    Ok((item, warnings))
}

/// New agent with `path` appended to its resources.
pub fn add_resource(agent: &Agent, path: &str) -> Result<Agent> {
    let (item, _) = check_resource(path)?;
    let resource = item.to_resource();
    if agent.config().resources.contains(&resource) {
        return Err(QcliAgentsError::InvalidContext(format!(
            "Context item '{}' already exists",
            item.path()
        )));
    }

    let mut resources = agent.config().resources.clone();
    resources.push(resource);
    Ok(agent.update_config(&AgentConfigPatch {
        resources: Some(resources),
        ..Default::default()
    }))
}

/// New agent without `path` in its resources.
pub fn remove_resource(agent: &Agent, path: &str) -> Result<Agent> {
    let resource = to_resource(path);
    if !agent.config().resources.contains(&resource) {
        return Err(QcliAgentsError::InvalidContext(format!(
            "Context item '{}' not found",
            resource_path(path)
        )));
    }

    let resources = agent
        .config()
        .resources
        .iter()
        .filter(|r| **r != resource)
        .cloned()
        .collect();
    Ok(agent.update_config(&AgentConfigPatch {
        resources: Some(resources),
        ..Default::default()
    }))
}
