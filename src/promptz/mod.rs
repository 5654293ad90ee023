//! PromptZ: a remote catalog of prompts, project rules and agents.
//!
//! [`client`] talks to the GraphQL API, one request per call. [`sync`] turns a
//! fetched item into a local agent file or a markdown rule.

pub mod client;
pub mod sync;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use client::PromptzClient;
pub use sync::{PromptzSync, SyncOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptzItemType {
    Prompt,
    Rule,
    Agent,
}

impl PromptzItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PromptzItemType::Prompt => "prompt",
            PromptzItemType::Rule => "rule",
            PromptzItemType::Agent => "agent",
        }
    }

    /// "Prompt", "Rule", "Agent"
    pub fn title(&self) -> &'static str {
        match self {
            PromptzItemType::Prompt => "Prompt",
            PromptzItemType::Rule => "Rule",
            PromptzItemType::Agent => "Agent",
        }
    }
}

impl fmt::Display for PromptzItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One search result. `content` holds the summary returned by the search
/// queries; the full body is fetched with [`PromptzClient::full_content`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptzItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub content: String,
    #[serde(rename = "type")]
    pub kind: PromptzItemType,
    #[serde(default)]
    pub slug: Option<String>,
}

impl PromptzItem {
    /// Identifier used for full-content lookups.
    pub fn lookup_key(&self) -> &str {
        match self.slug.as_deref() {
            Some(slug) if !slug.is_empty() => slug,
            _ => &self.id,
        }
    }
}
