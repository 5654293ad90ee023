//! Metadata for tool capabilities that are still experimental.

use serde::Serialize;

pub const EXPERIMENTAL_WARNING: &str = "Experimental features are in active development and may change or be removed at any time. Use with caution in production workflows.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WarningLevel {
    Info,
    Warning,
    Caution,
}

impl WarningLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningLevel::Info => "info",
            WarningLevel::Warning => "warning",
            WarningLevel::Caution => "caution",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExperimentalTool {
    pub name: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    pub warning_level: WarningLevel,
    pub stability_note: &'static str,
    pub features: &'static [&'static str],
    pub usage: &'static [&'static str],
}

pub const EXPERIMENTAL_TOOLS: &[ExperimentalTool] = &[
    ExperimentalTool {
        name: "knowledge",
        display_name: "Knowledge Base",
        description: "Store and retrieve information across chat sessions with semantic search",
        warning_level: WarningLevel::Warning,
        stability_note: "Persistent context storage feature in active development",
        features: &[
            "Semantic search capabilities",
            "Persistent knowledge base across sessions",
            "File and directory indexing",
            "Context retrieval optimization",
        ],
        usage: &[
            "/knowledge add <path>",
            "/knowledge show",
            "/knowledge search <query>",
            "/knowledge remove <path>",
        ],
    },
    ExperimentalTool {
        name: "thinking",
        display_name: "Thinking Process",
        description: "Internal reasoning mechanism for complex multi-step problems",
        warning_level: WarningLevel::Info,
        stability_note: "Reasoning transparency feature may change behavior",
        features: &[
            "Step-by-step reasoning display",
            "Complex problem breakdown",
            "Decision-making transparency",
            "Debugging assistance",
        ],
        usage: &[],
    },
    ExperimentalTool {
        name: "todo_list",
        display_name: "TODO List Manager",
        description: "Create and manage TODO lists for tracking multi-step tasks",
        warning_level: WarningLevel::Caution,
        stability_note: "Task management interface under active development",
        features: &[
            "Multi-step task tracking",
            "Task completion monitoring",
            "Context preservation",
            "Progress visualization",
        ],
        usage: &[
            "create - Create new TODO list",
            "complete - Mark tasks as completed",
            "add - Add new tasks",
            "remove - Remove tasks",
        ],
    },
];

pub fn is_experimental_tool(name: &str) -> bool {
    EXPERIMENTAL_TOOLS.iter().any(|t| t.name == name)
}

pub fn experimental_tool_info(name: &str) -> Option<&'static ExperimentalTool> {
    EXPERIMENTAL_TOOLS.iter().find(|t| t.name == name)
}
