//! Lifecycle hook command templates and hook command checks.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HookTrigger {
    AgentSpawn,
    UserPromptSubmit,
}

impl HookTrigger {
    /// Key used under `hooks` in an agent config.
    pub fn as_str(&self) -> &'static str {
        match self {
            HookTrigger::AgentSpawn => "agentSpawn",
            HookTrigger::UserPromptSubmit => "userPromptSubmit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HookCategory {
    Git,
    Project,
    System,
    Custom,
}

impl HookCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            HookCategory::Git => "git",
            HookCategory::Project => "project",
            HookCategory::System => "system",
            HookCategory::Custom => "custom",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SecurityLevel {
    Safe,
    Caution,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HookTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub trigger: HookTrigger,
    pub command: &'static str,
    pub category: HookCategory,
    pub is_read_only: bool,
    pub security_level: SecurityLevel,
}

pub const HOOK_TEMPLATES: &[HookTemplate] = &[
    HookTemplate {
        id: "git-status",
        name: "Git status",
        description: "Show the current git status with every prompt",
        trigger: HookTrigger::UserPromptSubmit,
        command: "git status --short",
        category: HookCategory::Git,
        is_read_only: true,
        security_level: SecurityLevel::Safe,
    },
    HookTemplate {
        id: "project-info",
        name: "Project info",
        description: "Show the project name and primary language when a conversation starts",
        trigger: HookTrigger::AgentSpawn,
        command: r#"echo "Project: $(basename $(pwd)) | Language: $(find . -name "*.json" -o -name "*.js" -o -name "*.ts" -o -name "*.py" | head -1 | sed 's/.*\.//')""#,
        category: HookCategory::Project,
        is_read_only: true,
        security_level: SecurityLevel::Safe,
    },
    HookTemplate {
        id: "current-branch",
        name: "Current branch",
        description: "Show the current git branch when a conversation starts",
        trigger: HookTrigger::AgentSpawn,
        command: "git branch --show-current",
        category: HookCategory::Git,
        is_read_only: true,
        security_level: SecurityLevel::Safe,
    },
];

pub fn hook_template(id: &str) -> Option<&'static HookTemplate> {
    HOOK_TEMPLATES.iter().find(|t| t.id == id)
}

pub fn hook_templates_by_category(category: &str) -> Vec<&'static HookTemplate> {
    HOOK_TEMPLATES
        .iter()
        .filter(|t| t.category.as_str() == category)
        .collect()
}

const DANGEROUS_COMMANDS: &[&str] = &[
    "rm", "del", "delete", "format", "mkfs", "dd", "fdisk", "parted", "shutdown", "reboot",
    "sudo", "su", "chmod 777", "chown",
];

const NETWORK_COMMANDS: &[&str] = &[
    "curl", "wget", "ssh", "scp", "rsync", "nc", "netcat", "telnet", "ftp",
];

/// A hook as configured by the user, custom or instantiated from a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentHook {
    pub name: String,
    pub trigger: HookTrigger,
    pub command: String,
    #[serde(default)]
    pub template_id: Option<String>,
}

impl From<&HookTemplate> for AgentHook {
    fn from(template: &HookTemplate) -> Self {
        Self {
            name: template.id.to_string(),
            trigger: template.trigger,
            command: template.command.to_string(),
            template_id: Some(template.id.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HookValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub security_warnings: Vec<String>,
}

fn hook_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[\p{L}\p{N}\-_\s]+$").expect("valid hook name regex"))
}

/// Whole-word match so "rm" does not fire on "format" and friends.
fn mentions(command: &str, word: &str) -> bool {
    let pattern = format!(r"(^|[^\w]){}([^\w]|$)", regex::escape(word));
    Regex::new(&pattern)
        .map(|re| re.is_match(command))
        .unwrap_or(false)
}

pub fn validate_hook(hook: &AgentHook) -> HookValidationResult {
    let mut result = HookValidationResult {
        is_valid: true,
        ..Default::default()
    };

    if hook.name.trim().is_empty() {
        result.errors.push("Hook name is required".to_string());
    } else if !hook_name_pattern().is_match(&hook.name) {
        result
            .errors
            .push("Hook name cannot contain special characters".to_string());
    }

    if hook.command.trim().is_empty() {
        result.errors.push("Hook command is required".to_string());
    } else {
        check_command(&hook.command, &mut result);
    }

    result.is_valid = result.errors.is_empty();
    result
}

fn check_command(command: &str, result: &mut HookValidationResult) {
    let lower = command.to_lowercase();

    for dangerous in DANGEROUS_COMMANDS {
        if mentions(&lower, dangerous) {
            result
                .security_warnings
                .push(format!("Dangerous command detected: {}", dangerous));
            result
                .warnings
                .push("This command can modify the system".to_string());
        }
    }

    for network in NETWORK_COMMANDS {
        if mentions(&lower, network) {
            result
                .security_warnings
                .push(format!("Network command detected: {}", network));
            result
                .warnings
                .push("Network commands need extra care".to_string());
        }
    }

    if command.contains('|') || command.contains('>') {
        result
            .warnings
            .push("Watch the output size when using pipes or redirection".to_string());
    }
}

pub fn validate_hooks(hooks: &[AgentHook]) -> HookValidationResult {
    let mut result = HookValidationResult {
        is_valid: true,
        ..Default::default()
    };

    let mut seen = HashSet::new();
    if hooks
        .iter()
        .any(|h| !seen.insert(h.name.to_lowercase()))
    {
        result.errors.push("Duplicate hook names found".to_string());
    }

    for hook in hooks {
        let single = validate_hook(hook);
        result.errors.extend(single.errors);
        result.warnings.extend(single.warnings);
        result.security_warnings.extend(single.security_warnings);
    }

    result.is_valid = result.errors.is_empty();
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hook(name: &str, command: &str) -> AgentHook {
        AgentHook {
            name: name.to_string(),
            trigger: HookTrigger::AgentSpawn,
            command: command.to_string(),
            template_id: None,
        }
    }

    #[test]
    fn test_template_lookup() {
        assert_eq!(hook_template("git-status").unwrap().command, "git status --short");
        assert!(hook_template("nope").is_none());
        assert_eq!(hook_templates_by_category("git").len(), 2);
        assert_eq!(hook_templates_by_category("project").len(), 1);
        assert!(hook_templates_by_category("system").is_empty());
    }

    #[test]
    fn test_templates_validate_cleanly() {
        for template in HOOK_TEMPLATES {
            let result = validate_hook(&AgentHook::from(template));
            assert!(result.is_valid, "{} should be valid", template.id);
            assert!(result.security_warnings.is_empty());
        }
    }

    #[test]
    fn test_required_fields() {
        let result = validate_hook(&hook("", " "));
        assert!(!result.is_valid);
        assert_eq!(
            result.errors,
            vec!["Hook name is required", "Hook command is required"]
        );

        let result = validate_hook(&hook("bad$name", "ls"));
        assert_eq!(
            result.errors,
            vec!["Hook name cannot contain special characters"]
        );
    }

    #[test]
    fn test_security_warnings() {
        let result = validate_hook(&hook("fetch", "curl https://example.com | sudo sh"));
        assert!(result.is_valid);
        assert!(result
            .security_warnings
            .contains(&"Dangerous command detected: sudo".to_string()));
        assert!(result
            .security_warnings
            .contains(&"Network command detected: curl".to_string()));
        assert!(result
            .warnings
            .iter()
            .any(|w| w.contains("pipes or redirection")));
    }

    #[test]
    fn test_duplicate_names_case_insensitive() {
        let result = validate_hooks(&[hook("Status", "git status"), hook("status", "git log")]);
        assert!(!result.is_valid);
        assert_eq!(result.errors, vec!["Duplicate hook names found"]);
    }
}
