//! Built-in starter configurations.

use super::definition::AgentConfigPatch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentTemplate {
    pub name: &'static str,
    pub description: &'static str,
    pub prompt: Option<&'static str>,
    pub tools: &'static [&'static str],
    pub allowed_tools: &'static [&'static str],
    pub resources: &'static [&'static str],
}

pub const BUILT_IN_TEMPLATES: &[AgentTemplate] = &[
    AgentTemplate {
        name: "basic",
        description: "Basic agent template",
        prompt: None,
        tools: &["fs_read", "execute_bash"],
        allowed_tools: &["fs_read"],
        resources: &["file://README.md"],
    },
    AgentTemplate {
        name: "developer",
        description: "Developer-focused agent template",
        prompt: None,
        tools: &["fs_read", "fs_write", "execute_bash", "introspect"],
        allowed_tools: &["fs_read"],
        resources: &["file://src/**/*", "file://README.md", "file://AmazonQ.md"],
    },
    AgentTemplate {
        name: "documentation",
        description: "Documentation writing agent template",
        prompt: Some("You write and maintain project documentation."),
        tools: &["fs_read", "fs_write"],
        allowed_tools: &["fs_read"],
        resources: &["file://docs/**/*", "file://*.md", "file://README.md"],
    },
];

pub fn find_template(name: &str) -> Option<&'static AgentTemplate> {
    BUILT_IN_TEMPLATES.iter().find(|t| t.name == name)
}

pub fn template_names() -> Vec<&'static str> {
    BUILT_IN_TEMPLATES.iter().map(|t| t.name).collect()
}

impl AgentTemplate {
    /// Overrides for [`Agent::create`](super::Agent::create). The description
    /// is left to the agent default.
    pub fn to_patch(&self) -> AgentConfigPatch {
        let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        AgentConfigPatch {
            prompt: self.prompt.map(|p| Some(p.to_string())),
            tools: Some(owned(self.tools)),
            allowed_tools: Some(owned(self.allowed_tools)),
            resources: Some(owned(self.resources)),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::definition::{Agent, FILE_SCHEME};

    #[test]
    fn test_find_template() {
        assert!(find_template("developer").is_some());
        assert!(find_template("missing").is_none());
        assert_eq!(template_names(), vec!["basic", "developer", "documentation"]);
    }

    #[test]
    fn test_templates_are_structurally_valid() {
        for template in BUILT_IN_TEMPLATES {
            let agent = Agent::create("t", "/tmp/t.json", Some(&template.to_patch())).unwrap();
            assert!(
                agent.config().structural_errors().is_empty(),
                "template {} should be valid",
                template.name
            );
            assert!(agent
                .config()
                .resources
                .iter()
                .all(|r| r.starts_with(FILE_SCHEME)));
        }
    }

    #[test]
    fn test_template_patch_keeps_default_description() {
        let template = find_template("basic").unwrap();
        let agent = Agent::create("helper", "/tmp/helper.json", Some(&template.to_patch())).unwrap();
        assert_eq!(agent.config().description, "helper agent");
        assert_eq!(agent.config().allowed_tools, vec!["fs_read"]);
    }
}
