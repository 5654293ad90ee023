//! Read-only catalogs compiled into the binary.

pub mod experimental;
pub mod hooks;

pub use experimental::{
    experimental_tool_info, is_experimental_tool, ExperimentalTool, WarningLevel,
    EXPERIMENTAL_TOOLS, EXPERIMENTAL_WARNING,
};
pub use hooks::{
    hook_template, hook_templates_by_category, validate_hook, validate_hooks, AgentHook,
    HookTemplate, HookTrigger, HookValidationResult, HOOK_TEMPLATES,
};
