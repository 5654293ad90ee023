//! Path checks applied before a resource is attached to an agent.

use super::ContextType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleViolation {
    pub message: &'static str,
    pub severity: Severity,
}

/// Longest path accepted as a context resource.
pub const MAX_PATH_LEN: usize = 500;

const INVALID_CHARS: &[char] = &['<', '>', ':', '"', '|', '?', '*'];
const INVALID_GLOB_CHARS: &[char] = &['<', '>', ':', '"', '|'];

/// Run every rule against `path`; violations come back in rule order.
pub fn check_path(path: &str, kind: ContextType) -> Vec<RuleViolation> {
    let mut violations = Vec::new();

    let forbidden = match kind {
        ContextType::GlobPattern => INVALID_GLOB_CHARS,
        _ => INVALID_CHARS,
    };
    if path.contains(forbidden) {
        violations.push(RuleViolation {
            message: "Path contains invalid characters (<>:\"|?*)",
            severity: Severity::Error,
        });
    }

    if path.split(['/', '\\']).any(|segment| segment == "..") {
        violations.push(RuleViolation {
            message: "Path traversal (..) not allowed for security",
            severity: Severity::Error,
        });
    }

    if path.contains("//") {
        violations.push(RuleViolation {
            message: "Multiple consecutive slashes not recommended",
            severity: Severity::Warning,
        });
    }

    if path.ends_with(char::is_whitespace) {
        violations.push(RuleViolation {
            message: "Path should not end with whitespace",
            severity: Severity::Warning,
        });
    }

    violations
}

/// Shape checks that depend on the declared type.
pub fn validate_context_path(path: &str, kind: ContextType) -> Result<(), &'static str> {
    if path.trim().is_empty() {
        return Err("Context path is required");
    }
    if path.chars().count() > MAX_PATH_LEN {
        return Err("Context path must be 500 characters or less");
    }
    match kind {
        ContextType::File if path.contains('*') => Err("File paths cannot contain wildcards"),
        ContextType::Directory if !path.ends_with('/') => Err("Directory paths should end with /"),
        _ => Ok(()),
    }
}
