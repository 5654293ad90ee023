//! Agent configuration files.
//!
//! An agent is a JSON file named `<name>.json` in one of two directories:
//!
//! - **local**: `<workspace>/.amazonq/cli-agents/`
//! - **global**: `~/.aws/amazonq/cli-agents/`
//!
//! When both exist the local file is the effective one.
//!
//! # Example
//!
//! ```json
//! {
//!   "$schema": "https://json.schemastore.org/amazon-q-developer-cli-agent.json",
//!   "name": "reviewer",
//!   "description": "Reviews pull requests",
//!   "prompt": null,
//!   "tools": ["fs_read"],
//!   "allowedTools": ["fs_read"],
//!   "resources": ["file://README.md"],
//!   "useLegacyMcpJson": false
//! }
//! ```

pub mod definition;
pub mod form;
pub mod location;
pub mod store;
pub mod templates;

pub use definition::{Agent, AgentConfig, AgentConfigPatch, ValidationResult};
pub use form::{AgentCreated, AgentCreationFormService, AgentFormData, FormValidationResult};
pub use location::{AgentConflictInfo, AgentLocation, AgentLocationService, AgentsByLocation};
pub use store::{AgentEntry, AgentStore};
pub use templates::{find_template, AgentTemplate, BUILT_IN_TEMPLATES};
