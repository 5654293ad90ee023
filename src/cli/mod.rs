use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "qcli-agents")]
#[command(about = "Manage Q CLI agent configurations and context resources", long_about = None)]
#[command(version = env!("QCLI_AGENTS_VERSION"))]
#[command(after_help = "\
LOCATIONS:
  local   <workspace>/.amazonq/cli-agents/<name>.json
  global  ~/.aws/amazonq/cli-agents/<name>.json

  When an agent exists in both, the local file wins.

EXAMPLES:
  qcli-agents agent list
  qcli-agents agent create reviewer -d \"Reviews code\" --tool fs_read --allow fs_read
  qcli-agents agent new docs --template documentation --global
  qcli-agents context add reviewer 'src/**/*.rs'")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Workspace root (default: git top-level, then current directory)
    #[arg(long, global = true, value_name = "DIR")]
    pub workspace: Option<PathBuf>,

    /// Run as if no workspace folder were open
    #[arg(long, global = true, conflicts_with = "workspace")]
    pub no_workspace: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage agent configuration files
    Agent {
        #[command(subcommand)]
        command: AgentCommands,
    },

    /// Manage the context resources of an agent
    Context {
        #[command(subcommand)]
        command: ContextCommands,
    },

    /// List built-in agent templates
    Templates,

    /// List built-in tools, standard and experimental
    Tools,

    /// List hook command templates
    Hooks {
        /// Only show one category (git, project, system, custom)
        #[arg(long)]
        category: Option<String>,
    },

    /// Watch agent directories and print changes
    Watch,

    /// Browse and sync items from PromptZ
    Promptz {
        #[command(subcommand)]
        command: PromptzCommands,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum AgentCommands {
    /// List agents in both locations
    #[command(alias = "ls")]
    List,

    /// Print the effective configuration of an agent
    Show { name: String },

    /// Validate an agent file
    Validate { name: String },

    /// Create an agent from explicit settings
    Create(CreateArgs),

    /// Create an agent from a built-in template
    New {
        name: String,

        /// Template name (see `qcli-agents templates`)
        #[arg(short, long)]
        template: String,

        /// Create in the global location
        #[arg(long)]
        global: bool,
    },

    /// Delete an agent file
    #[command(alias = "rm")]
    Delete {
        name: String,

        /// Delete from the global location
        #[arg(long)]
        global: bool,
    },

    /// Show where an agent name exists and which file wins
    Conflicts { name: String },
}

#[derive(Args, Debug, Clone, Default)]
pub struct CreateArgs {
    pub name: String,

    /// Agent description (default: "<name> agent")
    #[arg(short, long)]
    pub description: Option<String>,

    /// System prompt
    #[arg(long)]
    pub prompt: Option<String>,

    /// Available tool (repeatable; replaces the default set)
    #[arg(long = "tool", value_name = "TOOL")]
    pub tools: Vec<String>,

    /// Tool allowed without confirmation (repeatable; replaces the default set)
    #[arg(long = "allow", value_name = "TOOL")]
    pub allowed: Vec<String>,

    /// Experimental tool to enable (repeatable)
    #[arg(long = "experimental", value_name = "TOOL")]
    pub experimental: Vec<String>,

    /// Resource URI, e.g. file://README.md (repeatable; replaces the default set)
    #[arg(long = "resource", value_name = "URI")]
    pub resources: Vec<String>,

    /// Create in the global location
    #[arg(long)]
    pub global: bool,
}

#[derive(Subcommand, Debug)]
pub enum ContextCommands {
    /// List the resources of an agent
    List { agent: String },

    /// Add a file, directory or glob to an agent
    Add { agent: String, path: String },

    /// Remove a resource from an agent
    #[command(alias = "rm")]
    Remove { agent: String, path: String },

    /// Check a path against the resource rules
    Check { path: String },
}

#[derive(Subcommand, Debug)]
pub enum PromptzCommands {
    /// List prompts, rules and agents
    List,

    /// Sync one item by id or slug
    Sync { id: String },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Validate configuration files
    Validate,

    /// Show effective configuration after merging all sources
    Show,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_create() {
        let cli = Cli::parse_from([
            "qcli-agents",
            "agent",
            "create",
            "reviewer",
            "--tool",
            "fs_read",
            "--tool",
            "fs_write",
            "--allow",
            "fs_read",
            "--global",
        ]);
        match cli.command {
            Commands::Agent {
                command: AgentCommands::Create(args),
            } => {
                assert_eq!(args.name, "reviewer");
                assert_eq!(args.tools, vec!["fs_read", "fs_write"]);
                assert_eq!(args.allowed, vec!["fs_read"]);
                assert!(args.global);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_workspace_flags_conflict() {
        let result = Cli::try_parse_from([
            "qcli-agents",
            "--workspace",
            "/tmp",
            "--no-workspace",
            "agent",
            "list",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["qcli-agents", "agent", "list", "-v", "--no-workspace"]);
        assert!(cli.verbose);
        assert!(cli.no_workspace);
    }
}
