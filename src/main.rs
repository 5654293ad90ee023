#![forbid(unsafe_code)]

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use qcli_agents::cli::{Cli, Commands, ConfigCommands};
use qcli_agents::commands::{self, App};
use qcli_agents::config::Config;
use qcli_agents::utils::path::{expand_tilde, home_dir};
use qcli_agents::workspace::Workspace;

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let home = home_dir().context("Could not determine home directory")?;

    // Workspace: --no-workspace > --workspace > git top-level > current directory
    let workspace = if cli.no_workspace {
        None
    } else if let Some(dir) = &cli.workspace {
        let dir = expand_tilde(dir).unwrap_or_else(|| dir.clone());
        Some(Workspace::at(&dir).with_context(|| format!("Invalid workspace {}", dir.display()))?)
    } else {
        Some(Workspace::detect()?)
    };
    let workspace_root = workspace.as_ref().map(|ws| ws.root().to_path_buf());
    tracing::debug!(workspace = ?workspace_root, home = %home.display(), "resolved locations");

    // Validation must report broken files instead of failing to load them
    if let Commands::Config {
        command: ConfigCommands::Validate,
    } = &cli.command
    {
        commands::config::validate(&home, workspace_root.as_deref())?;
        return Ok(());
    }

    let config = Config::load(Some(&home), workspace_root.as_deref())?.with_cli_overrides(&cli);
    let app = App::new(config, workspace_root, home);

    commands::execute(&app, &cli.command)?;
    Ok(())
}
