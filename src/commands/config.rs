use super::App;
use crate::cli::ConfigCommands;
use crate::config::{global_config_path, workspace_config_path, Config};
use crate::error::Result;
use std::path::Path;

pub fn execute(app: &App, command: &ConfigCommands) -> Result<()> {
    let locations = app.locations();
    match command {
        ConfigCommands::Validate => validate(locations.home_dir(), locations.workspace_root()),
        ConfigCommands::Show => show(&app.config),
    }
}

/// Check each config file on its own, then the merged result.
pub fn validate(home: &Path, workspace: Option<&Path>) -> Result<()> {
    println!("Validating configuration files...\n");

    let mut files = vec![("Global config", global_config_path(home))];
    if let Some(workspace) = workspace {
        files.push(("Workspace config", workspace_config_path(workspace)));
    }

    let mut first_error = None;
    for (label, path) in files {
        if !path.exists() {
            println!("  {}: {} - not found (optional)", label, path.display());
            continue;
        }
        match Config::from_file(&path) {
            Ok(_) => println!("  ✓ {}: {}", label, path.display()),
            Err(e) => {
                println!("  ✗ {}: {}", label, path.display());
                println!("    Error: {}", e);
                first_error.get_or_insert(e);
            }
        }
    }
    if let Some(e) = first_error {
        println!("\n✗ Configuration is invalid!");
        return Err(e);
    }

    println!("\nLoading and validating configuration...");
    match Config::load(Some(home), workspace).and_then(|c| c.validate()) {
        Ok(()) => {
            println!("✓ Configuration is valid!");
            Ok(())
        }
        Err(e) => {
            println!("✗ Configuration is invalid!");
            println!("  Error: {}", e);
            Err(e)
        }
    }
}

fn show(config: &Config) -> Result<()> {
    let config = config.masked();

    println!("Effective Configuration:");
    println!("(CLI > Environment > Workspace config > Global config > Defaults)\n");

    println!("Cache:");
    println!("  ttl: {}s", config.cache.ttl_secs);
    println!("  max entries: {}", config.cache.max_entries);

    println!("\nPromptZ:");
    let unset = |value: &str| {
        if value.is_empty() {
            "(not set)".to_string()
        } else {
            value.to_string()
        }
    };
    println!("  api_url: {}", unset(&config.promptz.api_url));
    println!("  api_key: {}", unset(&config.promptz.api_key));
    println!("  timeout: {}s", config.promptz.timeout_secs);

    println!("\nAgents:");
    println!("  default location: {}", config.agents.default_location);

    Ok(())
}
