use super::App;
use crate::cli::ContextCommands;
use crate::context::{add_resource, check_resource, context_items, remove_resource};
use crate::error::Result;

pub fn execute(app: &App, command: &ContextCommands) -> Result<()> {
    match command {
        ContextCommands::List { agent } => list(app, agent),
        ContextCommands::Add { agent, path } => add(app, agent, path),
        ContextCommands::Remove { agent, path } => remove(app, agent, path),
        ContextCommands::Check { path } => check(path),
    }
}

fn list(app: &App, name: &str) -> Result<()> {
    let agent = app.store.load(name)?;
    let items = context_items(&agent);
    if items.is_empty() {
        println!("Agent \"{}\" has no context resources.", name);
        return Ok(());
    }

    println!("Context resources of \"{}\":", name);
    for item in items {
        println!("  [{:<9}] {}", item.kind().as_str(), item.path());
    }
    Ok(())
}

fn add(app: &App, name: &str, path: &str) -> Result<()> {
    let (_, warnings) = check_resource(path)?;
    for warning in warnings {
        eprintln!("Warning: {}", warning);
    }

    let agent = app.store.load(name)?;
    let updated = add_resource(&agent, path)?;
    app.store.save(&updated)?;
    println!("✓ Added {} to \"{}\"", path, name);
    Ok(())
}

fn remove(app: &App, name: &str, path: &str) -> Result<()> {
    let agent = app.store.load(name)?;
    let updated = remove_resource(&agent, path)?;
    app.store.save(&updated)?;
    println!("✓ Removed {} from \"{}\"", path, name);
    Ok(())
}

fn check(path: &str) -> Result<()> {
    let (item, warnings) = check_resource(path)?;
    println!("✓ {} ({})", item.to_resource(), item.kind().as_str());
    for warning in warnings {
        println!("  warning: {}", warning);
    }
    Ok(())
}
