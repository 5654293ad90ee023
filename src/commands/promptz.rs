use super::App;
use crate::cli::PromptzCommands;
use crate::error::{QcliAgentsError, Result};
use crate::promptz::{PromptzClient, PromptzSync};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

pub fn execute(app: &App, command: &PromptzCommands) -> Result<()> {
    match command {
        PromptzCommands::List => list(app),
        PromptzCommands::Sync { id } => sync(app, id),
    }
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn list(app: &App) -> Result<()> {
    let client = PromptzClient::from_config(&app.config.promptz)?;

    let pb = spinner("Fetching items from PromptZ...");
    let items = client.list_items();
    pb.finish_and_clear();
    let items = items?;

    if items.is_empty() {
        println!("No items found in PromptZ.");
        return Ok(());
    }

    println!("{:<8} {:<38} {:<30} SUMMARY", "TYPE", "ID", "NAME");
    for item in items {
        let summary: String = item.content.chars().take(60).collect();
        println!(
            "{:<8} {:<38} {:<30} {}",
            item.kind.as_str(),
            item.id,
            item.name,
            summary
        );
    }
    Ok(())
}

fn sync(app: &App, id: &str) -> Result<()> {
    let client = PromptzClient::from_config(&app.config.promptz)?;

    let pb = spinner("Fetching items from PromptZ...");
    let result = client.list_items().and_then(|items| {
        let item = items
            .into_iter()
            .find(|item| item.id == id || item.slug.as_deref() == Some(id))
            .ok_or_else(|| QcliAgentsError::Promptz(format!("No item with id or slug \"{}\"", id)))?;
        pb.set_message(format!("Syncing {} \"{}\"...", item.kind, item.name));
        let content = client.full_content(item.lookup_key(), item.kind)?;
        PromptzSync::new(app.fs.clone(), &app.store).sync_item(&item, &content)
    });
    pb.finish_and_clear();
    let outcome = result?;

    println!(
        "✓ Synced {} \"{}\" to {}",
        outcome.kind,
        outcome.name,
        outcome.path.display()
    );
    Ok(())
}
