use super::App;
use crate::cache::CacheInvalidationStrategy;
use crate::error::Result;
use crate::filesystem::AgentWatcher;

/// Print agent directory changes until interrupted.
pub fn execute(app: &App) -> Result<()> {
    let strategy = CacheInvalidationStrategy::new(app.caches.clone());
    let watcher = AgentWatcher::start(&app.locations().agent_dirs(), strategy)?;

    if watcher.watched().is_empty() {
        println!("No agent directories exist yet. Create an agent first.");
        return Ok(());
    }

    println!("Watching (Ctrl-C to stop):");
    for dir in watcher.watched() {
        println!("  {}", dir.display());
    }

    for event in watcher.events() {
        println!("{:<8} {}", event.kind.as_str(), event.path.display());
    }
    Ok(())
}
