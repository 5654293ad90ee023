use super::{FileEvent, FileEventKind};
use crate::cache::CacheInvalidationStrategy;
use crate::error::Result;
use notify::event::ModifyKind;
use notify::{recommended_watcher, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};
use tracing::{debug, warn};

/// Watches agent directories, invalidating caches for every event before
/// forwarding it to the subscriber channel.
pub struct AgentWatcher {
    _watcher: RecommendedWatcher,
    events: Receiver<FileEvent>,
    watched: Vec<PathBuf>,
}

impl AgentWatcher {
    /// Start watching the directories in `dirs` that exist; missing ones are skipped.
    pub fn start(dirs: &[PathBuf], strategy: CacheInvalidationStrategy) -> Result<Self> {
        let (tx, rx) = channel();

        let mut watcher = recommended_watcher(move |res: notify::Result<Event>| match res {
            Ok(event) => {
                for file_event in map_event(&event) {
                    strategy.handle_file_system_event(&file_event);
                    // Subscriber gone means nobody is listening; invalidation still ran.
                    let _ = tx.send(file_event);
                }
            }
            Err(e) => warn!("file watcher error: {}", e),
        })?;

        let mut watched = Vec::new();
        for dir in dirs {
            if !dir.is_dir() {
                debug!(dir = %dir.display(), "skipping missing agent directory");
                continue;
            }
            watcher.watch(dir, RecursiveMode::NonRecursive)?;
            debug!(dir = %dir.display(), "watching agent directory");
            watched.push(dir.clone());
        }

        Ok(Self {
            _watcher: watcher,
            events: rx,
            watched,
        })
    }

    pub fn events(&self) -> &Receiver<FileEvent> {
        &self.events
    }

    pub fn watched(&self) -> &[PathBuf] {
        &self.watched
    }
}

/// Translate a notify event into zero or more [`FileEvent`]s.
pub fn map_event(event: &Event) -> Vec<FileEvent> {
    let kind_for = |path: &PathBuf| -> Option<FileEventKind> {
        match event.kind {
            EventKind::Create(_) => Some(FileEventKind::Created),
            EventKind::Remove(_) => Some(FileEventKind::Deleted),
            // A rename reports both ends; whichever still exists was created.
            EventKind::Modify(ModifyKind::Name(_)) => Some(if path.exists() {
                FileEventKind::Created
            } else {
                FileEventKind::Deleted
            }),
            EventKind::Modify(_) => Some(FileEventKind::Changed),
            _ => None,
        }
    };

    event
        .paths
        .iter()
        .filter_map(|path| kind_for(path).map(|kind| FileEvent::new(path.clone(), kind)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, DataChange, RemoveKind};

    #[test]
    fn test_map_event_kinds() {
        let path = PathBuf::from("/ws/.amazonq/cli-agents/foo.json");

        let created = Event::new(EventKind::Create(CreateKind::File)).add_path(path.clone());
        assert_eq!(
            map_event(&created),
            vec![FileEvent::new(path.clone(), FileEventKind::Created)]
        );

        let changed = Event::new(EventKind::Modify(ModifyKind::Data(DataChange::Content)))
            .add_path(path.clone());
        assert_eq!(
            map_event(&changed),
            vec![FileEvent::new(path.clone(), FileEventKind::Changed)]
        );

        let removed = Event::new(EventKind::Remove(RemoveKind::File)).add_path(path.clone());
        assert_eq!(
            map_event(&removed),
            vec![FileEvent::new(path.clone(), FileEventKind::Deleted)]
        );
    }

    #[test]
    fn test_map_event_ignores_access() {
        let event = Event::new(EventKind::Access(AccessKind::Any)).add_path(PathBuf::from("/a"));
        assert!(map_event(&event).is_empty());
    }
}
