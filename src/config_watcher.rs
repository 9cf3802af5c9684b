//! Config file watching for push-based reloads
//!
//! Uses the `notify` crate with debouncing to detect edits to the
//! abbreviation file (the management UI, a text editor, a sync tool) and
//! tell the host loop to re-fetch and re-broadcast the configuration.

use notify_debouncer_mini::{new_debouncer, DebouncedEventKind, Debouncer};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

/// Watches the abbreviation file and reports debounced change notifications
///
/// Watching covers the parent directory rather than the file itself, so
/// atomic replace-by-rename (how most editors save) is still observed.
pub struct ConfigWatcher {
    /// The debouncer handles watching and event coalescing
    _debouncer: Debouncer<notify::RecommendedWatcher>,
    /// Receiver for debounced events
    rx: Receiver<Result<Vec<notify_debouncer_mini::DebouncedEvent>, notify::Error>>,
    /// The config file being watched
    path: PathBuf,
}

impl ConfigWatcher {
    /// Start watching the config file's directory.
    ///
    /// Events are debounced with a 250ms delay so a save that touches the
    /// file several times produces one reload.
    pub fn new(path: PathBuf) -> Result<Self, notify::Error> {
        let (tx, rx) = mpsc::channel();

        let mut debouncer = new_debouncer(Duration::from_millis(250), tx)?;

        let watch_root = path
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| path.clone());
        debouncer
            .watcher()
            .watch(&watch_root, notify::RecursiveMode::NonRecursive)?;

        tracing::info!("Watching config file: {}", path.display());

        Ok(Self {
            _debouncer: debouncer,
            rx,
            path,
        })
    }

    /// Non-blocking: true when the config file changed since the last poll
    /// and a reload should run
    pub fn reload_due(&self) -> bool {
        let mut due = false;
        while let Ok(result) = self.rx.try_recv() {
            match result {
                Ok(events) => {
                    for event in events {
                        if matches!(event.kind, DebouncedEventKind::AnyContinuous) {
                            continue;
                        }
                        if event.path == self.path
                            || event.path.file_name() == self.path.file_name()
                        {
                            due = true;
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!("Config watcher error: {}", e);
                }
            }
        }
        due
    }
}
