//! Behavior file watcher for hot reload.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use notify::{Config, Event, PollWatcher, RecursiveMode, Watcher};

use crate::config::reload::Reloader;

/// Polls the behavior file's modification time and reloads on change.
///
/// Events are delivered on the watcher's own thread one at a time, so at
/// most one reload runs at once. Dropping the returned [`PollWatcher`]
/// stops polling.
pub struct BehaviorWatcher {
    path: PathBuf,
    poll_interval: Duration,
    reloader: Arc<Reloader>,
}

impl BehaviorWatcher {
    pub fn new(path: &Path, poll_interval: Duration, reloader: Arc<Reloader>) -> Self {
        Self {
            path: path.to_path_buf(),
            poll_interval,
            reloader,
        }
    }

    /// Load the file once, then start polling it.
    ///
    /// A failed initial load is logged and leaves the registry empty; the
    /// next successful edit populates it.
    pub fn run(self) -> Result<PollWatcher, notify::Error> {
        let _ = self.reloader.reload(&self.path);

        let reloader = self.reloader.clone();
        let path = self.path.clone();

        let mut watcher = PollWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() {
                        tracing::info!("Behavior file change detected, reloading...");
                        let _ = reloader.reload(&path);
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(self.poll_interval),
        )?;

        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;

        tracing::info!(
            path = ?self.path,
            interval_ms = self.poll_interval.as_millis() as u64,
            "Behavior watcher started"
        );
        Ok(watcher)
    }
}
