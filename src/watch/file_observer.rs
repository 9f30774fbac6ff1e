// src/watch/file_observer.rs

//! Per-file polling loop.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::engine::signal::SignalOutcome;
use crate::fs::is_gone;
use crate::watch::registry::ObserverRegistry;

/// Outcome of a single stat cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilePoll {
    /// First successful stat; the modification time became the baseline.
    Baseline,
    /// Modification time equal to or older than the recorded one.
    Unchanged,
    /// Strictly newer modification time; a change signal was sent.
    Changed(SignalOutcome),
    /// The file no longer exists (or is now a directory); the observer stops.
    Gone,
    /// Stat failed for another reason; retried next cycle.
    Failed,
}

/// Stats one file every check interval and emits a change signal whenever
/// its modification time moves strictly forward.
///
/// Only this observer writes the file's entry in the [`FileSet`].
///
/// [`FileSet`]: crate::watch::path_set::FileSet
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    registry: ObserverRegistry,
}

impl FileObserver {
    pub fn new(path: PathBuf, registry: ObserverRegistry) -> Self {
        Self { path, registry }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn poll_once(&self) -> FilePoll {
        let stat = match self.registry.fs().stat(&self.path) {
            Ok(stat) => stat,
            Err(err) if is_gone(&err) => {
                debug!(path = ?self.path, "file disappeared");
                return FilePoll::Gone;
            }
            Err(err) => {
                warn!(path = ?self.path, error = %err, "file stat error");
                return FilePoll::Failed;
            }
        };

        // A link to a directory is watched through its target's mtime.
        if stat.is_dir && !stat.is_symlink {
            debug!(path = ?self.path, "file was replaced by a directory");
            return FilePoll::Gone;
        }

        let files = self.registry.files();
        match files.get(&self.path).flatten() {
            None => {
                files.set(&self.path, stat.modified);
                FilePoll::Baseline
            }
            Some(last) if stat.modified > last => {
                files.set(&self.path, stat.modified);
                let outcome = self.registry.signals().notify();
                debug!(path = ?self.path, ?outcome, "file changed");
                FilePoll::Changed(outcome)
            }
            Some(_) => FilePoll::Unchanged,
        }
    }

    /// Poll until the file disappears or the registry is cancelled.
    pub async fn run(self) {
        let cancel = self.registry.cancel_token().clone();
        let interval = self.registry.check_interval();

        loop {
            if self.poll_once() == FilePoll::Gone {
                break;
            }

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(interval) => {}
            }
        }

        debug!(path = ?self.path, "file observer finished");
        self.registry.release_file(&self.path);
    }
}
