// src/watch/dir_observer.rs

//! Per-directory polling loop.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::fs::is_gone;
use crate::types::EntryKind;
use crate::watch::registry::ObserverRegistry;

/// Outcome of a single listing cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirPoll {
    /// The directory was listed; counts are observers started this cycle.
    Listed {
        spawned_dirs: usize,
        spawned_files: usize,
    },
    /// The directory no longer exists; the observer stops.
    Gone,
    /// Listing failed for another reason; retried next cycle.
    Failed,
}

/// Re-lists one directory every check interval and starts observers for new
/// subdirectories and matching files.
///
/// Listing again instead of diffing keeps the state trivial; the registry's
/// claim is what stops a path from getting a second observer.
#[derive(Debug)]
pub struct DirectoryObserver {
    path: PathBuf,
    registry: ObserverRegistry,
}

impl DirectoryObserver {
    pub fn new(path: PathBuf, registry: ObserverRegistry) -> Self {
        Self { path, registry }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn poll_once(&self) -> DirPoll {
        let entries = match self.registry.fs().read_dir(&self.path) {
            Ok(entries) => entries,
            Err(err) if is_gone(&err) => {
                debug!(path = ?self.path, "directory disappeared");
                return DirPoll::Gone;
            }
            Err(err) => {
                warn!(path = ?self.path, error = %err, "list dir error");
                return DirPoll::Failed;
            }
        };

        let mut spawned_dirs = 0;
        let mut spawned_files = 0;

        for entry in entries {
            match entry.kind {
                EntryKind::Directory => {
                    if self.registry.spawn_directory(&entry.path) {
                        spawned_dirs += 1;
                    }
                }
                EntryKind::File => {
                    let matched = entry
                        .name()
                        .is_some_and(|name| self.registry.filter().matches(name));
                    if matched && self.registry.spawn_file(&entry.path) {
                        spawned_files += 1;
                    }
                }
            }
        }

        DirPoll::Listed {
            spawned_dirs,
            spawned_files,
        }
    }

    /// Poll until the directory disappears or the registry is cancelled.
    pub async fn run(self) {
        let cancel = self.registry.cancel_token().clone();
        let interval = self.registry.check_interval();

        loop {
            if self.poll_once() == DirPoll::Gone {
                break;
            }

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(interval) => {}
            }
        }

        debug!(path = ?self.path, "directory observer finished");
        self.registry.release_directory(&self.path);
    }
}
