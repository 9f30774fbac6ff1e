// src/watch/registry.rs

//! Supervised registry of per-path observer tasks.
//!
//! The registry is the only place observers are started. It owns:
//! - the [`DirectorySet`] / [`FileSet`] that say which paths are watched,
//! - the filesystem handle, glob filter and signal sender observers need,
//! - the cancellation token every observer loop selects on,
//! - a [`TaskTracker`] so shutdown can wait for all observers to exit,
//! - an optional cap on the number of concurrently running observers.

use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info};

use crate::engine::signal::SignalSender;
use crate::fs::FileSystem;
use crate::watch::dir_observer::DirectoryObserver;
use crate::watch::file_observer::FileObserver;
use crate::watch::path_set::{DirectorySet, FileSet};
use crate::watch::patterns::GlobFilter;

/// Default poll interval for every observer.
pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_millis(10);

/// Tunables for the observers started by a registry.
#[derive(Debug, Clone, Copy)]
pub struct ObserverSettings {
    pub check_interval: Duration,
    /// Maximum number of observers (directories + files) running at once.
    /// `None` means unbounded.
    pub max_watchers: Option<usize>,
}

impl Default for ObserverSettings {
    fn default() -> Self {
        Self {
            check_interval: DEFAULT_CHECK_INTERVAL,
            max_watchers: None,
        }
    }
}

struct RegistryInner {
    directories: DirectorySet,
    files: FileSet,
    fs: Arc<dyn FileSystem>,
    filter: GlobFilter,
    signals: SignalSender,
    settings: ObserverSettings,
    active: AtomicUsize,
    cancel: CancellationToken,
    tracker: TaskTracker,
}

/// Cheaply cloneable handle; every observer holds one.
#[derive(Clone)]
pub struct ObserverRegistry {
    inner: Arc<RegistryInner>,
}

impl fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("directories", &self.inner.directories.len())
            .field("files", &self.inner.files.len())
            .field("settings", &self.inner.settings)
            .finish_non_exhaustive()
    }
}

impl ObserverRegistry {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        filter: GlobFilter,
        signals: SignalSender,
        settings: ObserverSettings,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                directories: DirectorySet::new(),
                files: FileSet::new(),
                fs,
                filter,
                signals,
                settings,
                active: AtomicUsize::new(0),
                cancel,
                tracker: TaskTracker::new(),
            }),
        }
    }

    pub fn directories(&self) -> &DirectorySet {
        &self.inner.directories
    }

    pub fn files(&self) -> &FileSet {
        &self.inner.files
    }

    pub fn fs(&self) -> &dyn FileSystem {
        self.inner.fs.as_ref()
    }

    pub fn filter(&self) -> &GlobFilter {
        &self.inner.filter
    }

    pub fn signals(&self) -> &SignalSender {
        &self.inner.signals
    }

    pub fn check_interval(&self) -> Duration {
        self.inner.settings.check_interval
    }

    pub fn cancel_token(&self) -> &CancellationToken {
        &self.inner.cancel
    }

    /// Number of observers currently holding a slot.
    pub fn active_observers(&self) -> usize {
        self.inner.active.load(Ordering::Acquire)
    }

    /// Start a [`DirectoryObserver`] for `path` unless one already exists.
    ///
    /// Returns false if the path is already watched, the registry is shutting
    /// down, or the observer cap is reached (the next listing retries).
    pub fn spawn_directory(&self, path: &Path) -> bool {
        if self.inner.cancel.is_cancelled() || self.inner.directories.contains(path) {
            return false;
        }
        if !self.reserve_slot() {
            debug!(?path, "observer cap reached; deferring directory");
            return false;
        }
        if !self.inner.directories.claim(path) {
            self.release_slot();
            return false;
        }

        debug!(?path, "watching directory");
        let observer = DirectoryObserver::new(path.to_path_buf(), self.clone());
        self.inner.tracker.spawn(observer.run());
        true
    }

    /// Start a [`FileObserver`] for `path` unless one already exists.
    ///
    /// Same return semantics as [`ObserverRegistry::spawn_directory`].
    pub fn spawn_file(&self, path: &Path) -> bool {
        if self.inner.cancel.is_cancelled() || self.inner.files.contains(path) {
            return false;
        }
        if !self.reserve_slot() {
            debug!(?path, "observer cap reached; deferring file");
            return false;
        }
        if !self.inner.files.claim(path) {
            self.release_slot();
            return false;
        }

        debug!(?path, "watching file");
        let observer = FileObserver::new(path.to_path_buf(), self.clone());
        self.inner.tracker.spawn(observer.run());
        true
    }

    /// Called by a directory observer on exit.
    pub(crate) fn release_directory(&self, path: &Path) {
        self.inner.directories.remove(path);
        self.release_slot();
    }

    /// Called by a file observer on exit.
    pub(crate) fn release_file(&self, path: &Path) {
        self.inner.files.remove(path);
        self.release_slot();
    }

    /// Stop every observer and wait until all of them have exited.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();
        self.inner.tracker.close();
        self.inner.tracker.wait().await;
        info!("all observers stopped");
    }

    fn reserve_slot(&self) -> bool {
        let max = self.inner.settings.max_watchers;
        self.inner
            .active
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| match max {
                Some(max) if n >= max => None,
                _ => Some(n + 1),
            })
            .is_ok()
    }

    fn release_slot(&self) {
        self.inner.active.fetch_sub(1, Ordering::AcqRel);
    }
}
