// src/watch/path_set.rs

//! Concurrent bookkeeping of which paths currently have an observer.
//!
//! Two narrow sets instead of one generic map:
//! - [`DirectorySet`] only records presence.
//! - [`FileSet`] records the last modification time seen for each file.
//!
//! Every operation takes the mutex for exactly one map operation. `claim` is
//! the check-and-insert used before spawning an observer, so two listings
//! racing on the same new path cannot both win.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::SystemTime;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // Plain data behind the lock, so a poisoned guard is still consistent.
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Paths of directories that currently have an observer.
#[derive(Debug, Clone, Default)]
pub struct DirectorySet {
    inner: Arc<Mutex<HashSet<PathBuf>>>,
}

impl DirectorySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, path: impl Into<PathBuf>) {
        lock(&self.inner).insert(path.into());
    }

    /// Insert `path` if absent. Returns true if this call inserted it.
    pub fn claim(&self, path: &Path) -> bool {
        lock(&self.inner).insert(path.to_path_buf())
    }

    pub fn contains(&self, path: &Path) -> bool {
        lock(&self.inner).contains(path)
    }

    pub fn remove(&self, path: &Path) {
        lock(&self.inner).remove(path);
    }

    pub fn len(&self) -> usize {
        lock(&self.inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the tracked paths, sorted.
    pub fn paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<_> = lock(&self.inner).iter().cloned().collect();
        paths.sort();
        paths
    }
}

/// Files that currently have an observer, with their last seen mtime.
///
/// A freshly claimed file has no timestamp until its observer's first stat
/// records the baseline.
#[derive(Debug, Clone, Default)]
pub struct FileSet {
    inner: Arc<Mutex<HashMap<PathBuf, Option<SystemTime>>>>,
}

impl FileSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `modified` as the last seen modification time of `path`.
    pub fn set(&self, path: impl Into<PathBuf>, modified: SystemTime) {
        lock(&self.inner).insert(path.into(), Some(modified));
    }

    /// `None` if the path is not tracked; `Some(None)` if it is tracked but
    /// no baseline has been recorded yet.
    pub fn get(&self, path: &Path) -> Option<Option<SystemTime>> {
        lock(&self.inner).get(path).copied()
    }

    /// Insert `path` without a timestamp if absent. Returns true if this
    /// call inserted it.
    pub fn claim(&self, path: &Path) -> bool {
        let mut files = lock(&self.inner);
        if files.contains_key(path) {
            return false;
        }
        files.insert(path.to_path_buf(), None);
        true
    }

    pub fn contains(&self, path: &Path) -> bool {
        lock(&self.inner).contains_key(path)
    }

    pub fn remove(&self, path: &Path) {
        lock(&self.inner).remove(path);
    }

    pub fn len(&self) -> usize {
        lock(&self.inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the tracked paths, sorted.
    pub fn paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<_> = lock(&self.inner).keys().cloned().collect();
        paths.sort();
        paths
    }
}
