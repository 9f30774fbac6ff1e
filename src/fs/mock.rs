// src/fs/mock.rs

use super::{DirEntry, FileStat, FileSystem};
use crate::types::EntryKind;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::SystemTime;

#[derive(Debug, Clone)]
pub enum MockEntry {
    File(SystemTime),
    Dir(Vec<String>), // List of child names
}

#[derive(Debug, Default)]
struct MockState {
    entries: HashMap<PathBuf, MockEntry>,
    failures: HashMap<PathBuf, io::ErrorKind>,
    listings: HashMap<PathBuf, usize>,
}

/// In-memory filesystem for observer tests.
///
/// Paths are used verbatim (no normalisation); `"."` exists from the start.
/// Cloning yields another handle onto the same state.
#[derive(Debug, Clone)]
pub struct MockFileSystem {
    state: Arc<Mutex<MockState>>,
}

impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl MockFileSystem {
    pub fn new() -> Self {
        let mut state = MockState::default();
        state
            .entries
            .insert(PathBuf::from("."), MockEntry::Dir(Vec::new()));

        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Create or update a file with the given modification time. Parent
    /// directories are created implicitly.
    pub fn add_file(&self, path: impl AsRef<Path>, modified: SystemTime) {
        let path = path.as_ref().to_path_buf();
        let mut state = self.lock();
        state.entries.insert(path.clone(), MockEntry::File(modified));
        link_into_parent(&mut state.entries, &path);
    }

    /// Alias for [`MockFileSystem::add_file`] that reads better when the file
    /// already exists.
    pub fn touch(&self, path: impl AsRef<Path>, modified: SystemTime) {
        self.add_file(path, modified);
    }

    /// Create an (empty) directory and any missing parents.
    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let path = path.as_ref().to_path_buf();
        let mut state = self.lock();
        ensure_dir_entry(&mut state.entries, &path);
    }

    /// Remove a file or a directory with everything below it.
    pub fn remove(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let mut state = self.lock();
        state
            .entries
            .retain(|p, _| p != path && !p.starts_with(path));

        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            let parent = parent_of(path);
            if let Some(MockEntry::Dir(children)) = state.entries.get_mut(&parent) {
                children.retain(|c| c != name);
            }
        }
    }

    /// Make every listing or stat of `path` fail with `kind` until cleared.
    pub fn fail_with(&self, path: impl AsRef<Path>, kind: io::ErrorKind) {
        self.lock()
            .failures
            .insert(path.as_ref().to_path_buf(), kind);
    }

    pub fn clear_failure(&self, path: impl AsRef<Path>) {
        self.lock().failures.remove(path.as_ref());
    }

    /// How many times `path` has been listed.
    pub fn listing_count(&self, path: impl AsRef<Path>) -> usize {
        self.lock()
            .listings
            .get(path.as_ref())
            .copied()
            .unwrap_or(0)
    }
}

fn parent_of(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn link_into_parent(entries: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
    let parent = parent_of(path);
    if parent == path {
        return;
    }
    ensure_dir_entry(entries, &parent);
    if let Some(MockEntry::Dir(children)) = entries.get_mut(&parent) {
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if !children.iter().any(|c| c == name) {
                children.push(name.to_string());
            }
        }
    }
}

fn ensure_dir_entry(entries: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
    if !matches!(entries.get(path), Some(MockEntry::Dir(_))) {
        entries.insert(path.to_path_buf(), MockEntry::Dir(Vec::new()));
        link_into_parent(entries, path);
    }
}

impl FileSystem for MockFileSystem {
    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        let mut state = self.lock();
        *state.listings.entry(path.to_path_buf()).or_insert(0) += 1;

        if let Some(kind) = state.failures.get(path) {
            return Err(io::Error::new(*kind, format!("injected failure: {path:?}")));
        }

        match state.entries.get(path) {
            Some(MockEntry::Dir(children)) => Ok(children
                .iter()
                .filter_map(|name| {
                    let child = path.join(name);
                    let kind = match state.entries.get(&child)? {
                        MockEntry::Dir(_) => EntryKind::Directory,
                        MockEntry::File(_) => EntryKind::File,
                    };
                    Some(DirEntry { path: child, kind })
                })
                .collect()),
            Some(MockEntry::File(_)) => Err(io::Error::new(
                io::ErrorKind::NotADirectory,
                format!("not a directory: {path:?}"),
            )),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("not found: {path:?}"),
            )),
        }
    }

    fn stat(&self, path: &Path) -> io::Result<FileStat> {
        let state = self.lock();

        if let Some(kind) = state.failures.get(path) {
            return Err(io::Error::new(*kind, format!("injected failure: {path:?}")));
        }

        match state.entries.get(path) {
            Some(MockEntry::File(modified)) => Ok(FileStat {
                modified: *modified,
                is_dir: false,
                is_symlink: false,
            }),
            Some(MockEntry::Dir(_)) => Ok(FileStat {
                modified: SystemTime::UNIX_EPOCH,
                is_dir: true,
                is_symlink: false,
            }),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("not found: {path:?}"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn at(secs: u64) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(secs)
    }

    #[test]
    fn nested_files_create_parent_dirs() {
        let fs = MockFileSystem::new();
        fs.add_file("./src/deep/a.rs", at(1));

        let root = fs.read_dir(Path::new(".")).unwrap();
        assert_eq!(root.len(), 1);
        assert_eq!(root[0].kind, EntryKind::Directory);

        let deep = fs.read_dir(Path::new("./src/deep")).unwrap();
        assert_eq!(deep[0].name(), Some(std::ffi::OsStr::new("a.rs")));
        assert_eq!(fs.stat(Path::new("./src/deep/a.rs")).unwrap().modified, at(1));
    }

    #[test]
    fn remove_drops_subtree_and_parent_link() {
        let fs = MockFileSystem::new();
        fs.add_file("./src/a.rs", at(1));
        fs.add_file("./src/sub/b.rs", at(1));

        fs.remove("./src");

        assert!(fs.read_dir(Path::new(".")).unwrap().is_empty());
        let err = fs.stat(Path::new("./src/sub/b.rs")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn injected_failures_apply_until_cleared() {
        let fs = MockFileSystem::new();
        fs.add_dir("./locked");
        fs.fail_with("./locked", io::ErrorKind::PermissionDenied);

        let err = fs.read_dir(Path::new("./locked")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);

        fs.clear_failure("./locked");
        assert!(fs.read_dir(Path::new("./locked")).unwrap().is_empty());
        assert_eq!(fs.listing_count("./locked"), 2);
    }

    #[test]
    fn listing_a_file_reports_not_a_directory() {
        let fs = MockFileSystem::new();
        fs.add_file("./a.txt", at(1));
        let err = fs.read_dir(Path::new("./a.txt")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotADirectory);
    }
}
