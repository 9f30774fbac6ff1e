// src/fs/mod.rs

//! Filesystem abstraction used by the observers.
//!
//! Observers only ever list directories and stat files, so the trait is kept
//! to exactly those operations. Errors are plain `std::io::Error`s because
//! the observers branch on [`std::io::ErrorKind`] to tell "the path is gone"
//! apart from transient failures.

use std::ffi::OsStr;
use std::fmt::Debug;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::{trace, warn};

use crate::types::EntryKind;

pub mod mock;

/// A single entry returned by [`FileSystem::read_dir`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// Full path (the listed directory joined with the entry name).
    pub path: PathBuf,
    pub kind: EntryKind,
}

impl DirEntry {
    /// The entry's file name, used for glob matching.
    pub fn name(&self) -> Option<&OsStr> {
        self.path.file_name()
    }
}

/// Result of stat'ing a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStat {
    pub modified: SystemTime,
    /// Whether the target is a directory (after following a symlink).
    pub is_dir: bool,
    /// Whether `path` itself is a symlink.
    pub is_symlink: bool,
}

/// Abstract filesystem interface.
pub trait FileSystem: Send + Sync + Debug {
    /// List the entries of a directory. Returns full paths.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>>;

    /// Stat a path, following symlinks.
    fn stat(&self, path: &Path) -> io::Result<FileStat>;

    fn is_dir(&self, path: &Path) -> bool {
        self.stat(path).map(|s| s.is_dir).unwrap_or(false)
    }
}

/// Returns true if `err` means the path no longer exists in the shape the
/// observer expects, which ends that observer.
pub fn is_gone(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
    )
}

/// Implementation that uses `std::fs`.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    /// Only a failure to open `path` itself is an error. Entries that fail
    /// on their own are skipped so one vanished sibling cannot end the
    /// listing.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    skip_entry(path, &err);
                    continue;
                }
            };
            let entry_path = entry.path();
            if let Some(kind) = entry_kind(&entry_path, entry.file_type()) {
                entries.push(DirEntry {
                    path: entry_path,
                    kind,
                });
            }
        }
        Ok(entries)
    }

    fn stat(&self, path: &Path) -> io::Result<FileStat> {
        let link_meta = fs::symlink_metadata(path)?;
        let is_symlink = link_meta.file_type().is_symlink();
        let meta = if is_symlink {
            fs::metadata(path)?
        } else {
            link_meta
        };
        Ok(FileStat {
            modified: meta.modified()?,
            is_dir: meta.is_dir(),
            is_symlink,
        })
    }
}

/// Classify one listed entry; `None` means skip it this cycle.
///
/// `file_type` does not follow symlinks, so a link is always a file here,
/// even when it points at a directory; its target's mtime is what gets
/// watched. Dangling links are skipped until their target exists.
fn entry_kind(path: &Path, file_type: io::Result<fs::FileType>) -> Option<EntryKind> {
    let file_type = match file_type {
        Ok(file_type) => file_type,
        Err(err) => {
            skip_entry(path, &err);
            return None;
        }
    };

    if file_type.is_dir() {
        return Some(EntryKind::Directory);
    }
    if file_type.is_symlink() {
        if let Err(err) = fs::metadata(path) {
            skip_entry(path, &err);
            return None;
        }
    }
    Some(EntryKind::File)
}

fn skip_entry(path: &Path, err: &io::Error) {
    if is_gone(err) {
        trace!(?path, "entry vanished during listing");
    } else {
        warn!(?path, error = %err, "dir entry error");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn real_fs_lists_and_stats_a_temp_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), b"a").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();

        let fs = RealFileSystem;
        let mut entries = fs.read_dir(dir.path()).unwrap();
        entries.sort_by(|a, b| a.path.cmp(&b.path));

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name(), Some(OsStr::new("a.txt")));
        assert_eq!(entries[0].kind, EntryKind::File);
        assert_eq!(entries[1].kind, EntryKind::Directory);

        assert!(!fs.stat(&dir.path().join("a.txt")).unwrap().is_dir);
        assert!(fs.is_dir(&dir.path().join("sub")));

        let err = fs.read_dir(&dir.path().join("missing")).unwrap_err();
        assert!(is_gone(&err));
    }

    #[test]
    fn vanished_or_broken_entries_are_skipped() {
        let path = Path::new("gone.txt");
        let vanished = Err(io::Error::from(io::ErrorKind::NotFound));
        assert_eq!(entry_kind(path, vanished), None);

        let denied = Err(io::Error::from(io::ErrorKind::PermissionDenied));
        assert_eq!(entry_kind(path, denied), None);
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_are_files_and_dangling_ones_are_skipped() {
        use std::os::unix::fs::symlink;

        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("real")).unwrap();
        symlink(dir.path().join("real"), dir.path().join("link")).unwrap();
        symlink(dir.path().join("nowhere"), dir.path().join("dangling")).unwrap();

        let fs = RealFileSystem;
        let mut entries = fs.read_dir(dir.path()).unwrap();
        entries.sort_by(|a, b| a.path.cmp(&b.path));

        let names: Vec<_> = entries.iter().filter_map(|e| e.name()).collect();
        assert_eq!(names, vec![OsStr::new("link"), OsStr::new("real")]);
        assert_eq!(entries[0].kind, EntryKind::File);
        assert_eq!(entries[1].kind, EntryKind::Directory);

        let link = fs.stat(&dir.path().join("link")).unwrap();
        assert!(link.is_dir);
        assert!(link.is_symlink);
        assert!(!fs.stat(&dir.path().join("real")).unwrap().is_symlink);
    }
}
