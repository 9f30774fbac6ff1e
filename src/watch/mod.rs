// src/watch/mod.rs

//! Poll-based file watching.
//!
//! This module is responsible for:
//! - Compiling the file-name glob.
//! - Tracking which directories and files currently have an observer.
//! - Running one polling task per watched directory and per watched file,
//!   all started and stopped through the [`ObserverRegistry`].
//!
//! It does **not** know what the action is; file observers only push unit
//! change signals onto the channel owned by the engine.

pub mod dir_observer;
pub mod file_observer;
pub mod path_set;
pub mod patterns;
pub mod registry;

pub use dir_observer::{DirPoll, DirectoryObserver};
pub use file_observer::{FileObserver, FilePoll};
pub use path_set::{DirectorySet, FileSet};
pub use patterns::{GlobFilter, MATCH_ALL};
pub use registry::{DEFAULT_CHECK_INTERVAL, ObserverRegistry, ObserverSettings};
