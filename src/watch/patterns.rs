// src/watch/patterns.rs

use std::fmt;
use std::path::Path;

use globset::{Glob, GlobMatcher};

use crate::errors::{FileWatcherError, Result};

/// Glob that matches everything; the default when no pattern is given.
pub const MATCH_ALL: &str = "*";

/// Compiled file-name glob.
///
/// Patterns are matched against a file's *name*, not its path relative to the
/// root, so `*.txt` matches `a.txt` in any subdirectory.
#[derive(Clone)]
pub struct GlobFilter {
    pattern: String,
    matcher: GlobMatcher,
}

impl fmt::Debug for GlobFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlobFilter")
            .field("pattern", &self.pattern)
            .finish_non_exhaustive()
    }
}

impl GlobFilter {
    /// Compile `pattern`. Fails with [`FileWatcherError::InvalidGlob`].
    pub fn new(pattern: &str) -> Result<Self> {
        let glob = Glob::new(pattern).map_err(|source| FileWatcherError::InvalidGlob {
            pattern: pattern.to_string(),
            source,
        })?;

        Ok(Self {
            pattern: pattern.to_string(),
            matcher: glob.compile_matcher(),
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// `name` is a bare file name; it need not be valid UTF-8.
    pub fn matches(&self, name: impl AsRef<Path>) -> bool {
        self.matcher.is_match(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_on_file_names() {
        let txt = GlobFilter::new("*.txt").unwrap();
        assert!(txt.matches("a.txt"));
        assert!(!txt.matches("b.log"));

        let alternatives = GlobFilter::new("*.{rs,toml}").unwrap();
        assert!(alternatives.matches("main.rs"));
        assert!(alternatives.matches("Cargo.toml"));
        assert!(!alternatives.matches("README.md"));
    }

    #[test]
    fn match_all_matches_everything() {
        let all = GlobFilter::new(MATCH_ALL).unwrap();
        assert_eq!(all.pattern(), MATCH_ALL);
        assert!(all.matches("anything.at.all"));
        assert!(all.matches(".hidden"));
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_names_still_match() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let name = OsStr::from_bytes(b"\xffname.txt");
        assert!(GlobFilter::new(MATCH_ALL).unwrap().matches(name));
        assert!(GlobFilter::new("*.txt").unwrap().matches(name));
        assert!(!GlobFilter::new("*.log").unwrap().matches(name));
    }

    #[test]
    fn invalid_pattern_is_a_construction_error() {
        match GlobFilter::new("a[") {
            Err(FileWatcherError::InvalidGlob { pattern, .. }) => assert_eq!(pattern, "a["),
            other => panic!("expected InvalidGlob, got {other:?}"),
        }
    }
}
