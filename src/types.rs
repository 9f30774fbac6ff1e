use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// What happens when the action is dispatched while a previous run of it is
/// still in flight.
///
/// - `AllowOverlap`: start another run immediately; runs may overlap
///   (default behaviour).
/// - `Serialize`: never run two instances at once. A dispatch during a run
///   marks one follow-up run as pending; further dispatches coalesce into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverlapPolicy {
    AllowOverlap,
    Serialize,
}

impl Default for OverlapPolicy {
    fn default() -> Self {
        OverlapPolicy::AllowOverlap
    }
}

impl FromStr for OverlapPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "allow-overlap" | "allow_overlap" | "overlap" => Ok(OverlapPolicy::AllowOverlap),
            "serialize" | "serialise" => Ok(OverlapPolicy::Serialize),
            other => Err(format!(
                "invalid overlap policy: {other} (expected \"allow-overlap\" or \"serialize\")"
            )),
        }
    }
}

impl fmt::Display for OverlapPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverlapPolicy::AllowOverlap => f.write_str("allow-overlap"),
            OverlapPolicy::Serialize => f.write_str("serialize"),
        }
    }
}

/// Kind of a directory entry as reported by a listing.
///
/// Symlinks are reported as `File`: the observer's stat follows the link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
}
