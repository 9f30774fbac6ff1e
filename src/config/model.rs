// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::engine::signal::DEFAULT_SIGNAL_CAPACITY;
use crate::engine::trigger::DEFAULT_RUN_INTERVAL;
use crate::types::OverlapPolicy;
use crate::watch::patterns::MATCH_ALL;
use crate::watch::registry::{DEFAULT_CHECK_INTERVAL, ObserverSettings};

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [watch]
/// command = "cargo test"
/// glob = "*.rs"
/// root = "."
/// check_interval = "10ms"
/// run_interval = "10ms"
/// max_watchers = 4096
/// overlap = "serialize"
/// signal_capacity = 64
/// ```
///
/// All keys are optional; CLI flags override them and anything still unset
/// falls back to the defaults on [`WatchConfig`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub watch: RawWatchSection,
}

/// `[watch]` section, also used to carry CLI overrides.
///
/// Durations stay strings here (e.g. `"250ms"`) and are parsed during
/// validation so that file values and CLI values go through the same checks.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawWatchSection {
    pub command: Option<String>,
    pub glob: Option<String>,
    pub root: Option<PathBuf>,
    pub check_interval: Option<String>,
    pub run_interval: Option<String>,
    pub max_watchers: Option<usize>,
    pub overlap: Option<OverlapPolicy>,
    pub signal_capacity: Option<usize>,
}

impl RawWatchSection {
    /// Layer `overrides` on top of `self`: every value set in `overrides`
    /// wins.
    pub fn merge(self, overrides: RawWatchSection) -> RawWatchSection {
        RawWatchSection {
            command: overrides.command.or(self.command),
            glob: overrides.glob.or(self.glob),
            root: overrides.root.or(self.root),
            check_interval: overrides.check_interval.or(self.check_interval),
            run_interval: overrides.run_interval.or(self.run_interval),
            max_watchers: overrides.max_watchers.or(self.max_watchers),
            overlap: overrides.overlap.or(self.overlap),
            signal_capacity: overrides.signal_capacity.or(self.signal_capacity),
        }
    }
}

/// Fully resolved engine configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchConfig {
    /// Command to run on change; split on whitespace when executed.
    pub command: String,
    /// File-name glob.
    pub glob: String,
    /// Directory the recursive watch starts from.
    pub root: PathBuf,
    /// How often every observer polls its path.
    pub check_interval: Duration,
    /// Minimum spacing between two action runs.
    pub run_interval: Duration,
    /// Cap on concurrently running observers; `None` is unbounded.
    pub max_watchers: Option<usize>,
    pub overlap: OverlapPolicy,
    /// Size of the change-signal queue.
    pub signal_capacity: usize,
}

impl WatchConfig {
    /// Configuration with every default applied. Not validated.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            glob: MATCH_ALL.to_string(),
            root: PathBuf::from("."),
            check_interval: DEFAULT_CHECK_INTERVAL,
            run_interval: DEFAULT_RUN_INTERVAL,
            max_watchers: None,
            overlap: OverlapPolicy::default(),
            signal_capacity: DEFAULT_SIGNAL_CAPACITY,
        }
    }

    pub fn observer_settings(&self) -> ObserverSettings {
        ObserverSettings {
            check_interval: self.check_interval,
            max_watchers: self.max_watchers,
        }
    }
}
