// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::RawWatchSection;
use crate::types::OverlapPolicy;

/// Command-line arguments for `filewatcher`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "filewatcher",
    version,
    about = "Run a command whenever files matching a glob change.",
    long_about = None
)]
pub struct CliArgs {
    /// Command to run on file change.
    ///
    /// Either a single quoted string or the remaining arguments; split on
    /// whitespace before running. Optional if the config file sets it.
    #[arg(value_name = "COMMAND", trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,

    /// Files to watch (glob matched against file names). Default: `*`.
    #[arg(short = 'g', long, value_name = "GLOB")]
    pub glob: Option<String>,

    /// Directory root to watch from. Default: `.`.
    #[arg(short = 'r', long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// How often every watched path is polled (e.g. `10ms`).
    #[arg(long, value_name = "DURATION")]
    pub check_interval: Option<String>,

    /// Minimum time between two runs of the command (e.g. `10ms`).
    #[arg(long, value_name = "DURATION")]
    pub run_interval: Option<String>,

    /// Maximum number of paths polled at once. Default: unbounded.
    #[arg(long, value_name = "N")]
    pub max_watchers: Option<usize>,

    /// Whether a new run may start while the previous one is still going.
    #[arg(long, value_enum, value_name = "POLICY")]
    pub overlap: Option<OverlapArg>,

    /// Size of the change-signal queue.
    #[arg(long, value_name = "N")]
    pub signal_capacity: Option<usize>,

    /// Optional TOML config file; CLI flags take precedence over it.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `FILEWATCHER_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Resolve + validate the configuration, print it, but don't watch.
    #[arg(long)]
    pub dry_run: bool,
}

impl CliArgs {
    /// The flags that were actually given, as a config layer.
    pub fn overrides(&self) -> RawWatchSection {
        let command = if self.command.is_empty() {
            None
        } else {
            Some(self.command.join(" "))
        };

        RawWatchSection {
            command,
            glob: self.glob.clone(),
            root: self.root.clone(),
            check_interval: self.check_interval.clone(),
            run_interval: self.run_interval.clone(),
            max_watchers: self.max_watchers,
            overlap: self.overlap.map(OverlapPolicy::from),
            signal_capacity: self.signal_capacity,
        }
    }
}

/// Overlap policy as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum OverlapArg {
    AllowOverlap,
    Serialize,
}

impl From<OverlapArg> for OverlapPolicy {
    fn from(arg: OverlapArg) -> Self {
        match arg {
            OverlapArg::AllowOverlap => OverlapPolicy::AllowOverlap,
            OverlapArg::Serialize => OverlapPolicy::Serialize,
        }
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
