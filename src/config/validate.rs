// src/config/validate.rs

use std::time::Duration;

use crate::config::model::{RawWatchSection, WatchConfig};
use crate::errors::{FileWatcherError, Result};
use crate::fs::FileSystem;

impl TryFrom<RawWatchSection> for WatchConfig {
    type Error = FileWatcherError;

    fn try_from(raw: RawWatchSection) -> std::result::Result<Self, Self::Error> {
        let command = match raw.command {
            Some(cmd) if !cmd.trim().is_empty() => cmd,
            _ => {
                return Err(FileWatcherError::ConfigError(
                    "a command to run is required (positional COMMAND or [watch].command)"
                        .to_string(),
                ));
            }
        };

        let mut config = WatchConfig::new(command);

        if let Some(glob) = raw.glob {
            config.glob = glob;
        }
        if let Some(root) = raw.root {
            config.root = root;
        }
        if let Some(s) = raw.check_interval {
            config.check_interval = parse_interval("check_interval", &s)?;
        }
        if let Some(s) = raw.run_interval {
            config.run_interval = parse_interval("run_interval", &s)?;
        }
        if let Some(max) = raw.max_watchers {
            if max == 0 {
                return Err(FileWatcherError::ConfigError(
                    "max_watchers must be >= 1 (got 0)".to_string(),
                ));
            }
            config.max_watchers = Some(max);
        }
        if let Some(overlap) = raw.overlap {
            config.overlap = overlap;
        }
        if let Some(capacity) = raw.signal_capacity {
            if capacity == 0 {
                return Err(FileWatcherError::ConfigError(
                    "signal_capacity must be >= 1 (got 0)".to_string(),
                ));
            }
            config.signal_capacity = capacity;
        }

        Ok(config)
    }
}

/// Check that the watch root exists and is a directory.
pub fn validate_root(config: &WatchConfig, fs: &dyn FileSystem) -> Result<()> {
    if !fs.is_dir(&config.root) {
        return Err(FileWatcherError::ConfigError(format!(
            "root {:?} is not an existing directory",
            config.root
        )));
    }
    Ok(())
}

fn parse_interval(field: &str, s: &str) -> Result<Duration> {
    let duration = parse_duration(s)
        .map_err(|e| FileWatcherError::ConfigError(format!("invalid {field}: {e}")))?;
    if duration.is_zero() {
        return Err(FileWatcherError::ConfigError(format!(
            "{field} must be greater than zero"
        )));
    }
    Ok(duration)
}

/// Parse a duration like `"10ms"`, `"2s"`, `"500us"`, `"1m"` or `"1h"`.
pub fn parse_duration(s: &str) -> std::result::Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    let idx = s
        .chars()
        .position(|c| !c.is_ascii_digit())
        .ok_or_else(|| "duration missing unit suffix".to_string())?;

    let (num_part, unit_part) = s.split_at(idx);
    let value: u64 = num_part
        .parse()
        .map_err(|e| format!("invalid duration number '{}': {}", num_part, e))?;
    let unit = unit_part.trim().to_lowercase();

    match unit.as_str() {
        "us" => Ok(Duration::from_micros(value)),
        "ms" => Ok(Duration::from_millis(value)),
        "s" => Ok(Duration::from_secs(value)),
        "m" => Ok(Duration::from_secs(value.saturating_mul(60))),
        "h" => Ok(Duration::from_secs(value.saturating_mul(60 * 60))),
        _ => Err(format!(
            "unsupported duration unit '{}'; expected us, ms, s, m, or h",
            unit
        )),
    }
}
