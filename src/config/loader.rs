// src/config/loader.rs

use std::fs;
use std::path::Path;

use crate::config::model::{RawConfigFile, RawWatchSection, WatchConfig};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw
/// `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] or [`resolve_config`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let contents = fs::read_to_string(path.as_ref())?;
    let config: RawConfigFile = toml::from_str(&contents)?;
    Ok(config)
}

/// Load a configuration file and validate its `[watch]` section on its own.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<WatchConfig> {
    let raw = load_from_path(path)?;
    WatchConfig::try_from(raw.watch)
}

/// Resolve the effective configuration.
///
/// Precedence: `overrides` (CLI flags) > config file at `path` (if any) >
/// built-in defaults.
pub fn resolve_config(path: Option<&Path>, overrides: RawWatchSection) -> Result<WatchConfig> {
    let base = match path {
        Some(path) => load_from_path(path)?.watch,
        None => RawWatchSection::default(),
    };
    WatchConfig::try_from(base.merge(overrides))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;

    use tempfile::NamedTempFile;

    use crate::errors::FileWatcherError;
    use crate::types::OverlapPolicy;

    fn config_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{contents}").unwrap();
        file
    }

    #[test]
    fn cli_overrides_file_values() {
        let file = config_file(
            r#"
[watch]
command = "make"
glob = "*.c"
run_interval = "1s"
overlap = "serialize"
"#,
        );
        let overrides = RawWatchSection {
            glob: Some("*.h".to_string()),
            ..Default::default()
        };

        let config = resolve_config(Some(file.path()), overrides).unwrap();

        assert_eq!(config.command, "make");
        assert_eq!(config.glob, "*.h");
        assert_eq!(config.run_interval, Duration::from_secs(1));
        assert_eq!(config.overlap, OverlapPolicy::Serialize);
    }

    #[test]
    fn malformed_toml_is_a_toml_error() {
        let file = config_file("[watch\ncommand = ");
        assert!(matches!(
            load_and_validate(file.path()),
            Err(FileWatcherError::TomlError(_))
        ));
    }

    #[test]
    fn unknown_overlap_policy_is_rejected() {
        let file = config_file("[watch]\ncommand = \"make\"\noverlap = \"sometimes\"\n");
        assert!(load_and_validate(file.path()).is_err());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = resolve_config(
            Some(Path::new("/definitely/not/here/filewatcher.toml")),
            RawWatchSection::default(),
        );
        assert!(matches!(result, Err(FileWatcherError::IoError(_))));
    }
}
