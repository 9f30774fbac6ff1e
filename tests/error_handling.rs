// tests/error_handling.rs

use std::io::Write;
use std::sync::Arc;

use filewatcher::config::{load_and_validate, resolve_config, RawWatchSection};
use filewatcher::engine::FileWatcher;
use filewatcher::errors::FileWatcherError;
use filewatcher::exec::CommandRunner;
use filewatcher::fs::mock::MockFileSystem;
use filewatcher_test_utils::builders::WatchConfigBuilder;
use filewatcher_test_utils::counting_action::CountingAction;
use tempfile::NamedTempFile;

#[test]
fn invalid_glob_fails_before_anything_starts() {
    let fs = MockFileSystem::new();
    let config = WatchConfigBuilder::new().glob("src/[").build();

    let result = FileWatcher::new(&config, Arc::new(fs.clone()), CountingAction::new());

    match result {
        Err(FileWatcherError::InvalidGlob { pattern, .. }) => assert_eq!(pattern, "src/["),
        Err(e) => panic!("Expected InvalidGlob error, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
    assert_eq!(fs.listing_count("."), 0);
}

#[test]
fn config_without_command_returns_config_error() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[watch]
glob = "*.rs"
"#
    )
    .unwrap();

    match load_and_validate(file.path()) {
        Err(FileWatcherError::ConfigError(msg)) => assert!(msg.contains("command")),
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn bad_interval_returns_config_error() {
    let overrides = RawWatchSection {
        command: Some("echo hi".to_string()),
        check_interval: Some("soon".to_string()),
        ..Default::default()
    };

    match resolve_config(None, overrides) {
        Err(FileWatcherError::ConfigError(msg)) => assert!(msg.contains("check_interval")),
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn blank_command_cannot_build_a_runner() {
    let config = WatchConfigBuilder::new().command("   ").build();

    match CommandRunner::new(&config.command) {
        Err(FileWatcherError::ConfigError(_)) => {}
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}
