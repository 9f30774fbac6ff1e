use std::path::PathBuf;
use std::time::Duration;

use filewatcher::config::WatchConfig;
use filewatcher::types::OverlapPolicy;

/// Builder for `WatchConfig` to simplify test setup.
///
/// Defaults to a fast poll (2ms) and run interval (5ms) rooted at `"."`, so
/// tests against `MockFileSystem` settle quickly.
pub struct WatchConfigBuilder {
    config: WatchConfig,
}

impl WatchConfigBuilder {
    pub fn new() -> Self {
        let mut config = WatchConfig::new("true");
        config.check_interval = Duration::from_millis(2);
        config.run_interval = Duration::from_millis(5);
        Self { config }
    }

    pub fn command(mut self, command: &str) -> Self {
        self.config.command = command.to_string();
        self
    }

    pub fn glob(mut self, glob: &str) -> Self {
        self.config.glob = glob.to_string();
        self
    }

    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.root = root.into();
        self
    }

    pub fn check_interval(mut self, interval: Duration) -> Self {
        self.config.check_interval = interval;
        self
    }

    pub fn run_interval(mut self, interval: Duration) -> Self {
        self.config.run_interval = interval;
        self
    }

    pub fn max_watchers(mut self, max: usize) -> Self {
        self.config.max_watchers = Some(max);
        self
    }

    pub fn overlap(mut self, policy: OverlapPolicy) -> Self {
        self.config.overlap = policy;
        self
    }

    pub fn build(self) -> WatchConfig {
        self.config
    }
}

impl Default for WatchConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
