// src/engine/runtime.rs

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::WatchConfig;
use crate::engine::signal::signal_channel;
use crate::engine::trigger::TriggerLoop;
use crate::errors::Result;
use crate::exec::{ActionDispatcher, ActionRunner};
use crate::fs::FileSystem;
use crate::watch::{GlobFilter, ObserverRegistry};

/// The watching engine: observers on one side, the trigger loop on the
/// other, joined by the change-signal channel.
///
/// Construction compiles the glob and wires everything up but starts no
/// task; [`FileWatcher::run`] starts the root observer and blocks in the
/// trigger loop until the cancellation token fires.
pub struct FileWatcher<A: ActionRunner> {
    root: PathBuf,
    registry: ObserverRegistry,
    trigger: TriggerLoop<A>,
    cancel: CancellationToken,
}

impl<A: ActionRunner> fmt::Debug for FileWatcher<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileWatcher")
            .field("root", &self.root)
            .field("registry", &self.registry)
            .field("trigger", &self.trigger)
            .finish_non_exhaustive()
    }
}

impl<A: ActionRunner> FileWatcher<A> {
    /// Fails with [`FileWatcherError::InvalidGlob`] if the glob does not
    /// compile; nothing is started in that case.
    ///
    /// [`FileWatcherError::InvalidGlob`]: crate::errors::FileWatcherError::InvalidGlob
    pub fn new(config: &WatchConfig, fs: Arc<dyn FileSystem>, action: A) -> Result<Self> {
        let filter = GlobFilter::new(&config.glob)?;
        let cancel = CancellationToken::new();
        let (signal_tx, signal_rx) = signal_channel(config.signal_capacity);

        let registry = ObserverRegistry::new(
            fs,
            filter,
            signal_tx,
            config.observer_settings(),
            cancel.clone(),
        );
        let dispatcher = ActionDispatcher::new(action, config.overlap);
        let trigger = TriggerLoop::new(signal_rx, dispatcher, config.run_interval);

        Ok(Self {
            root: config.root.clone(),
            registry,
            trigger,
            cancel,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Handle onto the observer registry, e.g. to inspect the path sets.
    pub fn registry(&self) -> &ObserverRegistry {
        &self.registry
    }

    /// Token that stops the engine when cancelled.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Watch until the cancellation token fires, then stop every observer.
    pub async fn run(self) -> Result<()> {
        info!(
            root = ?self.root,
            glob = %self.registry.filter().pattern(),
            check_interval = ?self.registry.check_interval(),
            "file watcher started"
        );

        if !self.registry.spawn_directory(&self.root) {
            warn!(root = ?self.root, "root directory observer was not started");
        }

        let batches = self.trigger.run(self.cancel.clone()).await;
        self.registry.shutdown().await;

        info!(batches, "file watcher stopped");
        Ok(())
    }
}
