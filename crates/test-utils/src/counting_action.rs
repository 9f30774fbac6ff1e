use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use filewatcher::errors::{FileWatcherError, Result};
use filewatcher::exec::ActionRunner;

/// A fake action that:
/// - counts how many times it was run
/// - optionally fails every run, to check the watcher shrugs it off.
///
/// Clones share the same counter, so a test can keep one handle and give
/// the other to the engine.
#[derive(Debug, Clone, Default)]
pub struct CountingAction {
    runs: Arc<AtomicUsize>,
    fail: bool,
}

impl CountingAction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            runs: Arc::new(AtomicUsize::new(0)),
            fail: true,
        }
    }

    pub fn runs(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }
}

impl ActionRunner for CountingAction {
    fn run(&self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            self.runs.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(FileWatcherError::Other(anyhow::anyhow!(
                    "counting action configured to fail"
                )));
            }
            Ok(())
        })
    }
}
