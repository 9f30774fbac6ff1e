// src/engine/trigger.rs

//! The debouncing trigger loop.

use std::fmt;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::engine::signal::SignalReceiver;
use crate::exec::{ActionDispatcher, ActionRunner};

/// Default minimum spacing between two action runs.
pub const DEFAULT_RUN_INTERVAL: Duration = Duration::from_millis(10);

/// Turns the stream of change signals into rate-limited action runs.
///
/// Each cycle:
/// 1. wait for one signal,
/// 2. drain whatever else is already queued (later arrivals start the next
///    cycle),
/// 3. dispatch the action without waiting for it,
/// 4. sleep `run_interval`.
pub struct TriggerLoop<A: ActionRunner> {
    signals: SignalReceiver,
    dispatcher: ActionDispatcher<A>,
    run_interval: Duration,
}

impl<A: ActionRunner> fmt::Debug for TriggerLoop<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TriggerLoop")
            .field("dispatcher", &self.dispatcher)
            .field("run_interval", &self.run_interval)
            .finish_non_exhaustive()
    }
}

impl<A: ActionRunner> TriggerLoop<A> {
    pub fn new(
        signals: SignalReceiver,
        dispatcher: ActionDispatcher<A>,
        run_interval: Duration,
    ) -> Self {
        Self {
            signals,
            dispatcher,
            run_interval,
        }
    }

    /// Run until `cancel` fires or every signal sender is dropped. Returns
    /// the number of batches dispatched.
    pub async fn run(mut self, cancel: CancellationToken) -> usize {
        info!(
            run_interval = ?self.run_interval,
            policy = %self.dispatcher.policy(),
            "trigger loop started"
        );
        let mut batches = 0;

        loop {
            let received = tokio::select! {
                _ = cancel.cancelled() => break,
                signal = self.signals.recv() => signal,
            };
            if received.is_none() {
                info!("signal channel closed; stopping trigger loop");
                break;
            }

            let coalesced = self.signals.drain() + 1;
            let outcome = self.dispatcher.dispatch();
            batches += 1;
            debug!(coalesced, ?outcome, batch = batches, "dispatched action");

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.run_interval) => {}
            }
        }

        info!(batches, "trigger loop finished");
        batches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::engine::signal::signal_channel;
    use crate::errors::{FileWatcherError, Result};
    use crate::types::OverlapPolicy;

    #[derive(Default)]
    struct Counter {
        runs: AtomicUsize,
        fail: bool,
    }

    impl ActionRunner for Counter {
        fn run(&self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
            Box::pin(async move {
                self.runs.fetch_add(1, Ordering::SeqCst);
                if self.fail {
                    return Err(FileWatcherError::ConfigError("fails on purpose".to_string()));
                }
                Ok(())
            })
        }
    }

    fn trigger_loop(
        counter: &Arc<Counter>,
        run_interval: Duration,
    ) -> (crate::engine::signal::SignalSender, TriggerLoop<Counter>) {
        let (tx, rx) = signal_channel(64);
        let dispatcher =
            ActionDispatcher::from_shared(Arc::clone(counter), OverlapPolicy::AllowOverlap);
        (tx, TriggerLoop::new(rx, dispatcher, run_interval))
    }

    #[tokio::test(start_paused = true)]
    async fn burst_before_first_cycle_is_one_run() {
        let counter = Arc::new(Counter::default());
        let (tx, trigger) = trigger_loop(&counter, Duration::from_millis(10));
        for _ in 0..25 {
            tx.notify();
        }

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(trigger.run(cancel.clone()));
        tokio::time::sleep(Duration::from_millis(100)).await;
        cancel.cancel();

        assert_eq!(handle.await.unwrap(), 1);
        assert_eq!(counter.runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn signals_during_quiescent_interval_start_one_more_run() {
        let counter = Arc::new(Counter::default());
        let (tx, trigger) = trigger_loop(&counter, Duration::from_millis(150));
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(trigger.run(cancel.clone()));

        tx.notify();
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(counter.runs.load(Ordering::SeqCst), 1);

        // Still inside the quiescent interval: these pile up and coalesce.
        for _ in 0..5 {
            tx.notify();
        }
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(counter.runs.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(counter.runs.load(Ordering::SeqCst), 2);

        cancel.cancel();
        assert_eq!(handle.await.unwrap(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn failing_action_keeps_the_loop_alive() {
        let counter = Arc::new(Counter {
            runs: AtomicUsize::new(0),
            fail: true,
        });
        let (tx, trigger) = trigger_loop(&counter, Duration::from_millis(5));
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(trigger.run(cancel.clone()));

        for _ in 0..3 {
            tx.notify();
            tokio::time::sleep(Duration::from_millis(30)).await;
        }
        cancel.cancel();

        assert_eq!(handle.await.unwrap(), 3);
        assert_eq!(counter.runs.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn stops_when_all_senders_are_gone() {
        let counter = Arc::new(Counter::default());
        let (tx, trigger) = trigger_loop(&counter, Duration::from_millis(5));
        drop(tx);
        assert_eq!(trigger.run(CancellationToken::new()).await, 0);
    }
}
