// src/engine/signal.rs

//! Change-signal channel between file observers and the trigger loop.
//!
//! The channel is bounded and the sending side never waits. When the queue
//! is full the new signal is dropped: at least one queued signal already
//! guarantees that the trigger loop will run the action again, and signals
//! carry no payload, so nothing is lost by coalescing.

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::trace;

/// Default queue capacity.
pub const DEFAULT_SIGNAL_CAPACITY: usize = 64;

/// "Something changed, run the action again."
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeSignal;

/// What happened to a signal handed to [`SignalSender::notify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalOutcome {
    /// The signal was queued.
    Queued,
    /// The queue was full; the signal was merged into the pending ones.
    Coalesced,
    /// The trigger loop is gone.
    Closed,
}

/// Create a signal channel. `capacity` is clamped to at least 1.
pub fn signal_channel(capacity: usize) -> (SignalSender, SignalReceiver) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (SignalSender { tx }, SignalReceiver { rx })
}

/// Cloneable, non-blocking producer handle.
#[derive(Debug, Clone)]
pub struct SignalSender {
    tx: mpsc::Sender<ChangeSignal>,
}

impl SignalSender {
    /// Enqueue a change signal without waiting.
    pub fn notify(&self) -> SignalOutcome {
        match self.tx.try_send(ChangeSignal) {
            Ok(()) => SignalOutcome::Queued,
            Err(TrySendError::Full(_)) => {
                trace!("signal queue full; coalescing");
                SignalOutcome::Coalesced
            }
            Err(TrySendError::Closed(_)) => SignalOutcome::Closed,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Single consumer handle, owned by the trigger loop.
#[derive(Debug)]
pub struct SignalReceiver {
    rx: mpsc::Receiver<ChangeSignal>,
}

impl SignalReceiver {
    /// Wait for the next signal. `None` once every sender is dropped and the
    /// queue is empty.
    pub async fn recv(&mut self) -> Option<ChangeSignal> {
        self.rx.recv().await
    }

    /// Remove every signal queued right now and return how many there were.
    pub fn drain(&mut self) -> usize {
        let mut drained = 0;
        while self.rx.try_recv().is_ok() {
            drained += 1;
        }
        drained
    }
}
