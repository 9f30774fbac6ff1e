// src/engine/mod.rs

//! Orchestration engine for filewatcher.
//!
//! This module ties together:
//! - the change-signal channel between file observers and the trigger loop
//!   ([`signal`]),
//! - the debouncing trigger loop that turns signals into action runs
//!   ([`trigger`]),
//! - the top-level [`FileWatcher`] that wires observers, signals and the
//!   action together and owns the cancellation token ([`runtime`]).

pub mod runtime;
pub mod signal;
pub mod trigger;

pub use runtime::FileWatcher;
pub use signal::{
    ChangeSignal, DEFAULT_SIGNAL_CAPACITY, SignalOutcome, SignalReceiver, SignalSender,
    signal_channel,
};
pub use trigger::{DEFAULT_RUN_INTERVAL, TriggerLoop};
pub use crate::types::OverlapPolicy;
