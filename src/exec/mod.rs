// src/exec/mod.rs

//! Action execution layer.
//!
//! - [`backend`] provides the `ActionRunner` trait and the production
//!   `CommandRunner`, which runs an external command with
//!   `tokio::process::Command` and prints its captured stdout.
//! - [`dispatch`] starts runs without blocking the trigger loop and applies
//!   the configured overlap policy.

pub mod backend;
pub mod dispatch;

pub use backend::{ActionRunner, CommandRunner};
pub use dispatch::{ActionDispatcher, DispatchOutcome};
