// src/exec/dispatch.rs

//! Fire-and-forget action dispatch under an [`OverlapPolicy`].

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, error};

use crate::exec::backend::ActionRunner;
use crate::types::OverlapPolicy;

/// What a call to [`ActionDispatcher::dispatch`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A new run was spawned.
    Started,
    /// A run is in flight (serialize policy); one follow-up run is now pending.
    Deferred,
    /// A follow-up run was already pending; this dispatch merged into it.
    Coalesced,
}

#[derive(Debug, Default)]
struct SerialState {
    running: bool,
    pending: bool,
}

/// Starts action runs without making the caller wait for them.
///
/// Run failures are logged here and never reach the caller.
pub struct ActionDispatcher<A: ActionRunner> {
    action: Arc<A>,
    policy: OverlapPolicy,
    state: Arc<Mutex<SerialState>>,
}

impl<A: ActionRunner> std::fmt::Debug for ActionDispatcher<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionDispatcher")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl<A: ActionRunner> ActionDispatcher<A> {
    pub fn new(action: A, policy: OverlapPolicy) -> Self {
        Self::from_shared(Arc::new(action), policy)
    }

    pub fn from_shared(action: Arc<A>, policy: OverlapPolicy) -> Self {
        Self {
            action,
            policy,
            state: Arc::new(Mutex::new(SerialState::default())),
        }
    }

    pub fn policy(&self) -> OverlapPolicy {
        self.policy
    }

    /// Start (or schedule) one run of the action. Must be called from within
    /// a Tokio runtime.
    pub fn dispatch(&self) -> DispatchOutcome {
        match self.policy {
            OverlapPolicy::AllowOverlap => {
                let action = Arc::clone(&self.action);
                tokio::spawn(async move { run_logged(action.as_ref()).await });
                DispatchOutcome::Started
            }
            OverlapPolicy::Serialize => {
                let mut state = lock(&self.state);
                if state.running {
                    let outcome = if state.pending {
                        DispatchOutcome::Coalesced
                    } else {
                        DispatchOutcome::Deferred
                    };
                    state.pending = true;
                    debug!(?outcome, "action still running");
                    return outcome;
                }
                state.running = true;
                drop(state);

                let action = Arc::clone(&self.action);
                let state = Arc::clone(&self.state);
                tokio::spawn(async move { run_serialized(action, state).await });
                DispatchOutcome::Started
            }
        }
    }
}

fn lock(state: &Mutex<SerialState>) -> MutexGuard<'_, SerialState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

async fn run_serialized<A: ActionRunner>(action: Arc<A>, state: Arc<Mutex<SerialState>>) {
    loop {
        run_logged(action.as_ref()).await;

        let again = {
            let mut state = lock(&state);
            if state.pending {
                state.pending = false;
                true
            } else {
                state.running = false;
                false
            }
        };

        if !again {
            break;
        }
        debug!("starting pending action run");
    }
}

async fn run_logged<A: ActionRunner>(action: &A) {
    match action.run().await {
        Ok(()) => debug!("action finished"),
        Err(err) => error!(error = %err, "exec error"),
    }
}
