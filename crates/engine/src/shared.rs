//! Shared lifecycle state
//!
//! Session and engine state are mutated only through these methods; the
//! worker and `sample_now` read snapshots. Single-writer-per-field policy:
//! lifecycle transitions happen either in the engine handle or in the worker
//! that owns the subscription, never both at once.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use contracts::{EngineState, SessionContext, SyncOutcome};

#[derive(Default)]
pub(crate) struct EngineShared {
    state: Mutex<EngineState>,
    session: Mutex<Option<SessionContext>>,
    delivered: AtomicU64,
    failed: AtomicU64,
}

impl EngineShared {
    pub fn state(&self) -> EngineState {
        *self.state.lock().expect("state lock poisoned")
    }

    /// Move to Running; false when already Running
    pub fn transition_to_running(&self) -> bool {
        let mut state = self.state.lock().expect("state lock poisoned");
        if *state == EngineState::Running {
            return false;
        }
        *state = EngineState::Running;
        true
    }

    /// Move to Stopped; false when already Stopped
    pub fn transition_to_stopped(&self) -> bool {
        let mut state = self.state.lock().expect("state lock poisoned");
        if *state == EngineState::Stopped {
            return false;
        }
        *state = EngineState::Stopped;
        true
    }

    pub fn set_session(&self, session: SessionContext) {
        *self.session.lock().expect("session lock poisoned") = Some(session);
    }

    pub fn clear_session(&self) {
        self.session.lock().expect("session lock poisoned").take();
    }

    pub fn session_snapshot(&self) -> Option<SessionContext> {
        self.session.lock().expect("session lock poisoned").clone()
    }

    pub fn count_outcome(&self, outcome: &SyncOutcome) {
        if outcome.is_delivered() {
            self.delivered.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failed.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }

    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }
}
