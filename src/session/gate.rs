//! Idle/Synthesizing state machine.

use std::sync::{Mutex, MutexGuard};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynthesisState {
    Idle,
    Synthesizing,
}

/// Guards the single in-flight synthesis.
///
/// `try_begin` is the only way into `Synthesizing`, and the returned permit is
/// the only way out: dropping it moves the gate back to `Idle`.
#[derive(Debug)]
pub struct SynthesisGate {
    state: Mutex<SynthesisState>,
}

/// Proof that the holder moved the gate to `Synthesizing`.
#[derive(Debug)]
pub struct SynthesisPermit<'a> {
    gate: &'a SynthesisGate,
}

impl SynthesisGate {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SynthesisState::Idle),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SynthesisState> {
        // The state is a plain enum, a poisoned value is still meaningful.
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }

    pub fn state(&self) -> SynthesisState {
        *self.lock()
    }

    pub fn is_busy(&self) -> bool {
        self.state() == SynthesisState::Synthesizing
    }

    /// Idle → Synthesizing. Returns `None` while already synthesizing.
    pub fn try_begin(&self) -> Option<SynthesisPermit<'_>> {
        let mut st = self.lock();
        match *st {
            SynthesisState::Idle => {
                *st = SynthesisState::Synthesizing;
                Some(SynthesisPermit { gate: self })
            }
            SynthesisState::Synthesizing => {
                debug!("synthesis already in flight");
                None
            }
        }
    }
}

impl Default for SynthesisGate {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SynthesisPermit<'_> {
    fn drop(&mut self) {
        *self.gate.lock() = SynthesisState::Idle;
    }
}
