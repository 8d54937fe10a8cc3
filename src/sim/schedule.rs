//! Cancellable callback slots for the frame loop and the spawn timer
//!
//! The host schedules callbacks; the core only remembers which arming is
//! current. Cancelling bumps the generation, so a tick delivered through a
//! handle from an earlier arming is dropped instead of mutating a fresh run.

use serde::{Deserialize, Serialize};

use crate::consts::MAX_CATCHUP_SPAWNS;

/// Proof that a callback was armed by a specific generation of its slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerHandle {
    generation: u64,
}

/// One cancellable callback registration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSlot {
    generation: u64,
    armed: bool,
}

impl TimerSlot {
    /// Arm the slot, invalidating every previously issued handle
    pub fn arm(&mut self) -> TimerHandle {
        self.generation += 1;
        self.armed = true;
        TimerHandle {
            generation: self.generation,
        }
    }

    /// Disarm the slot; outstanding handles become stale
    pub fn cancel(&mut self) {
        if self.armed {
            self.generation += 1;
            self.armed = false;
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Current handle, if armed
    pub fn handle(&self) -> Option<TimerHandle> {
        self.armed.then_some(TimerHandle {
            generation: self.generation,
        })
    }

    /// Whether a tick carrying `handle` should still run
    pub fn accepts(&self, handle: TimerHandle) -> bool {
        self.armed && handle.generation == self.generation
    }
}

/// Converts elapsed wall-clock time into whole spawn periods
///
/// For hosts without their own interval timer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnClock {
    period_ms: u32,
    accumulated_ms: f64,
}

impl SpawnClock {
    pub fn new(period_ms: u32) -> Self {
        Self {
            period_ms: period_ms.max(1),
            accumulated_ms: 0.0,
        }
    }

    /// Add elapsed time; returns how many periods completed, at most
    /// `MAX_CATCHUP_SPAWNS`
    pub fn advance(&mut self, elapsed_ms: f64) -> u32 {
        if elapsed_ms.is_finite() && elapsed_ms > 0.0 {
            self.accumulated_ms += elapsed_ms;
        }
        let period = f64::from(self.period_ms);
        let due = (self.accumulated_ms / period).floor();
        if due > f64::from(MAX_CATCHUP_SPAWNS) {
            log::debug!(
                "spawn clock dropped {} missed periods",
                due as u64 - u64::from(MAX_CATCHUP_SPAWNS)
            );
            self.accumulated_ms = 0.0;
            return MAX_CATCHUP_SPAWNS;
        }
        self.accumulated_ms -= due * period;
        due as u32
    }

    pub fn reset(&mut self) {
        self.accumulated_ms = 0.0;
    }

    pub fn period_ms(&self) -> u32 {
        self.period_ms
    }
}
