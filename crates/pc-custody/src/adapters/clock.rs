//! Clock Adapters
//!
//! Implements the `Clock` port from the system clock, or from a manually
//! driven value for tests and replay.

use crate::ports::outbound::Clock;
use parking_lot::RwLock;
use shared_types::entities::Timestamp;
use std::time::{SystemTime, UNIX_EPOCH};

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}

/// Manually driven clock.
#[derive(Debug)]
pub struct ManualClock {
    current_time: RwLock<Timestamp>,
}

impl ManualClock {
    /// Create a clock starting at `start`.
    #[must_use]
    pub fn new(start: Timestamp) -> Self {
        Self {
            current_time: RwLock::new(start),
        }
    }

    /// Set current time.
    pub fn set_time(&self, time: Timestamp) {
        *self.current_time.write() = time;
    }

    /// Advance time.
    pub fn advance_time(&self, secs: u64) {
        *self.current_time.write() += secs;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(1_700_000_000)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.current_time.read()
    }
}
