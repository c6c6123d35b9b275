//! Manually advanced monotonic clock

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use ratchet_hal::clock::MonotonicClock;

/// Simulated microsecond clock. Time moves only when the harness advances
/// it, which keeps every test fully deterministic.
#[derive(Debug, Clone, Default)]
pub struct SimClock {
    micros: Arc<AtomicU64>,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock by `us` microseconds.
    pub fn advance_micros(&self, us: u64) {
        self.micros.fetch_add(us, Ordering::SeqCst);
    }

    /// Advance the clock by `ms` milliseconds.
    pub fn advance_millis(&self, ms: u64) {
        self.advance_micros(ms * 1_000);
    }

    /// Jump directly to an absolute microsecond timestamp.
    pub fn set_micros(&self, us: u64) {
        self.micros.store(us, Ordering::SeqCst);
    }
}

impl MonotonicClock for SimClock {
    fn now_micros(&self) -> u64 {
        self.micros.load(Ordering::SeqCst)
    }
}
