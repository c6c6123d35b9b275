//! Moving-average clock period tracker.

/// Number of inter-edge deltas averaged per recomputation.
pub const EDGES_PER_ESTIMATE: u8 = 5;

/// Cycle time assumed before any edge has been measured (80 BPM half note).
pub const DEFAULT_CYCLE_US: u64 = 750_000;

/// Tracks the incoming clock's cycle time in microseconds.
///
/// Deltas between consecutive rising edges accumulate into a running sum;
/// once [`EDGES_PER_ESTIMATE`] deltas have landed the average becomes the
/// new cycle time and the window resets. Between recomputations the
/// previous value is returned unchanged.
///
/// The first delta is measured against the construction timestamp, so a
/// cold start contributes one inflated sample to the first average. That
/// matches the reference hardware's observed behavior and is deliberately
/// not special-cased.
#[derive(Debug, Clone)]
pub struct PeriodEstimator {
    cycle_us: u64,
    sum_us: u64,
    samples: u8,
    last_edge_us: u64,
    restart_on_reset: bool,
}

impl PeriodEstimator {
    pub fn new(now_us: u64) -> Self {
        Self {
            cycle_us: DEFAULT_CYCLE_US,
            sum_us: 0,
            samples: 0,
            last_edge_us: now_us,
            restart_on_reset: false,
        }
    }

    /// Restart the averaging window on an external reset edge. Off by
    /// default.
    pub fn with_reset_restart(mut self, enabled: bool) -> Self {
        self.restart_on_reset = enabled;
        self
    }

    /// Feed one rising edge; returns the current cycle time.
    pub fn on_edge(&mut self, now_us: u64) -> u64 {
        let delta = now_us.wrapping_sub(self.last_edge_us);
        self.last_edge_us = now_us;
        self.samples += 1;
        self.sum_us += delta;
        if self.samples >= EDGES_PER_ESTIMATE {
            // Cycle time must never be zero; the scheduler divides by it.
            self.cycle_us = (self.sum_us / u64::from(self.samples)).max(1);
            self.samples = 0;
            self.sum_us = 0;
        }
        self.cycle_us
    }

    pub fn cycle_us(&self) -> u64 {
        self.cycle_us
    }

    /// External reset edge. Clears the averaging window only when
    /// configured to.
    pub fn on_reset(&mut self) {
        if self.restart_on_reset {
            self.samples = 0;
            self.sum_us = 0;
        }
    }
}
