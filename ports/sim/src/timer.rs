//! Simulated pulse timer

use std::sync::{Arc, Mutex, MutexGuard};

use ratchet_hal::clock::MonotonicClock;
use ratchet_hal::timer::PulseTimer;
use ratchet_hal::{HalError, HalResult};

#[derive(Debug, Default)]
struct TimerState {
    running: bool,
    period_us: Option<u64>,
    armed_at_us: u64,
    fired: u64,
    programmed: Vec<u64>,
    stops: usize,
}

/// Simulated periodic timer.
///
/// The timer never fires on its own; the harness asks [`SimTimer::next_due`]
/// when the next expiry would land, advances the clock there, calls the
/// transformer's tick entry point, and acknowledges with
/// [`SimTimer::mark_fired`].
#[derive(Debug, Clone)]
pub struct SimTimer {
    clock: super::SimClock,
    state: Arc<Mutex<TimerState>>,
}

impl SimTimer {
    pub fn new(clock: super::SimClock) -> Self {
        Self {
            clock,
            state: Arc::new(Mutex::new(TimerState::default())),
        }
    }

    /// Most recently programmed period, if any.
    pub fn last_period(&self) -> Option<u64> {
        self.lock().programmed.last().copied()
    }

    /// Every period programmed so far, in order.
    pub fn programmed_periods(&self) -> Vec<u64> {
        self.lock().programmed.clone()
    }

    /// Number of `stop` calls observed.
    pub fn stop_count(&self) -> usize {
        self.lock().stops
    }

    /// Absolute time of the next expiry, if the timer is running.
    pub fn next_due(&self) -> Option<u64> {
        let state = self.lock();
        if !state.running {
            return None;
        }
        let period = state.period_us?;
        Some(state.armed_at_us + period * (state.fired + 1))
    }

    /// Acknowledge one delivered expiry.
    pub fn mark_fired(&self) {
        self.lock().fired += 1;
    }

    fn lock(&self) -> MutexGuard<'_, TimerState> {
        self.state.lock().expect("sim timer state poisoned")
    }
}

impl PulseTimer for SimTimer {
    fn start(&mut self, period_us: u64) -> HalResult<()> {
        if period_us == 0 {
            return Err(HalError::InvalidParameter);
        }
        let mut state = self.lock();
        state.running = true;
        state.period_us = Some(period_us);
        state.armed_at_us = self.clock.now_micros();
        state.fired = 0;
        state.programmed.push(period_us);
        Ok(())
    }

    fn stop(&mut self) -> HalResult<()> {
        let mut state = self.lock();
        state.running = false;
        state.stops += 1;
        Ok(())
    }

    fn is_running(&self) -> bool {
        self.lock().running
    }
}
