//! The interrupt-driven pulse-scheduling state machine.
//!
//! All mutable transformation state lives behind one struct with a single
//! entry point per trigger: external clock edge, external reset edge,
//! secondary timer tick, and mode change. The clock-edge handler
//! unconditionally stops the secondary timer before reprogramming it, which
//! is what keeps edge handling and timer ticks from racing.

use log::trace;
use ratchet_hal::adc::AdcChannel;
use ratchet_hal::gpio::{GpioPin, Level};
use ratchet_hal::timer::PulseTimer;
use ratchet_hal::HalResult;

use crate::chance::ProbabilityGate;
use crate::factor::FactorSelector;
use crate::mode::Mode;
use crate::period::PeriodEstimator;
use crate::rng::Lfsr;

/// What an incoming clock edge produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Factor 0: output forced low, nothing scheduled this cycle.
    Suppressed,
    /// Factor 1: the pulse passes through unchanged.
    Unity,
    /// A multiply-family cycle. `ratcheting` is false when the gate decided
    /// against it, which leaves the timer at the pass-through rate — not
    /// suppressed.
    Ratchet { factor: u8, ratcheting: bool },
    /// A divider cycle. `fired` is true on the edge that produced the
    /// divided output pulse.
    Divide { factor: u8, fired: bool },
}

impl CycleOutcome {
    /// Whether the cycle should light the unity lamp.
    pub fn is_unity(self) -> bool {
        matches!(self, CycleOutcome::Unity)
    }
}

/// The clock transformation state machine.
///
/// Owns the gate output pin, the secondary high-rate timer, and the analog
/// front ends. Callers route hardware triggers to the matching `on_*` entry
/// point; no other access to the scheduling state exists.
///
/// The output pin type `O` is independent of the indicator pin type `L`, so
/// a board can wrap only the gate output in a polarity adapter.
pub struct ClockTransformer<O, T, A, L = O>
where
    O: GpioPin,
    T: PulseTimer,
    A: AdcChannel,
    L: GpioPin,
{
    mode: Mode,
    period: PeriodEstimator,
    selector: FactorSelector<A>,
    gate: ProbabilityGate<A, L>,
    rng: Lfsr,
    out: O,
    timer: T,
    factor: u8,
    pulse_count: u8,
    pending_level: Level,
}

impl<O, T, A, L> ClockTransformer<O, T, A, L>
where
    O: GpioPin,
    T: PulseTimer,
    A: AdcChannel,
    L: GpioPin,
{
    pub fn new(
        mode: Mode,
        out: O,
        timer: T,
        selector: FactorSelector<A>,
        gate: ProbabilityGate<A, L>,
        rng: Lfsr,
        period: PeriodEstimator,
    ) -> Self {
        Self {
            mode,
            period,
            selector,
            gate,
            rng,
            out,
            timer,
            factor: 1,
            pulse_count: 0,
            pending_level: Level::Low,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Current cycle time estimate in microseconds.
    pub fn cycle_us(&self) -> u64 {
        self.period.cycle_us()
    }

    /// External clock rising edge.
    pub fn on_clock_edge(&mut self, now_us: u64) -> HalResult<CycleOutcome> {
        // Cancel any in-flight emission before reprogramming.
        self.timer.stop()?;
        let cycle_us = self.period.on_edge(now_us);
        let factor = self.selector.select(self.mode, &mut self.rng)?;
        self.factor = factor;

        let outcome = match factor {
            0 => {
                self.out.write(Level::Low)?;
                CycleOutcome::Suppressed
            }
            1 => {
                // Pass the pulse through unchanged: high now, low half a
                // cycle later.
                self.pulse_count = 0;
                self.timer.start((cycle_us / 2).max(1))?;
                self.out.write(Level::High)?;
                self.pending_level = Level::Low;
                CycleOutcome::Unity
            }
            _ => match self.mode {
                Mode::Div => {
                    // Counting external pulses; the secondary timer plays
                    // no part in division.
                    self.pulse_count = self.pulse_count.wrapping_add(1);
                    let in_favour = self.gate.decide(&mut self.rng)?;
                    if in_favour && self.pulse_count >= factor {
                        self.pulse_count = 0;
                        self.out.write(Level::High)?;
                        self.pending_level = Level::High;
                        CycleOutcome::Divide { factor, fired: true }
                    } else {
                        self.out.write(Level::Low)?;
                        CycleOutcome::Divide { factor, fired: false }
                    }
                }
                Mode::Mult => {
                    self.pulse_count = 0;
                    self.out.write(Level::High)?;
                    self.pending_level = Level::Low;
                    let ratcheting = self.gate.decide(&mut self.rng)?;
                    let period_us = if ratcheting {
                        cycle_us / (2 * u64::from(factor))
                    } else {
                        cycle_us / 2
                    };
                    self.timer.start(period_us.max(1))?;
                    CycleOutcome::Ratchet { factor, ratcheting }
                }
                Mode::MaxMult => {
                    // The factor already encodes the randomness; no gate.
                    self.pulse_count = 0;
                    self.out.write(Level::High)?;
                    self.pending_level = Level::Low;
                    self.timer.start((cycle_us / (2 * u64::from(factor))).max(1))?;
                    CycleOutcome::Ratchet {
                        factor,
                        ratcheting: true,
                    }
                }
            },
        };
        trace!(
            "clock edge: cycle={}us factor={} -> {:?}",
            cycle_us,
            factor,
            outcome
        );
        Ok(outcome)
    }

    /// Secondary timer expiry. Writes the pending level, flips it, and
    /// stops the timer once the cycle's transitions have all been emitted;
    /// the output then holds its last level.
    pub fn on_timer_tick(&mut self) -> HalResult<()> {
        if !self.timer.is_running() {
            return Ok(());
        }
        self.pulse_count = self.pulse_count.wrapping_add(1);
        let level = self.pending_level;
        self.out.write(level)?;
        self.pending_level = level.inverted();
        if u16::from(self.pulse_count) > 2 * u16::from(self.factor) {
            self.timer.stop()?;
        }
        Ok(())
    }

    /// External reset rising edge. Defined for the divider's counter only;
    /// the next clock edge re-synchronizes the output.
    pub fn on_reset_edge(&mut self) -> HalResult<()> {
        match self.mode {
            Mode::Div => {
                self.period.on_reset();
                self.pulse_count = 0;
                self.timer.stop()?;
                self.out.write(Level::Low)?;
                self.pending_level = Level::Low;
                trace!("reset edge: divider counter cleared");
            }
            Mode::Mult | Mode::MaxMult => {}
        }
        Ok(())
    }

    /// Mode change. Nothing is rescheduled; the next clock edge picks the
    /// new mode up. Entering MAX MULT pins the chance indicator on because
    /// the gate is bypassed there.
    pub fn on_mode_changed(&mut self, mode: Mode) -> HalResult<()> {
        self.mode = mode;
        if matches!(mode, Mode::MaxMult) {
            self.gate.force(true)?;
        }
        Ok(())
    }

    /// Re-read the factor for display purposes (the unity lamp stays live
    /// even with no clock present). Scheduling state is not touched.
    pub fn poll_factor(&mut self) -> HalResult<u8> {
        self.selector.select(self.mode, &mut self.rng)
    }
}
