//! Per-cycle probability gate.

use ratchet_hal::adc::{AdcChannel, CONTROL_RESOLUTION};
use ratchet_hal::gpio::{GpioPin, Level};
use ratchet_hal::HalResult;

use crate::rng::Lfsr;

/// Bit width of the gate's entropy draw.
pub const CHANCE_DRAW_BITS: u8 = 7;

/// Top of the chance scale; a full-scale reading maps exactly here.
pub const FULL_CHANCE: u16 = 100;

/// Decides once per incoming clock edge whether the transformation is
/// applied this cycle, and mirrors the decision on an indicator output.
#[derive(Debug)]
pub struct ProbabilityGate<A: AdcChannel, P: GpioPin> {
    pot: A,
    cv: A,
    indicator: P,
}

impl<A: AdcChannel, P: GpioPin> ProbabilityGate<A, P> {
    pub fn new(pot: A, cv: A, indicator: P) -> Self {
        Self { pot, cv, indicator }
    }

    /// The chance level grows when the pot is turned clockwise: the maximum
    /// of the two channels maps linearly onto `[0, 100]`.
    fn chance_level(&mut self) -> HalResult<u16> {
        let reading = self.pot.read_raw()?.max(self.cv.read_raw()?);
        let max_raw = u32::from(CONTROL_RESOLUTION.max_raw());
        Ok((u32::from(reading) * u32::from(FULL_CHANCE) / max_raw) as u16)
    }

    /// Draws in `[0, 100)` and compares against the chance level, so a
    /// level of 0 never fires and a level of 100 always does.
    pub fn decide(&mut self, rng: &mut Lfsr) -> HalResult<bool> {
        let level = self.chance_level()?;
        let draw = rng.ranged(0, FULL_CHANCE - 1, CHANCE_DRAW_BITS);
        let in_favour = draw < level;
        self.indicator.write(Level::from(in_favour))?;
        Ok(in_favour)
    }

    /// Pin the indicator to a fixed state. MAX MULT bypasses the gate and
    /// shows the indicator as always on.
    pub fn force(&mut self, on: bool) -> HalResult<()> {
        self.indicator.write(Level::from(on))
    }
}
