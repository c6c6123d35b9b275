//! Indicator LEDs: flash states, the mode cluster, and the power-on sweep.

use ratchet_core::Mode;
use ratchet_hal::gpio::{GpioPin, Level, PinMode};
use ratchet_hal::HalResult;

/// LED drive state. Flash periods are the half-period in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedState {
    Off,
    On,
    SlowFlash,
    Flash,
    FastFlash,
}

impl LedState {
    fn half_period_ms(self) -> Option<u64> {
        match self {
            LedState::Off | LedState::On => None,
            LedState::SlowFlash => Some(1_000),
            LedState::Flash => Some(500),
            LedState::FastFlash => Some(250),
        }
    }
}

/// One indicator LED with an optional flashing drive.
pub struct Led<P: GpioPin> {
    pin: P,
    state: LedState,
    lit: bool,
    toggled_at_ms: u64,
}

impl<P: GpioPin> Led<P> {
    pub fn new(mut pin: P) -> HalResult<Self> {
        pin.set_mode(PinMode::Output)?;
        pin.write(Level::Low)?;
        Ok(Self {
            pin,
            state: LedState::Off,
            lit: false,
            toggled_at_ms: 0,
        })
    }

    /// Change the drive state; steady states take effect immediately.
    pub fn set_state(&mut self, state: LedState) -> HalResult<()> {
        self.state = state;
        match state {
            LedState::Off => {
                self.lit = false;
                self.pin.write(Level::Low)
            }
            LedState::On => {
                self.lit = true;
                self.pin.write(Level::High)
            }
            _ => Ok(()),
        }
    }

    /// Advance a flashing drive.
    pub fn tick(&mut self, now_ms: u64) -> HalResult<()> {
        if let Some(half_period) = self.state.half_period_ms() {
            if now_ms.wrapping_sub(self.toggled_at_ms) > half_period {
                self.toggled_at_ms = now_ms;
                self.lit = !self.lit;
                self.pin.write(Level::from(self.lit))?;
            }
        }
        Ok(())
    }
}

/// What the mode indicator triple shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indication {
    /// All indicators dark (startup).
    Blank,
    Div,
    Mult,
    /// Both mode lamps lit: the randomized-ratchet mode.
    MaxMult,
    /// The unity lamp only; the mode lamps keep their previous state.
    One,
}

impl From<Mode> for Indication {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Div => Indication::Div,
            Mode::Mult => Indication::Mult,
            Mode::MaxMult => Indication::MaxMult,
        }
    }
}

/// The DIV/MULT/ONE indicator triple.
pub struct LedCluster<P: GpioPin> {
    div: Led<P>,
    mult: Led<P>,
    one: Led<P>,
}

impl<P: GpioPin> LedCluster<P> {
    pub fn new(div_pin: P, mult_pin: P, one_pin: P) -> HalResult<Self> {
        Ok(Self {
            div: Led::new(div_pin)?,
            mult: Led::new(mult_pin)?,
            one: Led::new(one_pin)?,
        })
    }

    pub fn show(&mut self, indication: Indication) -> HalResult<()> {
        match indication {
            Indication::Blank => {
                self.div.set_state(LedState::Off)?;
                self.mult.set_state(LedState::Off)?;
                self.one.set_state(LedState::Off)
            }
            Indication::Div => {
                self.div.set_state(LedState::On)?;
                self.mult.set_state(LedState::Off)?;
                self.one.set_state(LedState::Off)
            }
            Indication::Mult => {
                self.div.set_state(LedState::Off)?;
                self.mult.set_state(LedState::On)?;
                self.one.set_state(LedState::Off)
            }
            Indication::MaxMult => {
                self.div.set_state(LedState::On)?;
                self.mult.set_state(LedState::On)?;
                self.one.set_state(LedState::Off)
            }
            // The mode lamps keep whatever they showed.
            Indication::One => self.one.set_state(LedState::On),
        }
    }

    pub fn tick(&mut self, now_ms: u64) -> HalResult<()> {
        self.div.tick(now_ms)?;
        self.mult.tick(now_ms)?;
        self.one.tick(now_ms)
    }
}

/// Power-on indicator sweep so the user can see every lamp works.
///
/// Steps through [`SWEEP`] twice, 50 ms on and 25 ms off per lamp, driven
/// by `tick` so the loop never blocks.
pub struct LedTester {
    cursor: usize,
    pass: u8,
    lit_since_ms: Option<u64>,
    dark_since_ms: Option<u64>,
    done: bool,
}

/// Lamp order of the sweep, as indices into the pin slice handed to `tick`.
pub const SWEEP: [usize; 12] = [0, 1, 2, 1, 0, 1, 3, 4, 5, 4, 3, 1];

const SWEEP_ON_MS: u64 = 50;
const SWEEP_OFF_MS: u64 = 25;
const SWEEP_PASSES: u8 = 2;

impl LedTester {
    pub fn new() -> Self {
        Self {
            cursor: 0,
            pass: 0,
            lit_since_ms: None,
            dark_since_ms: None,
            done: false,
        }
    }

    fn write<P: GpioPin>(pins: &mut [&mut P], idx: usize, level: Level) -> HalResult<()> {
        if let Some(pin) = pins.get_mut(SWEEP[idx]) {
            pin.write(level)?;
        }
        Ok(())
    }

    /// Advance the sweep; returns true once both passes have completed.
    pub fn tick<P: GpioPin>(&mut self, now_ms: u64, pins: &mut [&mut P]) -> HalResult<bool> {
        if self.done {
            return Ok(true);
        }
        match (self.lit_since_ms, self.dark_since_ms) {
            (None, None) => {
                Self::write(pins, self.cursor, Level::High)?;
                self.lit_since_ms = Some(now_ms);
            }
            (Some(since), _) if now_ms.wrapping_sub(since) >= SWEEP_ON_MS => {
                Self::write(pins, self.cursor, Level::Low)?;
                self.lit_since_ms = None;
                self.dark_since_ms = Some(now_ms);
                self.cursor += 1;
                if self.cursor == SWEEP.len() {
                    self.cursor = 0;
                    self.pass += 1;
                    if self.pass >= SWEEP_PASSES {
                        self.done = true;
                    }
                }
            }
            (None, Some(since)) if now_ms.wrapping_sub(since) >= SWEEP_OFF_MS => {
                Self::write(pins, self.cursor, Level::High)?;
                self.lit_since_ms = Some(now_ms);
                self.dark_since_ms = None;
            }
            _ => {}
        }
        Ok(self.done)
    }
}

impl Default for LedTester {
    fn default() -> Self {
        Self::new()
    }
}
