//! GPIO (General Purpose Input/Output) abstraction

use crate::error::HalResult;

/// GPIO pin modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinMode {
    /// Input (floating)
    Input,
    /// Input with pull-up resistor
    InputPullUp,
    /// Output (push-pull)
    Output,
}

/// GPIO pin levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Low level (0V)
    Low,
    /// High level (VCC)
    High,
}

impl Level {
    /// Opposite level.
    pub fn inverted(self) -> Level {
        match self {
            Level::Low => Level::High,
            Level::High => Level::Low,
        }
    }

    pub fn is_high(self) -> bool {
        matches!(self, Level::High)
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

/// Interrupt trigger edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// Rising edge
    Rising,
    /// Falling edge
    Falling,
    /// Both edges
    Both,
}

/// GPIO pin trait (object-safe)
pub trait GpioPin: Send + Sync {
    /// Configure pin mode
    fn set_mode(&mut self, mode: PinMode) -> HalResult<()>;

    /// Read current level
    fn read(&self) -> HalResult<Level>;

    /// Write level (for output pins)
    fn write(&mut self, level: Level) -> HalResult<()>;

    /// Toggle output
    fn toggle(&mut self) -> HalResult<()> {
        let current = self.read()?;
        self.write(current.inverted())
    }

    /// Get pin number
    fn pin_number(&self) -> u32;
}

/// Polarity-inverting pin adapter.
///
/// The gate output is active-high by default; boards that drive it through
/// an inverting transistor stage wrap the pin in this adapter instead of
/// teaching the core about polarity.
pub struct ActiveLow<P: GpioPin>(pub P);

impl<P: GpioPin> GpioPin for ActiveLow<P> {
    fn set_mode(&mut self, mode: PinMode) -> HalResult<()> {
        self.0.set_mode(mode)
    }

    fn read(&self) -> HalResult<Level> {
        Ok(self.0.read()?.inverted())
    }

    fn write(&mut self, level: Level) -> HalResult<()> {
        self.0.write(level.inverted())
    }

    fn pin_number(&self) -> u32 {
        self.0.pin_number()
    }
}

/// GPIO pin that can raise an edge-triggered interrupt.
///
/// The clock-in and reset-in jacks are wired through pins of this kind; the
/// port is responsible for routing the edge to the transformer's entry
/// points.
pub trait EdgeInput: GpioPin {
    /// Enable interrupt on edge
    fn enable_interrupt(&mut self, edge: Edge) -> HalResult<()>;

    /// Disable interrupt
    fn disable_interrupt(&mut self) -> HalResult<()>;
}
