//! Debounced single/double click detection.
//!
//! The mode button is wired active-low through a pull-up resistor. The
//! detector is a small polled state machine: a press shorter than the
//! debounce time is a bounce, a release followed by a second press within
//! the double-click window upgrades the gesture, and only a completed
//! gesture emits an event.

use ratchet_hal::gpio::{GpioPin, PinMode};
use ratchet_hal::HalResult;

/// Presses shorter than this are bounces.
pub const DEBOUNCE_MS: u64 = 50;

/// Window after a release in which a second press makes a double click.
pub const DOUBLE_CLICK_MS: u64 = 400;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    Click,
    DoubleClick,
}

#[derive(Debug, Clone, Copy)]
enum Phase {
    Idle,
    FirstDown { pressed_at_ms: u64 },
    AwaitSecond { released_at_ms: u64 },
    SecondDown,
}

/// Polled click detector over an active-low pin.
pub struct Button<P: GpioPin> {
    pin: P,
    phase: Phase,
}

impl<P: GpioPin> Button<P> {
    pub fn new(mut pin: P) -> HalResult<Self> {
        pin.set_mode(PinMode::InputPullUp)?;
        Ok(Self {
            pin,
            phase: Phase::Idle,
        })
    }

    /// Advance the detector; returns a completed gesture, if any.
    pub fn poll(&mut self, now_ms: u64) -> HalResult<Option<ButtonEvent>> {
        let pressed = !self.pin.read()?.is_high();
        let event = match self.phase {
            Phase::Idle => {
                if pressed {
                    self.phase = Phase::FirstDown { pressed_at_ms: now_ms };
                }
                None
            }
            Phase::FirstDown { pressed_at_ms } => {
                if !pressed {
                    if now_ms.saturating_sub(pressed_at_ms) >= DEBOUNCE_MS {
                        self.phase = Phase::AwaitSecond { released_at_ms: now_ms };
                    } else {
                        self.phase = Phase::Idle;
                    }
                }
                None
            }
            Phase::AwaitSecond { released_at_ms } => {
                if pressed {
                    self.phase = Phase::SecondDown;
                    None
                } else if now_ms.saturating_sub(released_at_ms) > DOUBLE_CLICK_MS {
                    self.phase = Phase::Idle;
                    Some(ButtonEvent::Click)
                } else {
                    None
                }
            }
            Phase::SecondDown => {
                if !pressed {
                    self.phase = Phase::Idle;
                    Some(ButtonEvent::DoubleClick)
                } else {
                    None
                }
            }
        };
        Ok(event)
    }
}
