//! Operating modes and their persisted encoding.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Operating mode of the clock transformer.
///
/// `ONE` (the unity-factor lamp) is a derived display state, not a mode, so
/// it has no variant here — which also makes the persistence invariant
/// "the stored mode is never ONE" hold by construction.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Emit one output pulse per several input pulses.
    Div,
    /// Ratchet: emit several output pulses per input pulse.
    Mult,
    /// Ratchet by a random factor within a pot/CV-defined range, bypassing
    /// the probability gate.
    MaxMult,
}

impl Mode {
    /// Persisted raw value. 0 is the unprogrammed value and 2 is reserved
    /// for the display-only ONE state; neither decodes back to a mode.
    pub const fn as_raw(self) -> u8 {
        match self {
            Mode::Div => 1,
            Mode::Mult => 3,
            Mode::MaxMult => 4,
        }
    }

    pub const fn from_raw(raw: u8) -> Option<Mode> {
        match raw {
            1 => Some(Mode::Div),
            3 => Some(Mode::Mult),
            4 => Some(Mode::MaxMult),
            _ => None,
        }
    }

    /// Whether this is one of the two multiply-family modes.
    pub const fn is_mult_family(self) -> bool {
        !matches!(self, Mode::Div)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Div => write!(f, "DIV"),
            Mode::Mult => write!(f, "MULT"),
            Mode::MaxMult => write!(f, "MAX MULT"),
        }
    }
}
