//! Maps the frequency pot/CV readings to a multiply/divide factor.

use ratchet_hal::adc::{AdcChannel, CONTROL_RESOLUTION};
use ratchet_hal::HalResult;

use crate::mode::Mode;
use crate::rng::Lfsr;

/// Factors selectable in MULT and MAX MULT. 0 suppresses the cycle.
pub const MULT_FACTORS: [u8; 6] = [0, 1, 2, 3, 4, 5];

/// Factors selectable in DIV. 0 suppresses the cycle.
pub const DIV_FACTORS: [u8; 11] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 16];

/// Bit width of the MAX MULT range draw.
pub const MAX_MULT_DRAW_BITS: u8 = 4;

/// Linear map of a raw reading onto a table index, clamped to the table.
fn table_index(reading: u16, table_len: usize) -> usize {
    let levels = CONTROL_RESOLUTION.levels() as usize;
    (reading as usize * table_len / levels).min(table_len - 1)
}

/// Selects the factor for the current cycle from the frequency pot and CV
/// input.
#[derive(Debug)]
pub struct FactorSelector<A: AdcChannel> {
    pot: A,
    cv: A,
}

impl<A: AdcChannel> FactorSelector<A> {
    pub fn new(pot: A, cv: A) -> Self {
        Self { pot, cv }
    }

    /// Factor for this cycle.
    ///
    /// MULT and DIV combine the two channels by maximum and look the result
    /// up in the mode's table. MAX MULT reads the channels independently as
    /// the lower and upper bound of a range in the MULT table and draws a
    /// random factor inside it, so the returned value needs no further
    /// range validation downstream.
    pub fn select(&mut self, mode: Mode, rng: &mut Lfsr) -> HalResult<u8> {
        match mode {
            Mode::Mult => {
                let reading = self.max_reading()?;
                Ok(MULT_FACTORS[table_index(reading, MULT_FACTORS.len())])
            }
            Mode::Div => {
                let reading = self.max_reading()?;
                Ok(DIV_FACTORS[table_index(reading, DIV_FACTORS.len())])
            }
            Mode::MaxMult => {
                let a = MULT_FACTORS[table_index(self.pot.read_raw()?, MULT_FACTORS.len())];
                let b = MULT_FACTORS[table_index(self.cv.read_raw()?, MULT_FACTORS.len())];
                let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
                Ok(rng.ranged(u16::from(lo), u16::from(hi), MAX_MULT_DRAW_BITS) as u8)
            }
        }
    }

    fn max_reading(&mut self) -> HalResult<u16> {
        Ok(self.pot.read_raw()?.max(self.cv.read_raw()?))
    }
}

#[cfg(test)]
pub(crate) fn index_for(reading: u16, table_len: usize) -> usize {
    table_index(reading, table_len)
}
