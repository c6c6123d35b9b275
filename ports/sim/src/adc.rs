//! Simulated ADC channel

use std::sync::atomic::{AtomicU16, AtomicUsize, Ordering};
use std::sync::Arc;

use ratchet_hal::adc::{AdcChannel, CONTROL_RESOLUTION};
use ratchet_hal::{HalError, HalResult};

/// Simulated 10-bit ADC channel with a settable reading.
#[derive(Debug, Clone)]
pub struct SimAdc {
    channel: u8,
    raw: Arc<AtomicU16>,
    reads: Arc<AtomicUsize>,
}

impl SimAdc {
    pub fn new(channel: u8) -> Self {
        Self {
            channel,
            raw: Arc::new(AtomicU16::new(0)),
            reads: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Set the raw reading subsequent conversions will return.
    ///
    /// # Panics
    ///
    /// Panics if `raw` exceeds the 10-bit range; a sim channel fed an
    /// impossible value is a broken test, not a runtime condition.
    pub fn set(&self, raw: u16) {
        assert!(
            raw <= CONTROL_RESOLUTION.max_raw(),
            "sim adc reading {raw} exceeds full scale"
        );
        self.raw.store(raw, Ordering::SeqCst);
    }

    /// Number of conversions performed so far.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl AdcChannel for SimAdc {
    fn read_raw(&mut self) -> HalResult<u16> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let raw = self.raw.load(Ordering::SeqCst);
        if raw > CONTROL_RESOLUTION.max_raw() {
            return Err(HalError::OutOfRange);
        }
        Ok(raw)
    }

    fn channel_number(&self) -> u8 {
        self.channel
    }
}
