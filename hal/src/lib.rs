//! Hardware abstraction layer for the ratchet clock utility
//!
//! This crate provides vendor-agnostic traits for the peripherals the clock
//! transformation core touches: GPIO, the 10-bit analog inputs, the
//! high-rate pulse timer, a monotonic time source and a byte-addressed
//! settings medium. Ports (a real board or the host simulator) supply the
//! implementations.

#![cfg_attr(not(feature = "std"), no_std)]

pub mod adc;
pub mod clock;
pub mod error;
pub mod gpio;
pub mod storage;
pub mod timer;

// Re-export commonly used types
pub use error::{HalError, HalResult};
