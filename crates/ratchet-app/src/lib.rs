//! # ratchet-app
//!
//! Everything around the transformation core that makes it a device: the
//! cooperative main loop, the mode button, the indicator LEDs and the
//! persisted settings record.
//!
//! ## Module Overview
//! - [`settings`] – The mode's persisted record format and defaults.
//! - [`button`]   – Debounced single/double click detection.
//! - [`led`]      – Flashing LEDs, the mode indicator cluster, power-on test.
//! - [`device`]   – Composition root and the non-blocking main loop.

pub mod button;
pub mod device;
pub mod led;
pub mod settings;

pub use button::{Button, ButtonEvent};
pub use device::{Device, DeviceError, DeviceIo, ModeController};
pub use led::{Indication, Led, LedCluster, LedTester};

#[cfg(test)]
mod tests;
