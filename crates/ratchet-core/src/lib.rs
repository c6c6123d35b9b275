//! # ratchet-core
//!
//! The clock transformation engine of a Eurorack clock utility: an incoming
//! gate/clock stream is reshaped into a multiplied ("ratcheted"), divided,
//! or probabilistically randomized output stream.
//!
//! ## Module Overview
//! - [`mode`]        – Operating modes and their persisted encoding.
//! - [`rng`]         – Deterministic pseudo-random bit source.
//! - [`period`]      – Moving-average clock period tracker.
//! - [`factor`]      – Pot/CV readings to multiply/divide factor.
//! - [`chance`]      – Per-cycle probability gate.
//! - [`transformer`] – The interrupt-driven pulse-scheduling state machine.
//! - [`sync`]        – Mutex/Arc platform abstraction for shared state.
//!
//! The crate is written entirely against the `ratchet-hal` traits so the
//! whole engine runs unmodified on a host under the simulated port.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod chance;
pub mod factor;
pub mod mode;
pub mod period;
pub mod rng;
pub mod sync;
pub mod transformer;

pub use chance::ProbabilityGate;
pub use factor::FactorSelector;
pub use mode::Mode;
pub use period::PeriodEstimator;
pub use rng::Lfsr;
pub use transformer::{ClockTransformer, CycleOutcome};

#[cfg(test)]
mod tests;
