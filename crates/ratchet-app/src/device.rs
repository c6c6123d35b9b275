//! Composition root and the non-blocking main loop.
//!
//! `Device` owns the transformer, the mode button, the indicator cluster
//! and the settings store. The main loop never blocks: it polls elapsed-time
//! guards for the heartbeat and the potentiometer re-scan, services the
//! debounced button, and ticks the deferred settings write. Hardware edges
//! and timer expiries arrive through the `on_*` entry points from interrupt
//! context.

use log::{debug, info, warn};

use ratchet_core::chance::ProbabilityGate;
use ratchet_core::factor::FactorSelector;
use ratchet_core::period::PeriodEstimator;
use ratchet_core::rng::Lfsr;
use ratchet_core::transformer::{ClockTransformer, CycleOutcome};
use ratchet_core::Mode;
use ratchet_hal::adc::AdcChannel;
use ratchet_hal::clock::{MonotonicClock, PollDelay};
use ratchet_hal::gpio::{Edge, EdgeInput, GpioPin, Level, PinMode};
use ratchet_hal::storage::Storage;
use ratchet_hal::timer::PulseTimer;
use ratchet_hal::HalError;
use ratchet_store::StoreError;
use thiserror::Error;

use crate::button::{Button, ButtonEvent};
use crate::led::{Indication, LedCluster};
use crate::settings::{decode_mode, encode_mode, SettingsStore, DEFAULT_MODE};

/// Heartbeat blink half-period.
pub const HEARTBEAT_MS: u64 = 500;

/// Cadence of the edge-independent potentiometer re-scan that keeps the
/// unity lamp live with no clock present.
pub const POT_POLL_MS: u64 = 100;

#[derive(Error, Debug)]
pub enum DeviceError {
    #[error("peripheral fault: {0}")]
    Hal(#[from] HalError),
    #[error("persistence fault: {0}")]
    Store(#[from] StoreError),
}

/// Tracks the current mode and the last-used multiply-family mode so the
/// two toggle gestures stay independent.
pub struct ModeController {
    mode: Mode,
    last_mult_family: Mode,
}

impl ModeController {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            last_mult_family: if mode.is_mult_family() {
                mode
            } else {
                DEFAULT_MODE
            },
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Single click: DIV toggles against the last multiply-family mode.
    pub fn single_click(&mut self) -> Mode {
        self.mode = match self.mode {
            Mode::Div => self.last_mult_family,
            current => {
                self.last_mult_family = current;
                Mode::Div
            }
        };
        self.mode
    }

    /// Double click: MULT toggles against MAX MULT; a no-op in DIV.
    pub fn double_click(&mut self) -> Option<Mode> {
        let next = match self.mode {
            Mode::Div => return None,
            Mode::Mult => Mode::MaxMult,
            Mode::MaxMult => Mode::Mult,
        };
        self.mode = next;
        self.last_mult_family = next;
        Some(next)
    }
}

/// The module's full peripheral set, handed to [`Device::new`].
///
/// The gate output has its own pin type `O` so boards with an inverting
/// output stage can hand in an [`ratchet_hal::gpio::ActiveLow`]-wrapped pin.
pub struct DeviceIo<O, P, E, A, T, S> {
    pub clock_in: E,
    pub reset_in: E,
    pub gate_out: O,
    pub led_div: P,
    pub led_mult: P,
    pub led_one: P,
    pub led_chance: P,
    pub heartbeat: P,
    pub button: P,
    pub chance_pot: A,
    pub chance_cv: A,
    pub freq_pot: A,
    pub freq_cv: A,
    pub timer: T,
    pub storage: S,
}

pub struct Device<O, P, E, A, T, S, C>
where
    O: GpioPin,
    P: GpioPin,
    E: EdgeInput,
    A: AdcChannel,
    T: PulseTimer,
    S: Storage,
    C: MonotonicClock,
{
    transformer: ClockTransformer<O, T, A, P>,
    modes: ModeController,
    cluster: LedCluster<P>,
    button: Button<P>,
    store: SettingsStore<S>,
    clock: C,
    clock_in: E,
    reset_in: E,
    heartbeat: P,
    heartbeat_delay: PollDelay,
    pot_delay: PollDelay,
}

impl<O, P, E, A, T, S, C> Device<O, P, E, A, T, S, C>
where
    O: GpioPin,
    P: GpioPin,
    E: EdgeInput,
    A: AdcChannel,
    T: PulseTimer,
    S: Storage,
    C: MonotonicClock,
{
    pub fn new(io: DeviceIo<O, P, E, A, T, S>, clock: C, seed: u16) -> Result<Self, DeviceError> {
        let DeviceIo {
            mut clock_in,
            mut reset_in,
            mut gate_out,
            led_div,
            led_mult,
            led_one,
            mut led_chance,
            mut heartbeat,
            button: button_pin,
            mut chance_pot,
            mut chance_cv,
            mut freq_pot,
            mut freq_cv,
            timer,
            storage,
        } = io;

        let mut store = SettingsStore::open(storage)?;
        let stored = if store.is_empty() {
            None
        } else {
            match store.read() {
                Ok(record) => decode_mode(record),
                Err(StoreError::Empty) => None,
                Err(err) => return Err(err.into()),
            }
        };
        let mode = match stored {
            Some(mode) => mode,
            None => {
                info!("no usable mode record, starting first run as {DEFAULT_MODE}");
                if let Err(err) = store.write(&encode_mode(DEFAULT_MODE)) {
                    // Non-fatal: the mode keeps operating from RAM.
                    warn!("could not persist default mode: {err}");
                }
                DEFAULT_MODE
            }
        };
        info!("starting in {mode}");

        gate_out.set_mode(PinMode::Output)?;
        gate_out.write(Level::Low)?;
        heartbeat.set_mode(PinMode::Output)?;
        led_chance.set_mode(PinMode::Output)?;

        // The first conversion after configuration is unreliable on this
        // ADC; get it over with.
        let _ = chance_pot.read_raw()?;
        let _ = chance_cv.read_raw()?;
        let _ = freq_pot.read_raw()?;
        let _ = freq_cv.read_raw()?;

        clock_in.set_mode(PinMode::Input)?;
        clock_in.enable_interrupt(Edge::Rising)?;
        reset_in.set_mode(PinMode::Input)?;
        reset_in.enable_interrupt(Edge::Rising)?;

        let selector = FactorSelector::new(freq_pot, freq_cv);
        let gate = ProbabilityGate::new(chance_pot, chance_cv, led_chance);
        let period = PeriodEstimator::new(clock.now_micros());
        let mut transformer = ClockTransformer::new(
            mode,
            gate_out,
            timer,
            selector,
            gate,
            Lfsr::new(seed),
            period,
        );
        transformer.on_mode_changed(mode)?;

        let mut cluster = LedCluster::new(led_div, led_mult, led_one)?;
        cluster.show(mode.into())?;
        let button = Button::new(button_pin)?;

        let now_ms = clock.now_millis();
        Ok(Self {
            transformer,
            modes: ModeController::new(mode),
            cluster,
            button,
            store,
            clock,
            clock_in,
            reset_in,
            heartbeat,
            heartbeat_delay: PollDelay::new(HEARTBEAT_MS, now_ms),
            pot_delay: PollDelay::new(POT_POLL_MS, now_ms),
        })
    }

    /// One cooperative main-loop iteration. Never blocks.
    pub fn tick(&mut self) -> Result<(), DeviceError> {
        let now_ms = self.clock.now_millis();
        if self.heartbeat_delay.poll(now_ms) {
            self.heartbeat.toggle()?;
        }
        if let Some(event) = self.button.poll(now_ms)? {
            let changed = match event {
                ButtonEvent::Click => Some(self.modes.single_click()),
                ButtonEvent::DoubleClick => self.modes.double_click(),
            };
            if let Some(mode) = changed {
                self.apply_mode(mode, now_ms)?;
            }
        }
        // Persistence faults must never stall clock processing.
        match self.store.tick(now_ms) {
            Ok(Some(written)) => debug!("settings flushed ({written} bytes)"),
            Ok(None) => {}
            Err(err) => warn!("settings write failed, keeping mode in RAM: {err}"),
        }
        if self.pot_delay.poll(now_ms) {
            let factor = self.transformer.poll_factor()?;
            self.show_factor(factor)?;
        }
        self.cluster.tick(now_ms)?;
        Ok(())
    }

    fn apply_mode(&mut self, mode: Mode, now_ms: u64) -> Result<(), DeviceError> {
        info!("mode -> {mode}");
        self.transformer.on_mode_changed(mode)?;
        self.cluster.show(mode.into())?;
        self.store.schedule(encode_mode(mode), now_ms);
        Ok(())
    }

    fn show_factor(&mut self, factor: u8) -> Result<(), DeviceError> {
        if factor == 1 {
            self.cluster.show(Indication::One)?;
        } else {
            self.cluster.show(self.modes.mode().into())?;
        }
        Ok(())
    }

    /// External clock rising edge (interrupt context).
    pub fn on_clock_edge(&mut self) -> Result<CycleOutcome, DeviceError> {
        let outcome = self.transformer.on_clock_edge(self.clock.now_micros())?;
        if outcome.is_unity() {
            self.cluster.show(Indication::One)?;
        } else {
            self.cluster.show(self.modes.mode().into())?;
        }
        Ok(outcome)
    }

    /// External reset rising edge (interrupt context).
    pub fn on_reset_edge(&mut self) -> Result<(), DeviceError> {
        Ok(self.transformer.on_reset_edge()?)
    }

    /// Secondary timer expiry (interrupt context).
    pub fn on_timer_tick(&mut self) -> Result<(), DeviceError> {
        Ok(self.transformer.on_timer_tick()?)
    }

    pub fn mode(&self) -> Mode {
        self.modes.mode()
    }

    /// Current cycle time estimate in microseconds.
    pub fn cycle_us(&self) -> u64 {
        self.transformer.cycle_us()
    }

    /// The clock-in pin, for ports that wire the edge interrupt themselves.
    pub fn clock_input(&mut self) -> &mut E {
        &mut self.clock_in
    }

    /// The reset-in pin, for ports that wire the edge interrupt themselves.
    pub fn reset_input(&mut self) -> &mut E {
        &mut self.reset_in
    }
}
