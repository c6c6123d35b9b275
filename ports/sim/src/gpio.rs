//! Simulated GPIO pin

use std::sync::{Arc, Mutex};

use ratchet_hal::gpio::{Edge, EdgeInput, GpioPin, Level, PinMode};
use ratchet_hal::HalResult;

#[derive(Debug)]
struct PinState {
    mode: Option<PinMode>,
    level: Level,
    writes: Vec<Level>,
    irq_edge: Option<Edge>,
}

/// Simulated pin with a shared probe handle.
///
/// `write` (the device side) appends to a history the test can inspect;
/// `drive` (the outside world: a patch cable, a button) changes the level
/// without touching the history.
#[derive(Debug, Clone)]
pub struct SimPin {
    number: u32,
    state: Arc<Mutex<PinState>>,
}

impl SimPin {
    pub fn new(number: u32) -> Self {
        Self {
            number,
            state: Arc::new(Mutex::new(PinState {
                mode: None,
                level: Level::Low,
                writes: Vec::new(),
                irq_edge: None,
            })),
        }
    }

    /// Pin that starts high, for active-low inputs with a pull-up.
    pub fn new_pulled_up(number: u32) -> Self {
        let pin = Self::new(number);
        pin.drive(Level::High);
        pin
    }

    /// Externally drive the pin level (input side; not logged as a write).
    pub fn drive(&self, level: Level) {
        self.lock().level = level;
    }

    /// Current level.
    pub fn level(&self) -> Level {
        self.lock().level
    }

    /// Levels written by the device, in order.
    pub fn writes(&self) -> Vec<Level> {
        self.lock().writes.clone()
    }

    pub fn clear_writes(&self) {
        self.lock().writes.clear();
    }

    /// Edge the device asked to be interrupted on, if any.
    pub fn interrupt_edge(&self) -> Option<Edge> {
        self.lock().irq_edge
    }

    /// Configured mode, if the device configured one.
    pub fn mode(&self) -> Option<PinMode> {
        self.lock().mode
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, PinState> {
        self.state.lock().expect("sim pin state poisoned")
    }
}

impl GpioPin for SimPin {
    fn set_mode(&mut self, mode: PinMode) -> HalResult<()> {
        self.lock().mode = Some(mode);
        Ok(())
    }

    fn read(&self) -> HalResult<Level> {
        Ok(self.lock().level)
    }

    fn write(&mut self, level: Level) -> HalResult<()> {
        let mut state = self.lock();
        state.level = level;
        state.writes.push(level);
        Ok(())
    }

    fn pin_number(&self) -> u32 {
        self.number
    }
}

impl EdgeInput for SimPin {
    fn enable_interrupt(&mut self, edge: Edge) -> HalResult<()> {
        self.lock().irq_edge = Some(edge);
        Ok(())
    }

    fn disable_interrupt(&mut self) -> HalResult<()> {
        self.lock().irq_edge = None;
        Ok(())
    }
}
