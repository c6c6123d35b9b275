//! Ratchet clock utility on the host
//!
//! Drives the full device against the simulated port: power-on LED sweep,
//! then a 120 BPM clock reshaped in MULT, DIV and MAX MULT, with the mode
//! button operated mid-stream the way a user would. Pulse counts per cycle
//! are printed so the transformation is visible without hardware.

use ratchet_app::device::{Device, DeviceError, DeviceIo};
use ratchet_app::led::LedTester;
use ratchet_core::Mode;
use ratchet_hal::clock::MonotonicClock;
use ratchet_hal::gpio::Level;
use ratchet_port_sim::{SimAdc, SimClock, SimPin, SimStorage, SimTimer};

type SimDevice = Device<SimPin, SimPin, SimPin, SimAdc, SimTimer, SimStorage, SimClock>;

/// 120 BPM quarter notes.
const CYCLE_US: u64 = 500_000;

struct Rig {
    device: SimDevice,
    clock: SimClock,
    timer: SimTimer,
    out: SimPin,
    button: SimPin,
    freq_pot: SimAdc,
    freq_cv: SimAdc,
    chance_pot: SimAdc,
}

fn main() -> Result<(), DeviceError> {
    env_logger::init();

    let clock = SimClock::new();
    let clock_in = SimPin::new(2);
    let reset_in = SimPin::new(3);
    let mut out = SimPin::new(5);
    let mut led_chance = SimPin::new(6);
    let mut led_div = SimPin::new(7);
    let mut led_mult = SimPin::new(8);
    let mut led_one = SimPin::new(9);
    let mut heartbeat = SimPin::new(13);
    let button = SimPin::new_pulled_up(4);
    let chance_pot = SimAdc::new(3);
    let chance_cv = SimAdc::new(0);
    let freq_pot = SimAdc::new(2);
    let freq_cv = SimAdc::new(1);
    let timer = SimTimer::new(clock.clone());
    let storage = SimStorage::new(1024);

    // Show that all lamps work before the device takes the pins over.
    let mut tester = LedTester::new();
    loop {
        let mut lamps = [
            &mut led_div,
            &mut led_mult,
            &mut led_one,
            &mut led_chance,
            &mut heartbeat,
            &mut out,
        ];
        if tester.tick(clock.now_millis(), &mut lamps)? {
            break;
        }
        clock.advance_millis(5);
    }
    println!("lamp sweep done");

    let io = DeviceIo {
        clock_in,
        reset_in,
        gate_out: out.clone(),
        led_div,
        led_mult,
        led_one,
        led_chance,
        heartbeat,
        button: button.clone(),
        chance_pot: chance_pot.clone(),
        chance_cv,
        freq_pot: freq_pot.clone(),
        freq_cv: freq_cv.clone(),
        timer: timer.clone(),
        storage,
    };
    let device = Device::new(io, clock.clone(), 0xC1A0)?;
    log::info!("simulated device ready, starting in {}", device.mode());
    let mut rig = Rig {
        device,
        clock,
        timer,
        out,
        button,
        freq_pot,
        freq_cv,
        chance_pot,
    };

    println!("-- MULT, chance full, factor 3 --");
    rig.chance_pot.set(1023);
    rig.freq_pot.set(512); // index 3 of the MULT table
    run_cycles(&mut rig, 8)?;

    println!("-- single click -> DIV, dividing by 4 --");
    click(&mut rig)?;
    rig.freq_pot.set(373); // index 4 of the DIV table
    run_cycles(&mut rig, 8)?;

    println!("-- single click back, double click -> MAX MULT [2..5] --");
    click(&mut rig)?;
    double_click(&mut rig)?;
    rig.freq_pot.set(342); // lower bound: factor 2
    rig.freq_cv.set(854); // upper bound: factor 5
    run_cycles(&mut rig, 8)?;

    // Let the deferred settings write land before "power-off".
    rig.clock.advance_millis(2_100);
    rig.device.tick()?;
    println!("persisted mode: {}", rig.device.mode());
    assert_eq!(rig.device.mode(), Mode::MaxMult);
    Ok(())
}

/// Deliver every timer expiry due before the next edge, then the edge, then
/// a main-loop iteration; print the pulses the cycle produced.
fn run_cycles(rig: &mut Rig, cycles: u32) -> Result<(), DeviceError> {
    for n in 0..cycles {
        rig.out.clear_writes();
        let previous = rig.out.level();
        let next_edge = rig.clock.now_micros() + CYCLE_US;
        while let Some(due) = rig.timer.next_due() {
            if due >= next_edge {
                break;
            }
            rig.clock.set_micros(due);
            rig.device.on_timer_tick()?;
            rig.timer.mark_fired();
        }
        rig.clock.set_micros(next_edge);
        let outcome = rig.device.on_clock_edge()?;
        rig.device.tick()?;
        let pulses = rising_edges(previous, &rig.out.writes());
        println!("cycle {n}: {outcome:?}, {pulses} pulse(s) emitted");
    }
    Ok(())
}

fn rising_edges(mut previous: Level, writes: &[Level]) -> usize {
    let mut count = 0;
    for &level in writes {
        if level == Level::High && previous == Level::Low {
            count += 1;
        }
        previous = level;
    }
    count
}

fn click(rig: &mut Rig) -> Result<(), DeviceError> {
    rig.button.drive(Level::Low);
    rig.clock.advance_millis(1);
    rig.device.tick()?;
    rig.button.drive(Level::High);
    rig.clock.advance_millis(60);
    rig.device.tick()?;
    rig.clock.advance_millis(401);
    rig.device.tick()?;
    println!("mode is now {}", rig.device.mode());
    Ok(())
}

fn double_click(rig: &mut Rig) -> Result<(), DeviceError> {
    rig.button.drive(Level::Low);
    rig.clock.advance_millis(1);
    rig.device.tick()?;
    rig.button.drive(Level::High);
    rig.clock.advance_millis(60);
    rig.device.tick()?;
    rig.button.drive(Level::Low);
    rig.clock.advance_millis(50);
    rig.device.tick()?;
    rig.button.drive(Level::High);
    rig.clock.advance_millis(50);
    rig.device.tick()?;
    println!("mode is now {}", rig.device.mode());
    Ok(())
}
