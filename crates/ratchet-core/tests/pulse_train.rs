//! End-to-end pulse trains: edges and due timer ticks interleaved the way
//! the hardware would deliver them.

use ratchet_core::chance::ProbabilityGate;
use ratchet_core::factor::{FactorSelector, DIV_FACTORS, MULT_FACTORS};
use ratchet_core::period::PeriodEstimator;
use ratchet_core::rng::Lfsr;
use ratchet_core::transformer::ClockTransformer;
use ratchet_core::Mode;
use ratchet_hal::clock::MonotonicClock;
use ratchet_hal::gpio::Level;
use ratchet_port_sim::{SimAdc, SimClock, SimPin, SimTimer};

const CYCLE_US: u64 = 480_000;

struct Harness {
    transformer: ClockTransformer<SimPin, SimTimer, SimAdc>,
    clock: SimClock,
    out: SimPin,
    timer: SimTimer,
    freq_pot: SimAdc,
    chance_pot: SimAdc,
}

fn harness(mode: Mode) -> Harness {
    let clock = SimClock::new();
    let out = SimPin::new(5);
    let timer = SimTimer::new(clock.clone());
    let freq_pot = SimAdc::new(2);
    let freq_cv = SimAdc::new(1);
    let chance_pot = SimAdc::new(3);
    let chance_cv = SimAdc::new(0);
    let selector = FactorSelector::new(freq_pot.clone(), freq_cv.clone());
    let gate = ProbabilityGate::new(chance_pot.clone(), chance_cv.clone(), SimPin::new(6));
    let transformer = ClockTransformer::new(
        mode,
        out.clone(),
        timer.clone(),
        selector,
        gate,
        Lfsr::new(0x7777),
        PeriodEstimator::new(0),
    );
    Harness {
        transformer,
        clock,
        out,
        timer,
        freq_pot,
        chance_pot,
    }
}

impl Harness {
    /// Deliver every timer expiry due before the next edge, then the edge.
    fn drive_cycle(&mut self) {
        let next_edge = self.clock.now_micros() + CYCLE_US;
        while let Some(due) = self.timer.next_due() {
            if due >= next_edge {
                break;
            }
            self.clock.set_micros(due);
            self.transformer.on_timer_tick().unwrap();
            self.timer.mark_fired();
        }
        self.clock.set_micros(next_edge);
        self.transformer.on_clock_edge(next_edge).unwrap();
    }

    fn settle(&mut self) {
        for _ in 0..5 {
            self.drive_cycle();
        }
        assert_eq!(self.transformer.cycle_us(), CYCLE_US);
        self.out.clear_writes();
    }
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

#[test]
fn mult_by_three_triples_the_pulse_rate() {
    let mut harness = harness(Mode::Mult);
    harness.chance_pot.set(1023);
    harness
        .freq_pot
        .set(reading_for(3, MULT_FACTORS.len()));
    harness.settle();
    let before = harness.out.level();
    for _ in 0..4 {
        harness.drive_cycle();
    }
    assert_eq!(rising_edges(before, &harness.out.writes()), 4 * 3);
}

#[test]
fn div_by_three_yields_one_pulse_per_three_edges() {
    let mut harness = harness(Mode::Div);
    harness.chance_pot.set(1023);
    harness.freq_pot.set(reading_for(3, DIV_FACTORS.len()));
    harness.settle();
    let before = harness.out.level();
    for _ in 0..9 {
        harness.drive_cycle();
    }
    assert_eq!(rising_edges(before, &harness.out.writes()), 3);
}

#[test]
fn unity_yields_one_pulse_per_edge() {
    let mut harness = harness(Mode::Mult);
    harness.chance_pot.set(1023);
    harness
        .freq_pot
        .set(reading_for(1, MULT_FACTORS.len()));
    harness.settle();
    let before = harness.out.level();
    for _ in 0..4 {
        harness.drive_cycle();
    }
    assert_eq!(rising_edges(before, &harness.out.writes()), 4);
}

/// Smallest raw reading mapping onto `idx` in a table of `len` entries.
fn reading_for(idx: usize, len: usize) -> u16 {
    ((idx * 1024 + len - 1) / len) as u16
}
