use ratchet_hal::gpio::Level;
use ratchet_port_sim::{SimAdc, SimPin};

use crate::chance::ProbabilityGate;
use crate::rng::Lfsr;

fn gate(pot_raw: u16, cv_raw: u16) -> (ProbabilityGate<SimAdc, SimPin>, SimPin) {
    let pot = SimAdc::new(3);
    let cv = SimAdc::new(0);
    pot.set(pot_raw);
    cv.set(cv_raw);
    let led = SimPin::new(6);
    (ProbabilityGate::new(pot, cv, led.clone()), led)
}

#[test]
fn zero_chance_never_fires() {
    let (mut gate, led) = gate(0, 0);
    let mut rng = Lfsr::new(0x1111);
    for _ in 0..50 {
        assert!(!gate.decide(&mut rng).unwrap());
    }
    assert_eq!(led.level(), Level::Low);
}

#[test]
fn full_chance_always_fires() {
    let (mut gate, led) = gate(1023, 0);
    let mut rng = Lfsr::new(0x2222);
    for _ in 0..50 {
        assert!(gate.decide(&mut rng).unwrap());
    }
    assert_eq!(led.level(), Level::High);
}

#[test]
fn louder_channel_sets_the_level() {
    // CV at full scale dominates a zeroed pot.
    let (mut gate, _led) = gate(0, 1023);
    let mut rng = Lfsr::new(0x3333);
    for _ in 0..50 {
        assert!(gate.decide(&mut rng).unwrap());
    }
}

#[test]
fn indicator_mirrors_each_decision() {
    let (mut gate, led) = gate(512, 0);
    let mut rng = Lfsr::new(0x4444);
    for _ in 0..50 {
        let decision = gate.decide(&mut rng).unwrap();
        assert_eq!(led.level().is_high(), decision);
    }
}

#[test]
fn force_pins_the_indicator() {
    let (mut gate, led) = gate(0, 0);
    gate.force(true).unwrap();
    assert_eq!(led.level(), Level::High);
    gate.force(false).unwrap();
    assert_eq!(led.level(), Level::Low);
}

#[test]
fn midscale_level_fires_sometimes() {
    let (mut gate, _led) = gate(512, 0);
    let mut rng = Lfsr::new(0x5555);
    let fired = (0..200).filter(|_| gate.decide(&mut rng).unwrap()).count();
    assert!(fired > 0 && fired < 200, "fired {fired}/200");
}
