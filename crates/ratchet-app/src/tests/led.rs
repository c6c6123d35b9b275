use ratchet_hal::gpio::{GpioPin, Level};
use ratchet_port_sim::SimPin;

use crate::led::{Indication, Led, LedCluster, LedState, LedTester};

fn cluster() -> (LedCluster<SimPin>, SimPin, SimPin, SimPin) {
    let div = SimPin::new(7);
    let mult = SimPin::new(8);
    let one = SimPin::new(9);
    let cluster = LedCluster::new(div.clone(), mult.clone(), one.clone()).unwrap();
    (cluster, div, mult, one)
}

#[test]
fn one_overlay_preserves_the_mode_lamps() {
    let (mut cluster, div, mult, one) = cluster();
    cluster.show(Indication::Mult).unwrap();
    assert_eq!(mult.level(), Level::High);
    cluster.show(Indication::One).unwrap();
    assert_eq!(one.level(), Level::High);
    assert_eq!(mult.level(), Level::High, "mode lamp untouched by ONE");
    assert_eq!(div.level(), Level::Low);
    // Showing a mode again clears the overlay.
    cluster.show(Indication::Mult).unwrap();
    assert_eq!(one.level(), Level::Low);
}

#[test]
fn max_mult_lights_both_mode_lamps() {
    let (mut cluster, div, mult, one) = cluster();
    cluster.show(Indication::MaxMult).unwrap();
    assert_eq!(div.level(), Level::High);
    assert_eq!(mult.level(), Level::High);
    assert_eq!(one.level(), Level::Low);
}

#[test]
fn flashing_led_toggles_on_tick() {
    let pin = SimPin::new(6);
    let mut led = Led::new(pin.clone()).unwrap();
    led.set_state(LedState::Flash).unwrap();
    led.tick(501).unwrap();
    assert_eq!(pin.level(), Level::High);
    led.tick(700).unwrap();
    assert_eq!(pin.level(), Level::High);
    led.tick(1_002).unwrap();
    assert_eq!(pin.level(), Level::Low);
}

#[test]
fn power_on_sweep_touches_every_lamp_and_finishes() {
    let mut pins: Vec<SimPin> = (0..6).map(SimPin::new).collect();
    let probes = pins.clone();
    let mut tester = LedTester::new();
    let mut now_ms = 0;
    loop {
        let mut refs: Vec<&mut SimPin> = pins.iter_mut().collect();
        if tester.tick(now_ms, &mut refs).unwrap() {
            break;
        }
        now_ms += 25;
        assert!(now_ms < 10_000, "sweep never finished");
    }
    for probe in &probes {
        assert!(
            probe.writes().contains(&Level::High),
            "lamp {} never lit",
            probe.pin_number()
        );
        assert_eq!(probe.level(), Level::Low, "sweep must end dark");
    }
}
