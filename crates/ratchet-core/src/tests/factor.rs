use ratchet_port_sim::SimAdc;

use crate::factor::{index_for, FactorSelector, DIV_FACTORS, MULT_FACTORS};
use crate::mode::Mode;
use crate::rng::Lfsr;

/// Smallest raw reading that maps onto `idx` in a table of `len` entries.
pub(crate) fn reading_for(idx: usize, len: usize) -> u16 {
    ((idx * 1024 + len - 1) / len) as u16
}

fn selector(pot_raw: u16, cv_raw: u16) -> (FactorSelector<SimAdc>, SimAdc, SimAdc) {
    let pot = SimAdc::new(2);
    let cv = SimAdc::new(1);
    pot.set(pot_raw);
    cv.set(cv_raw);
    (FactorSelector::new(pot.clone(), cv.clone()), pot, cv)
}

#[test]
fn index_mapping_boundaries() {
    assert_eq!(index_for(0, MULT_FACTORS.len()), 0);
    assert_eq!(index_for(1023, MULT_FACTORS.len()), MULT_FACTORS.len() - 1);
    assert_eq!(index_for(512, MULT_FACTORS.len()), 3);
    assert_eq!(index_for(0, DIV_FACTORS.len()), 0);
    assert_eq!(index_for(1023, DIV_FACTORS.len()), DIV_FACTORS.len() - 1);
}

#[test]
fn mult_takes_the_louder_channel() {
    let (mut selector, _pot, _cv) = selector(0, 1023);
    let mut rng = Lfsr::new(1);
    assert_eq!(selector.select(Mode::Mult, &mut rng).unwrap(), 5);
}

#[test]
fn div_top_of_table_is_sixteen() {
    let (mut selector, _pot, _cv) = selector(1023, 0);
    let mut rng = Lfsr::new(1);
    assert_eq!(selector.select(Mode::Div, &mut rng).unwrap(), 16);
}

#[test]
fn zero_reading_selects_suppression() {
    let (mut selector, _pot, _cv) = selector(0, 0);
    let mut rng = Lfsr::new(1);
    assert_eq!(selector.select(Mode::Mult, &mut rng).unwrap(), 0);
    assert_eq!(selector.select(Mode::Div, &mut rng).unwrap(), 0);
}

#[test]
fn max_mult_draws_inside_the_channel_bounds() {
    let lo = reading_for(2, MULT_FACTORS.len());
    let hi = reading_for(5, MULT_FACTORS.len());
    let (mut selector, _pot, _cv) = selector(lo, hi);
    let mut rng = Lfsr::new(0x5EED);
    for _ in 0..100 {
        let factor = selector.select(Mode::MaxMult, &mut rng).unwrap();
        assert!((2..=5).contains(&factor), "factor {factor} out of bounds");
    }
}

#[test]
fn max_mult_bounds_commute() {
    // Whichever channel is higher acts as the upper bound.
    let lo = reading_for(1, MULT_FACTORS.len());
    let hi = reading_for(4, MULT_FACTORS.len());
    let (mut selector, _pot, _cv) = selector(hi, lo);
    let mut rng = Lfsr::new(0x5EED);
    for _ in 0..100 {
        let factor = selector.select(Mode::MaxMult, &mut rng).unwrap();
        assert!((1..=4).contains(&factor), "factor {factor} out of bounds");
    }
}

#[test]
fn max_mult_collapsed_bounds_reach_zero_and_one() {
    let (mut selector, pot, cv) = selector(0, 0);
    let mut rng = Lfsr::new(3);
    assert_eq!(selector.select(Mode::MaxMult, &mut rng).unwrap(), 0);
    let unity = reading_for(1, MULT_FACTORS.len());
    pot.set(unity);
    cv.set(unity);
    assert_eq!(selector.select(Mode::MaxMult, &mut rng).unwrap(), 1);
}
