use crate::period::{PeriodEstimator, DEFAULT_CYCLE_US, EDGES_PER_ESTIMATE};

#[test]
fn default_cycle_before_first_estimate() {
    let estimator = PeriodEstimator::new(0);
    assert_eq!(estimator.cycle_us(), DEFAULT_CYCLE_US);
}

#[test]
fn five_equal_deltas_average_exactly() {
    let mut estimator = PeriodEstimator::new(0);
    let mut now = 0;
    let mut cycle = DEFAULT_CYCLE_US;
    for _ in 0..EDGES_PER_ESTIMATE {
        now += 100;
        cycle = estimator.on_edge(now);
    }
    assert_eq!(cycle, 100);
}

#[test]
fn sixth_edge_does_not_move_the_estimate() {
    let mut estimator = PeriodEstimator::new(0);
    let mut now = 0;
    for _ in 0..EDGES_PER_ESTIMATE {
        now += 100;
        estimator.on_edge(now);
    }
    // A much slower sixth edge only starts a new window.
    now += 900;
    assert_eq!(estimator.on_edge(now), 100);
    // Four more edges complete the window and the estimate moves.
    for _ in 0..EDGES_PER_ESTIMATE - 1 {
        now += 900;
        estimator.on_edge(now);
    }
    assert_eq!(estimator.cycle_us(), 900);
}

#[test]
fn estimate_is_never_zero() {
    let mut estimator = PeriodEstimator::new(0);
    for _ in 0..EDGES_PER_ESTIMATE {
        estimator.on_edge(0);
    }
    assert_eq!(estimator.cycle_us(), 1);
}

#[test]
fn first_sample_measures_against_construction_time() {
    // Known cold-start quirk: the first delta spans construction to first
    // edge and is accepted into the average.
    let mut estimator = PeriodEstimator::new(0);
    let mut now = 1_000;
    estimator.on_edge(now);
    for _ in 0..EDGES_PER_ESTIMATE - 1 {
        now += 100;
        estimator.on_edge(now);
    }
    assert_eq!(estimator.cycle_us(), (1_000 + 4 * 100) / 5);
}

#[test]
fn reset_restart_is_opt_in() {
    let mut plain = PeriodEstimator::new(0);
    let mut restarting = PeriodEstimator::new(0).with_reset_restart(true);
    let mut now = 0;
    for _ in 0..3 {
        now += 100;
        plain.on_edge(now);
        restarting.on_edge(now);
    }
    plain.on_reset();
    restarting.on_reset();
    // The plain estimator still counts the three old samples.
    for _ in 0..2 {
        now += 200;
        plain.on_edge(now);
    }
    assert_eq!(plain.cycle_us(), (3 * 100 + 2 * 200) / 5);
    // The restarting one needs a full fresh window.
    let mut now_r = 300;
    for _ in 0..EDGES_PER_ESTIMATE {
        now_r += 200;
        restarting.on_edge(now_r);
    }
    assert_eq!(restarting.cycle_us(), 200);
}
