// Host-side tests for the adaptive pixel-density governor.

use flight_core::*;

/// Feed `frames` deltas of `dt`, collecting every level change.
fn feed(gov: &mut QualityGovernor, dt: f32, frames: usize) -> Vec<QualityChange> {
    (0..frames).filter_map(|_| gov.record_frame(dt)).collect()
}

fn twitchy() -> GovernorConfig {
    GovernorConfig {
        windows_per_decision: 1,
        debounce_sec: 0.0,
        max_flipflops: 2,
        ..GovernorConfig::default()
    }
}

#[test]
fn levels_map_to_bounded_pixel_ratios() {
    assert_eq!(QualityLevel::Low.pixel_ratio(), 1.0);
    assert_eq!(QualityLevel::Medium.pixel_ratio(), 1.25);
    assert_eq!(QualityLevel::High.pixel_ratio(), 1.5);
    assert_eq!(QualityLevel::capped(1.5), QualityLevel::High);
    assert_eq!(QualityLevel::capped(1.25), QualityLevel::Medium);
    assert_eq!(QualityLevel::capped(1.1), QualityLevel::Low);
    assert_eq!(effective_pixel_ratio(QualityLevel::High, 3.0), 1.5);
    assert_eq!(effective_pixel_ratio(QualityLevel::High, 1.0), 1.0);
    assert_eq!(effective_pixel_ratio(QualityLevel::Medium, 0.5), 1.0);
}

#[test]
fn sustained_slow_frames_step_down_to_the_floor() {
    let mut gov = QualityGovernor::default();
    assert_eq!(gov.level(), QualityLevel::High);
    let changes = feed(&mut gov, 1.0 / 30.0, 60 * 30);
    assert_eq!(
        changes,
        vec![
            QualityChange { from: QualityLevel::High, to: QualityLevel::Medium },
            QualityChange { from: QualityLevel::Medium, to: QualityLevel::Low },
        ]
    );
    assert_eq!(gov.level(), QualityLevel::Low);
    assert!(!gov.is_locked());
}

#[test]
fn smooth_frames_change_nothing() {
    let mut gov = QualityGovernor::default();
    assert!(feed(&mut gov, 1.0 / 60.0, 60 * 30).is_empty());
    assert_eq!(gov.level(), QualityLevel::High);
}

#[test]
fn changes_are_debounced() {
    let config = GovernorConfig {
        windows_per_decision: 1,
        ..GovernorConfig::default()
    };
    let mut gov = QualityGovernor::new(config, QualityLevel::High);
    let dt = 1.0 / 20.0;
    let mut clock = 0.0_f32;
    let mut times = Vec::new();
    for _ in 0..400 {
        clock += dt;
        if gov.record_frame(dt).is_some() {
            times.push(clock);
        }
    }
    assert_eq!(times.len(), 2);
    assert!(times[1] - times[0] >= config.debounce_sec - 1e-3, "{times:?}");
}

#[test]
fn never_rises_above_the_ceiling() {
    let mut gov = QualityGovernor::new(GovernorConfig::default(), QualityLevel::Medium);
    assert!(feed(&mut gov, 1.0 / 120.0, 120 * 10).is_empty());
    assert_eq!(gov.level(), QualityLevel::Medium);

    feed(&mut gov, 1.0 / 30.0, 30 * 5);
    assert_eq!(gov.level(), QualityLevel::Low);
    feed(&mut gov, 1.0 / 120.0, 120 * 20);
    assert_eq!(gov.level(), QualityLevel::Medium);
}

#[test]
fn ignores_degenerate_deltas() {
    let mut gov = QualityGovernor::new(twitchy(), QualityLevel::High);
    for dt in [0.0, -1.0, f32::NAN, f32::INFINITY] {
        assert!(gov.record_frame(dt).is_none());
    }
    assert_eq!(gov.level(), QualityLevel::High);
}

#[test]
fn repeated_reversals_lock_at_the_lower_level() {
    let mut gov = QualityGovernor::new(twitchy(), QualityLevel::High);
    let slow = |g: &mut QualityGovernor| feed(g, 1.0 / 30.0, 8);
    let fast = |g: &mut QualityGovernor| feed(g, 1.0 / 120.0, 31);

    assert_eq!(slow(&mut gov).len(), 1);
    assert_eq!(gov.level(), QualityLevel::Medium);
    assert_eq!(fast(&mut gov).len(), 1);
    assert_eq!(gov.level(), QualityLevel::High);
    assert_eq!(gov.flipflops(), 1);

    slow(&mut gov);
    assert!(gov.is_locked());
    assert_eq!(gov.level(), QualityLevel::Medium);

    for _ in 0..20 {
        assert!(fast(&mut gov).is_empty());
        assert!(slow(&mut gov).is_empty());
    }
    assert_eq!(gov.level(), QualityLevel::Medium);
}
