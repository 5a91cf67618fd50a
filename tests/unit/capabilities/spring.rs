use super::*;

fn at(frame: f64) -> Spring {
    Spring::new(frame, 30.0)
}

#[test]
fn step_response_starts_at_rest_and_settles() {
    let cfg = SpringConfig::default();
    assert_eq!(step_response(0.0, &cfg), 0.0);
    assert_eq!(step_response(-1.0, &cfg), 0.0);
    assert!((step_response(5.0, &cfg) - 1.0).abs() < 1e-6);
}

#[test]
fn all_damping_regimes_converge() {
    for damping in [2.0, 20.0, 80.0] {
        let cfg = SpringConfig {
            damping,
            ..SpringConfig::default()
        };
        let v = step_response(30.0, &cfg);
        assert!((v - 1.0).abs() < 1e-3, "damping {damping}: {v}");
    }
}

#[test]
fn default_spring_overshoots_unless_clamped() {
    let peak = (0..60).map(|f| at(f64::from(f)).value()).fold(0.0, f64::max);
    assert!(peak > 1.0, "default config is underdamped, peak {peak}");

    let mut clamped = at(0.0);
    clamped.config.overshoot_clamping = true;
    for f in 0..60 {
        clamped.frame = f64::from(f);
        assert!(clamped.value() <= 1.0);
    }
}

#[test]
fn from_to_and_delay() {
    let mut s = at(10.0);
    s.delay = 10.0;
    s.from = 100.0;
    s.to = 200.0;
    assert_eq!(s.value(), 100.0);

    s.frame = 300.0;
    assert!((s.value() - 200.0).abs() < 1e-3);
}

#[test]
fn duration_in_frames_rescales_to_end_on_target() {
    let mut s = at(0.0);
    s.duration_in_frames = Some(15.0);
    assert_eq!(s.value(), 0.0);
    s.frame = 15.0;
    assert!((s.value() - 1.0).abs() < 0.01);
    s.frame = 16.0;
    assert_eq!(s.value(), 1.0);
}

#[test]
fn reverse_runs_from_target_back_to_origin() {
    let mut s = at(0.0);
    s.reverse = true;
    assert!((s.value() - 1.0).abs() < 0.01);
    s.frame = 1_000.0;
    assert_eq!(s.value(), 0.0);
}

#[test]
fn natural_duration_is_finite_and_stiffer_is_shorter() {
    let soft = measure_spring(30.0, &SpringConfig::default(), DEFAULT_REST_THRESHOLD);
    let stiff = measure_spring(
        30.0,
        &SpringConfig {
            stiffness: 400.0,
            damping: 40.0,
            ..SpringConfig::default()
        },
        DEFAULT_REST_THRESHOLD,
    );
    assert!(soft > 0.0 && soft < 30.0 * 120.0);
    assert!(stiff < soft, "stiff {stiff} soft {soft}");
}
