use super::*;

fn lerp(input: f64, from: &[f64], to: &[f64]) -> f64 {
    interpolate(input, from, to, InterpolateOptions::default()).unwrap()
}

fn with(left: Extrapolate, right: Extrapolate) -> InterpolateOptions {
    InterpolateOptions {
        extrapolate_left: left,
        extrapolate_right: right,
    }
}

#[test]
fn maps_inside_each_segment() {
    assert_eq!(lerp(15.0, &[0.0, 30.0], &[0.0, 1.0]), 0.5);
    assert_eq!(lerp(50.0, &[0.0, 20.0, 100.0], &[0.0, 1.0, 0.0]), 0.625);
    assert_eq!(lerp(10.0, &[0.0, 20.0, 100.0], &[0.0, 1.0, 0.0]), 0.5);
}

#[test]
fn extends_by_default() {
    assert_eq!(lerp(60.0, &[0.0, 30.0], &[0.0, 1.0]), 2.0);
    assert_eq!(lerp(-30.0, &[0.0, 30.0], &[0.0, 1.0]), -1.0);
}

#[test]
fn clamp_identity_and_wrap() {
    let clamp = with(Extrapolate::Clamp, Extrapolate::Clamp);
    assert_eq!(interpolate(60.0, &[0.0, 30.0], &[0.0, 1.0], clamp).unwrap(), 1.0);
    assert_eq!(interpolate(-5.0, &[0.0, 30.0], &[0.0, 1.0], clamp).unwrap(), 0.0);

    let identity = with(Extrapolate::Identity, Extrapolate::Identity);
    assert_eq!(interpolate(42.0, &[0.0, 30.0], &[0.0, 1.0], identity).unwrap(), 42.0);

    let wrap = with(Extrapolate::Extend, Extrapolate::Wrap);
    assert_eq!(interpolate(15.0, &[0.0, 10.0], &[0.0, 100.0], wrap).unwrap(), 50.0);
}

#[test]
fn flat_output_segment_returns_its_value() {
    assert_eq!(lerp(99.0, &[0.0, 10.0], &[7.0, 7.0]), 7.0);
}

#[test]
fn rejects_malformed_ranges() {
    let opts = InterpolateOptions::default();
    for (input_range, output_range) in [
        (vec![0.0], vec![0.0]),
        (vec![0.0, 1.0], vec![0.0, 1.0, 2.0]),
        (vec![0.0, 0.0], vec![0.0, 1.0]),
        (vec![1.0, 0.0], vec![0.0, 1.0]),
        (vec![0.0, f64::INFINITY], vec![0.0, 1.0]),
    ] {
        let err = interpolate(0.5, &input_range, &output_range, opts).unwrap_err();
        assert!(matches!(err, ReelError::Validation(_)), "{input_range:?}");
    }
}

#[test]
fn extrapolation_names_parse() {
    assert_eq!("clamp".parse::<Extrapolate>().unwrap(), Extrapolate::Clamp);
    assert_eq!("extend".parse::<Extrapolate>().unwrap(), Extrapolate::Extend);
    assert!("bounce".parse::<Extrapolate>().is_err());
}
