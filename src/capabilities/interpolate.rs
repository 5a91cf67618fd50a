//! Piecewise-linear range mapping with per-side extrapolation, as in Remotion's `interpolate()`.

use std::str::FromStr;

use crate::foundation::error::{ReelError, ReelResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Extrapolate {
    /// Keep following the slope of the outermost segment.
    #[default]
    Extend,
    Clamp,
    /// Return the input unchanged.
    Identity,
    /// Wrap the input around the segment.
    Wrap,
}

impl FromStr for Extrapolate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "extend" => Ok(Self::Extend),
            "clamp" => Ok(Self::Clamp),
            "identity" => Ok(Self::Identity),
            "wrap" => Ok(Self::Wrap),
            other => Err(format!(
                "extrapolation type must be one of extend, clamp, identity, wrap; got {other:?}"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InterpolateOptions {
    pub extrapolate_left: Extrapolate,
    pub extrapolate_right: Extrapolate,
}

/// Linear interpolation without easing.
pub fn interpolate(
    input: f64,
    input_range: &[f64],
    output_range: &[f64],
    options: InterpolateOptions,
) -> ReelResult<f64> {
    interpolate_eased(input, input_range, output_range, options, &mut |t| {
        Ok::<_, std::convert::Infallible>(t)
    })
    .map_err(|e| match e {
        InterpolateError::Range(msg) => ReelError::validation(msg),
        InterpolateError::Easing(never) => match never {},
    })
}

/// Failure of [`interpolate_eased`].
#[derive(Debug)]
pub(crate) enum InterpolateError<E> {
    Range(String),
    Easing(E),
}

pub(crate) fn validate_ranges(input_range: &[f64], output_range: &[f64]) -> Result<(), String> {
    if input_range.len() < 2 {
        return Err(format!(
            "inputRange must have at least 2 elements, got {}",
            input_range.len()
        ));
    }
    if input_range.len() != output_range.len() {
        return Err(format!(
            "inputRange ({}) and outputRange ({}) must have the same length",
            input_range.len(),
            output_range.len()
        ));
    }
    if let Some(bad) = input_range.iter().find(|v| !v.is_finite()) {
        return Err(format!(
            "inputRange must contain only finite numbers, got {bad}"
        ));
    }
    if output_range.iter().any(|v| v.is_nan()) {
        return Err("outputRange must contain only numbers".to_owned());
    }
    if input_range.windows(2).any(|w| w[1] <= w[0]) {
        return Err(format!(
            "inputRange must be strictly monotonically increasing, got {input_range:?}"
        ));
    }
    Ok(())
}

/// Index of the segment `[range[i], range[i + 1]]` used for `input`.
fn find_segment(input: f64, range: &[f64]) -> usize {
    let mut i = 1;
    while i < range.len() - 1 && range[i] < input {
        i += 1;
    }
    i - 1
}

/// Interpolation with an easing hook applied to the normalized segment position.
pub(crate) fn interpolate_eased<E>(
    input: f64,
    input_range: &[f64],
    output_range: &[f64],
    options: InterpolateOptions,
    easing: &mut dyn FnMut(f64) -> Result<f64, E>,
) -> Result<f64, InterpolateError<E>> {
    validate_ranges(input_range, output_range).map_err(InterpolateError::Range)?;
    let seg = find_segment(input, input_range);
    let (in_min, in_max) = (input_range[seg], input_range[seg + 1]);
    let (out_min, out_max) = (output_range[seg], output_range[seg + 1]);

    let mut x = input;
    if x < in_min {
        match options.extrapolate_left {
            Extrapolate::Identity => return Ok(x),
            Extrapolate::Clamp => x = in_min,
            Extrapolate::Wrap => x = wrap(x, in_min, in_max),
            Extrapolate::Extend => {}
        }
    }
    if x > in_max {
        match options.extrapolate_right {
            Extrapolate::Identity => return Ok(x),
            Extrapolate::Clamp => x = in_max,
            Extrapolate::Wrap => x = wrap(x, in_min, in_max),
            Extrapolate::Extend => {}
        }
    }
    if out_min == out_max {
        return Ok(out_min);
    }
    let t = easing((x - in_min) / (in_max - in_min)).map_err(InterpolateError::Easing)?;
    Ok(t * (out_max - out_min) + out_min)
}

fn wrap(x: f64, min: f64, max: f64) -> f64 {
    let span = max - min;
    ((x - min) % span + span) % span + min
}

#[cfg(test)]
#[path = "../../tests/unit/capabilities/interpolate.rs"]
mod tests;
