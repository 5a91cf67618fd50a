//! Spring easing with the knobs and defaults of Remotion's `spring()`.
//!
//! Progress is the closed-form step response of a damped harmonic oscillator
//! released from rest, sampled at `frame / fps` seconds.

/// Distance from the target under which a spring counts as settled.
pub const DEFAULT_REST_THRESHOLD: f64 = 0.005;

/// Frames a settled spring must stay inside the threshold.
const SETTLE_FRAMES: u32 = 20;

/// Upper bound on the natural-duration search, in seconds of animation.
const MAX_MEASURE_SECS: f64 = 120.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringConfig {
    pub damping: f64,
    pub mass: f64,
    pub stiffness: f64,
    pub overshoot_clamping: bool,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            damping: 10.0,
            mass: 1.0,
            stiffness: 100.0,
            overshoot_clamping: false,
        }
    }
}

/// One `spring({...})` evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Spring {
    pub frame: f64,
    pub fps: f64,
    pub config: SpringConfig,
    pub from: f64,
    pub to: f64,
    pub delay: f64,
    /// Stretch or squash the animation to last exactly this many frames.
    pub duration_in_frames: Option<f64>,
    pub reverse: bool,
}

impl Spring {
    pub fn new(frame: f64, fps: f64) -> Self {
        Self {
            frame,
            fps,
            config: SpringConfig::default(),
            from: 0.0,
            to: 1.0,
            delay: 0.0,
            duration_in_frames: None,
            reverse: false,
        }
    }

    pub fn value(&self) -> f64 {
        let natural = (self.reverse || self.duration_in_frames.is_some())
            .then(|| measure_spring(self.fps, &self.config, DEFAULT_REST_THRESHOLD));

        let frame = if self.reverse {
            self.duration_in_frames.or(natural).unwrap_or(0.0) - self.frame
        } else {
            self.frame
        };
        let delayed = if self.reverse {
            frame + self.delay
        } else {
            frame - self.delay
        };

        if let Some(duration) = self.duration_in_frames {
            if delayed > duration {
                return self.to;
            }
        }
        let scaled = match (self.duration_in_frames, natural) {
            (Some(duration), Some(natural)) if duration > 0.0 && natural > 0.0 => {
                delayed / (duration / natural)
            }
            _ => delayed,
        };

        let mut progress = step_response(scaled / self.fps, &self.config);
        if self.config.overshoot_clamping {
            progress = progress.min(1.0);
        }
        self.from + (self.to - self.from) * progress
    }
}

/// Frames until a 0 -> 1 spring settles within `threshold` and stays there.
pub fn measure_spring(fps: f64, config: &SpringConfig, threshold: f64) -> f64 {
    let limit = (fps * MAX_MEASURE_SECS).max(1.0) as u32;
    let off = |frame: u32| (step_response(f64::from(frame) / fps, config) - 1.0).abs();

    let mut frame = 0u32;
    while off(frame) >= threshold && frame < limit {
        frame += 1;
    }
    let mut finished = frame;
    let mut calm = 0;
    while calm < SETTLE_FRAMES && frame < limit {
        frame += 1;
        if off(frame) >= threshold {
            calm = 0;
            finished = frame + 1;
        } else {
            calm += 1;
        }
    }
    f64::from(finished)
}

/// Position at `t` seconds of a spring moving from 0 to 1, starting at rest.
pub fn step_response(t: f64, config: &SpringConfig) -> f64 {
    if t <= 0.0 || !t.is_finite() {
        return if t == f64::INFINITY { 1.0 } else { 0.0 };
    }
    let k = config.stiffness.max(0.0);
    let c = config.damping.max(0.0);
    let m = config.mass.max(1e-9);

    let w0 = (k / m).sqrt();
    if w0 == 0.0 {
        return 0.0;
    }
    let zeta = c / (2.0 * (k * m).sqrt()).max(1e-9);

    if (zeta - 1.0).abs() < 1e-6 {
        // Critically damped.
        let e = (-w0 * t).exp();
        1.0 - e * (1.0 + w0 * t)
    } else if zeta < 1.0 {
        // Underdamped.
        let wd = w0 * (1.0 - zeta * zeta).sqrt();
        let e = (-zeta * w0 * t).exp();
        let ratio = zeta / (1.0 - zeta * zeta).sqrt();
        1.0 - e * ((wd * t).cos() + ratio * (wd * t).sin())
    } else {
        // Overdamped.
        let z2 = (zeta * zeta - 1.0).sqrt();
        let r1 = -w0 * (zeta - z2);
        let r2 = -w0 * (zeta + z2);
        let c2 = (zeta + z2) / (2.0 * z2);
        let c1 = (zeta - z2) / (2.0 * z2);
        1.0 - (c2 * (r1 * t).exp() - c1 * (r2 * t).exp())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capabilities/spring.rs"]
mod tests;
