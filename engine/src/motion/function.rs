//! Motion functions
//!
//! A motion function prescribes a scalar displacement over time together
//! with its first two derivatives. The external integrator queries bound
//! functions during each step, possibly more than once per step, so
//! implementations are immutable and shareable across threads.

use std::f64::consts::TAU;
use std::fmt::Debug;

use serde::{Deserialize, Serialize};

/// Displacement signal `x(t)` with derivatives.
pub trait MotionFunction: Send + Sync + Debug {
    /// Displacement at time `t` (meters)
    fn value(&self, t: f64) -> f64;
    /// First derivative at time `t` (m/s)
    fn velocity(&self, t: f64) -> f64;
    /// Second derivative at time `t` (m/s²)
    fn acceleration(&self, t: f64) -> f64;
}

static_assertions::assert_obj_safe!(MotionFunction);

/// Harmonic excitation `amplitude * sin(phase + 2π * frequency * (t - start_time))`.
///
/// Zero before `start_time`, so the structure can settle first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SineMotion {
    /// Phase at `start_time` (radians)
    pub phase: f64,
    /// Frequency (Hz)
    pub frequency: f64,
    /// Peak displacement (meters)
    pub amplitude: f64,
    /// Time the oscillation begins (seconds)
    pub start_time: f64,
}

impl Default for SineMotion {
    fn default() -> Self {
        Self {
            phase: 0.0,
            frequency: 1.6,
            amplitude: 0.5,
            start_time: 0.0,
        }
    }
}

impl SineMotion {
    fn angular_frequency(&self) -> f64 {
        TAU * self.frequency
    }

    /// Phase angle at `t`, or `None` before the motion starts.
    fn angle(&self, t: f64) -> Option<f64> {
        (t >= self.start_time)
            .then(|| self.phase + self.angular_frequency() * (t - self.start_time))
    }
}

impl MotionFunction for SineMotion {
    fn value(&self, t: f64) -> f64 {
        self.angle(t).map_or(0.0, |a| self.amplitude * a.sin())
    }

    fn velocity(&self, t: f64) -> f64 {
        let w = self.angular_frequency();
        self.angle(t).map_or(0.0, |a| self.amplitude * w * a.cos())
    }

    fn acceleration(&self, t: f64) -> f64 {
        let w = self.angular_frequency();
        self.angle(t).map_or(0.0, |a| -self.amplitude * w * w * a.sin())
    }
}

static_assertions::assert_impl_all!(SineMotion: MotionFunction, Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sine_is_quiet_before_start() {
        let motion = SineMotion {
            start_time: 2.0,
            ..Default::default()
        };
        assert_eq!(motion.value(1.9), 0.0);
        assert_eq!(motion.velocity(1.9), 0.0);
        assert_eq!(motion.acceleration(1.9), 0.0);
        assert_eq!(motion.value(2.0), 0.0);
    }

    #[test]
    fn sine_quarter_period_peaks() {
        let motion = SineMotion {
            frequency: 1.0,
            amplitude: 0.5,
            ..Default::default()
        };
        assert!((motion.value(0.25) - 0.5).abs() < 1e-12);
        assert!(motion.velocity(0.25).abs() < 1e-12);
        assert!((motion.velocity(0.0) - 0.5 * TAU).abs() < 1e-12);
        assert!((motion.acceleration(0.25) + 0.5 * TAU * TAU).abs() < 1e-9);
    }

    #[test]
    fn derivatives_match_finite_differences() {
        let motion = SineMotion::default();
        let h = 1e-6;
        for t in [0.1, 0.7, 1.3] {
            let dv = (motion.value(t + h) - motion.value(t - h)) / (2.0 * h);
            let da = (motion.velocity(t + h) - motion.velocity(t - h)) / (2.0 * h);
            assert!((dv - motion.velocity(t)).abs() < 1e-5);
            assert!((da - motion.acceleration(t)).abs() < 1e-3);
        }
    }
}
