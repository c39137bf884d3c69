//! # Jitter for retry delays.
//!
//! [`Jitter`] perturbs a computed backoff delay so that many callers retrying
//! against the same resource do not wake up in lockstep.
//!
//! - [`Jitter::Off`] — no randomization, predictable delays
//! - [`Jitter::Uniform`] — the delay is shifted by a value drawn uniformly
//!   from `[-magnitude, +magnitude]`
//! - [`Jitter::Range`] — a value drawn uniformly from an explicit
//!   `[min, max]` range (in signed seconds) is added to the delay
//!
//! The policy builders reject configurations whose jitter extreme exceeds the
//! base delay, so an applied jitter can never drive a delay negative.

use rand::Rng;
use std::time::Duration;

/// Randomization applied to each computed backoff delay.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Jitter {
    /// No jitter: use the exact computed delay.
    ///
    /// Use when only one caller retries (no herd risk) or when predictable
    /// timing is required, e.g. in tests.
    Off,

    /// Symmetric jitter: shift the delay by a uniform draw from
    /// `[-magnitude, +magnitude]`.
    Uniform(Duration),

    /// Explicit jitter range: add a uniform draw from `[min, max]` seconds.
    ///
    /// Bounds are signed, so a range like `(-0.02, 0.05)` skews delays
    /// slightly upward while still allowing them to shrink.
    Range {
        /// Lower bound, in seconds.
        min: f64,
        /// Upper bound, in seconds.
        max: f64,
    },
}

impl Default for Jitter {
    /// Returns [`Jitter::Off`].
    fn default() -> Self {
        Jitter::Off
    }
}

impl Jitter {
    /// Largest absolute deviation this jitter can produce, in seconds.
    ///
    /// Used by policy validation: the extreme must not exceed the base delay.
    pub(crate) fn extreme_secs(&self) -> f64 {
        match *self {
            Jitter::Off => 0.0,
            Jitter::Uniform(magnitude) => magnitude.as_secs_f64(),
            Jitter::Range { min, max } => min.abs().max(max.abs()),
        }
    }

    /// Applies jitter to a delay expressed in seconds.
    ///
    /// The result may be negative for pathological inputs; the backoff
    /// calculator floors the final delay at zero.
    pub(crate) fn apply(&self, delay_secs: f64) -> f64 {
        match *self {
            Jitter::Off => delay_secs,
            Jitter::Uniform(magnitude) => {
                let j = magnitude.as_secs_f64();
                if j == 0.0 {
                    return delay_secs;
                }
                let mut rng = rand::rng();
                delay_secs + rng.random_range(-j..=j)
            }
            Jitter::Range { min, max } => {
                if min == max {
                    return delay_secs + min;
                }
                let mut rng = rand::rng();
                delay_secs + rng.random_range(min..=max)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn off_is_identity() {
        assert_eq!(Jitter::Off.apply(0.25), 0.25);
        assert_eq!(Jitter::Off.extreme_secs(), 0.0);
    }

    #[test]
    fn uniform_stays_within_magnitude() {
        let jitter = Jitter::Uniform(Duration::from_millis(50));
        for _ in 0..200 {
            let out = jitter.apply(0.1);
            assert!(out >= 0.05 - 1e-9, "out {out} below 0.05");
            assert!(out <= 0.15 + 1e-9, "out {out} above 0.15");
        }
    }

    #[test]
    fn uniform_zero_magnitude_is_identity() {
        assert_eq!(Jitter::Uniform(Duration::ZERO).apply(0.3), 0.3);
    }

    #[test]
    fn range_stays_within_bounds() {
        let jitter = Jitter::Range { min: 0.0, max: 0.05 };
        for _ in 0..200 {
            let out = jitter.apply(0.1);
            assert!(out >= 0.1 - 1e-9, "out {out} below 0.1");
            assert!(out <= 0.15 + 1e-9, "out {out} above 0.15");
        }
    }

    #[test]
    fn degenerate_range_adds_constant() {
        let jitter = Jitter::Range { min: 0.02, max: 0.02 };
        assert!((jitter.apply(0.1) - 0.12).abs() < 1e-9);
    }

    #[test]
    fn extreme_uses_largest_absolute_bound() {
        let jitter = Jitter::Range { min: -0.3, max: 0.1 };
        assert!((jitter.extreme_secs() - 0.3).abs() < 1e-12);
        let jitter = Jitter::Uniform(Duration::from_millis(200));
        assert!((jitter.extreme_secs() - 0.2).abs() < 1e-12);
    }
}
