//! # Backoff calculation for retry delays.
//!
//! [`Backoff`] controls how long an invocation waits between attempts. It is
//! parameterized by:
//! - [`Backoff::base`] the base delay;
//! - [`Backoff::exponential`] whether the delay doubles with each retry;
//! - [`Backoff::jitter`] randomization applied to the computed delay;
//! - [`Backoff::max`] an optional cap on the final delay.
//!
//! The delay before retry `n` (1-based) is `base * 2^(n-1)` when exponential,
//! otherwise `base`; jitter is applied to that value, and the result is
//! clamped to `max` when a cap is set. A delay of zero means "retry
//! immediately, no suspension".
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use retrier::Backoff;
//!
//! let backoff = Backoff::exponential(Duration::from_millis(100))
//!     .with_max(Duration::from_secs(10));
//!
//! // First retry — uses the base delay (100ms).
//! assert_eq!(backoff.delay(1), Duration::from_millis(100));
//!
//! // Second retry — 100ms * 2^1 = 200ms.
//! assert_eq!(backoff.delay(2), Duration::from_millis(200));
//!
//! // Tenth retry — 100ms * 2^9 = 51_200ms → capped at 10s.
//! assert_eq!(backoff.delay(10), Duration::from_secs(10));
//! ```

use std::time::Duration;

use crate::error::ConfigError;
use crate::policies::jitter::Jitter;

/// Delay strategy between attempts.
///
/// A `Backoff` is validated once, when the owning retrier is built, and is
/// then shared read-only by every invocation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Backoff {
    /// Base delay before the first retry.
    pub base: Duration,
    /// When `true`, the delay doubles with each subsequent retry.
    pub exponential: bool,
    /// Randomization applied to each computed delay.
    pub jitter: Jitter,
    /// Optional cap on the final delay; only valid with exponential growth.
    pub max: Option<Duration>,
}

impl Backoff {
    /// Constant delay of `base` between attempts.
    pub fn constant(base: Duration) -> Self {
        Self {
            base,
            exponential: false,
            jitter: Jitter::Off,
            max: None,
        }
    }

    /// Delay starting at `base` and doubling with each retry.
    pub fn exponential(base: Duration) -> Self {
        Self {
            base,
            exponential: true,
            jitter: Jitter::Off,
            max: None,
        }
    }

    /// Sets the jitter strategy.
    pub fn with_jitter(mut self, jitter: Jitter) -> Self {
        self.jitter = jitter;
        self
    }

    /// Caps every computed delay at `max`.
    pub fn with_max(mut self, max: Duration) -> Self {
        self.max = Some(max);
        self
    }

    /// Checks the backoff parameters for internal consistency.
    ///
    /// Invariants:
    /// - exponential growth requires `base > 0`, and `max` (if set) `> base`;
    /// - a cap without exponential growth is rejected;
    /// - the jitter extreme must not exceed `base`, and an explicit jitter
    ///   range must be ordered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.exponential {
            if self.base.is_zero() {
                return Err(ConfigError::ExponentialZeroBase);
            }
            if let Some(max) = self.max {
                if max <= self.base {
                    return Err(ConfigError::MaxNotAboveBase {
                        base: self.base,
                        max,
                    });
                }
            }
        } else if self.max.is_some() {
            return Err(ConfigError::MaxWithoutExponential);
        }

        if let Jitter::Range { min, max } = self.jitter {
            if min > max {
                return Err(ConfigError::InvertedJitterRange { min, max });
            }
        }
        let extreme = self.jitter.extreme_secs();
        if extreme > self.base.as_secs_f64() {
            return Err(ConfigError::JitterExceedsBase {
                bound: extreme,
                base: self.base,
            });
        }
        Ok(())
    }

    /// Computes the delay before retry number `retry` (1-based).
    ///
    /// Pure except for the jitter draw: the base share of the delay is derived
    /// solely from the retry number, so jitter output never feeds back into
    /// later delays.
    pub fn delay(&self, retry: u64) -> Duration {
        let mut secs = self.base.as_secs_f64();
        if self.exponential {
            let exp = retry.saturating_sub(1).min(i32::MAX as u64) as i32;
            secs *= 2f64.powi(exp);
        }
        secs = self.jitter.apply(secs);
        if let Some(max) = self.max {
            secs = secs.min(max.as_secs_f64());
        }
        if secs <= 0.0 {
            return Duration::ZERO;
        }
        // Overflow (or a non-finite product) saturates to the cap when one is set.
        Duration::try_from_secs_f64(secs).unwrap_or_else(|_| self.max.unwrap_or(Duration::MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_delay_every_retry() {
        let backoff = Backoff::constant(Duration::from_millis(250));
        for retry in 1..10 {
            assert_eq!(backoff.delay(retry), Duration::from_millis(250));
        }
    }

    #[test]
    fn exponential_doubles_exactly() {
        let backoff = Backoff::exponential(Duration::from_millis(100));
        assert_eq!(backoff.delay(1), Duration::from_millis(100));
        assert_eq!(backoff.delay(2), Duration::from_millis(200));
        assert_eq!(backoff.delay(3), Duration::from_millis(400));
        assert_eq!(backoff.delay(4), Duration::from_millis(800));
        assert_eq!(backoff.delay(5), Duration::from_millis(1600));
    }

    #[test]
    fn cap_clamps_every_delay() {
        let backoff =
            Backoff::exponential(Duration::from_millis(100)).with_max(Duration::from_secs(1));
        for retry in 1..40 {
            assert!(backoff.delay(retry) <= Duration::from_secs(1));
        }
        assert_eq!(backoff.delay(30), Duration::from_secs(1));
    }

    #[test]
    fn zero_base_means_no_suspension() {
        let backoff = Backoff::constant(Duration::ZERO);
        assert_eq!(backoff.delay(1), Duration::ZERO);
        assert_eq!(backoff.delay(7), Duration::ZERO);
    }

    #[test]
    fn huge_retry_number_saturates_to_cap() {
        let backoff =
            Backoff::exponential(Duration::from_millis(100)).with_max(Duration::from_secs(60));
        assert_eq!(backoff.delay(u64::MAX), Duration::from_secs(60));
    }

    #[test]
    fn jittered_range_stays_in_bounds() {
        let backoff = Backoff::constant(Duration::from_millis(100))
            .with_jitter(Jitter::Range { min: 0.0, max: 0.05 });
        backoff.validate().expect("valid config");
        for retry in 1..100 {
            let delay = backoff.delay(retry);
            assert!(delay >= Duration::from_millis(100), "delay {delay:?} below base");
            assert!(delay <= Duration::from_millis(150), "delay {delay:?} above base + max jitter");
        }
    }

    #[test]
    fn jitter_applies_before_cap() {
        // Base 1s doubling, cap 1.5s: retry 2 computes 2s, any jitter in
        // [-0.5s, +0.5s] still lands at or above the cap.
        let backoff = Backoff::exponential(Duration::from_secs(1))
            .with_jitter(Jitter::Uniform(Duration::from_millis(500)))
            .with_max(Duration::from_millis(1500));
        backoff.validate().expect("valid config");
        for _ in 0..50 {
            assert_eq!(backoff.delay(2), Duration::from_millis(1500));
        }
    }

    #[test]
    fn validate_rejects_exponential_zero_base() {
        let backoff = Backoff::exponential(Duration::ZERO);
        assert_eq!(backoff.validate(), Err(ConfigError::ExponentialZeroBase));
    }

    #[test]
    fn validate_rejects_cap_at_or_below_base() {
        let backoff =
            Backoff::exponential(Duration::from_secs(2)).with_max(Duration::from_secs(2));
        assert!(matches!(
            backoff.validate(),
            Err(ConfigError::MaxNotAboveBase { .. })
        ));
    }

    #[test]
    fn validate_rejects_cap_without_exponential() {
        let backoff = Backoff::constant(Duration::from_secs(1)).with_max(Duration::from_secs(5));
        assert_eq!(backoff.validate(), Err(ConfigError::MaxWithoutExponential));
    }

    #[test]
    fn validate_rejects_oversized_jitter() {
        let backoff = Backoff::constant(Duration::from_millis(100))
            .with_jitter(Jitter::Uniform(Duration::from_millis(200)));
        assert!(matches!(
            backoff.validate(),
            Err(ConfigError::JitterExceedsBase { .. })
        ));

        // The larger absolute bound of a range counts, even when negative.
        let backoff = Backoff::constant(Duration::from_millis(100))
            .with_jitter(Jitter::Range { min: -0.2, max: 0.05 });
        assert!(matches!(
            backoff.validate(),
            Err(ConfigError::JitterExceedsBase { .. })
        ));
    }

    #[test]
    fn validate_rejects_inverted_range() {
        let backoff = Backoff::constant(Duration::from_secs(1))
            .with_jitter(Jitter::Range { min: 0.5, max: 0.1 });
        assert_eq!(
            backoff.validate(),
            Err(ConfigError::InvertedJitterRange { min: 0.5, max: 0.1 })
        );
    }

    #[test]
    fn default_is_valid_and_immediate() {
        let backoff = Backoff::default();
        backoff.validate().expect("default config is valid");
        assert_eq!(backoff.delay(1), Duration::ZERO);
    }
}
