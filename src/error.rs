//! Error types used by the retry engine.
//!
//! This module defines two error enums:
//!
//! - [`ConfigError`] — invalid policy parameters, reported at build time by the
//!   retrier builders. A policy that builds successfully never produces a
//!   configuration error during execution.
//! - [`RetryError`] — terminal outcomes of an execution that did not end in the
//!   operation's success value.
//!
//! Both types provide `as_label` helpers (short snake_case tags) for
//! logs/metrics.

use std::time::Duration;
use thiserror::Error;

/// # Invalid retry-policy parameters.
///
/// Produced by [`Retrier::builder`](crate::Retrier::builder) and
/// [`AsyncRetrier::builder`](crate::AsyncRetrier::builder) when the backoff /
/// jitter / cap combination is internally inconsistent. Validation runs once
/// when the policy is built and is never repeated per call.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Exponential backoff with a zero base would never grow; a positive base is required.
    #[error("exponential backoff requires a base delay > 0")]
    ExponentialZeroBase,

    /// The delay cap must leave room above the base delay.
    #[error("max delay {max:?} must be greater than the base delay {base:?}")]
    MaxNotAboveBase {
        /// Configured base delay.
        base: Duration,
        /// Configured cap that is not above it.
        max: Duration,
    },

    /// A delay cap only makes sense when delays grow.
    #[error("a max delay requires exponential backoff")]
    MaxWithoutExponential,

    /// Jitter may never push a delay below zero, so its extreme is bounded by the base delay.
    #[error("jitter extreme {bound}s exceeds the base delay {base:?}")]
    JitterExceedsBase {
        /// Largest absolute jitter bound, in seconds.
        bound: f64,
        /// Configured base delay.
        base: Duration,
    },

    /// An explicit jitter range must be ordered.
    #[error("jitter range min {min}s is greater than max {max}s")]
    InvertedJitterRange {
        /// Lower bound of the range, in seconds.
        min: f64,
        /// Upper bound of the range, in seconds.
        max: f64,
    },
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use retrier::ConfigError;
    ///
    /// assert_eq!(ConfigError::ExponentialZeroBase.as_label(), "config_exponential_zero_base");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::ExponentialZeroBase => "config_exponential_zero_base",
            ConfigError::MaxNotAboveBase { .. } => "config_max_not_above_base",
            ConfigError::MaxWithoutExponential => "config_max_without_exponential",
            ConfigError::JitterExceedsBase { .. } => "config_jitter_exceeds_base",
            ConfigError::InvertedJitterRange { .. } => "config_inverted_jitter_range",
        }
    }
}

/// # Terminal outcomes of a retried execution.
///
/// `E` is the caller's failure type, carried through unchanged so the caller
/// can inspect the original failure exactly as the operation produced it.
///
/// - [`RetryError::Rejected`] — the failure did not qualify for retry; it is
///   propagated immediately, untouched by hooks, backoff, or exhaustion
///   handling.
/// - [`RetryError::Exhausted`] — the attempt budget was spent; carries the
///   last qualifying failure (the default exhaustion disposition).
/// - [`RetryError::Canceled`] — the wait between attempts was interrupted by
///   cooperative cancellation. Only produced by the async form; never reaches
///   the exhaustion disposition.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RetryError<E> {
    /// Failure outside the qualifying set; never retried.
    #[error("non-retryable failure: {0}")]
    Rejected(E),

    /// Attempt budget spent; carries the last qualifying failure, unchanged.
    #[error("retries exhausted: {0}")]
    Exhausted(E),

    /// Cancellation arrived while waiting for the next attempt.
    #[error("canceled while waiting for the next attempt")]
    Canceled,
}

impl<E> RetryError<E> {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            RetryError::Rejected(_) => "retry_rejected",
            RetryError::Exhausted(_) => "retry_exhausted",
            RetryError::Canceled => "retry_canceled",
        }
    }

    /// Returns the original failure, if this outcome carries one.
    ///
    /// # Example
    /// ```
    /// use retrier::RetryError;
    ///
    /// let err: RetryError<&str> = RetryError::Exhausted("boom");
    /// assert_eq!(err.into_inner(), Some("boom"));
    ///
    /// let canceled: RetryError<&str> = RetryError::Canceled;
    /// assert_eq!(canceled.into_inner(), None);
    /// ```
    pub fn into_inner(self) -> Option<E> {
        match self {
            RetryError::Rejected(e) | RetryError::Exhausted(e) => Some(e),
            RetryError::Canceled => None,
        }
    }

    /// `true` when the attempt budget was spent.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, RetryError::Exhausted(_))
    }
}
