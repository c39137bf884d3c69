//! # Final disposition when the attempt budget is spent.
//!
//! [`OnExhaustion`] decides what an invocation returns once every allowed
//! attempt has failed with a qualifying failure:
//!
//! - [`OnExhaustion::raise`] (default) — propagate the last failure as
//!   [`RetryError::Exhausted`], indistinguishable from a non-retried failure
//!   except for the log trail.
//! - [`OnExhaustion::return_failure`] — hand the failure back as the call's
//!   value (requires the success type to be able to hold it).
//! - [`OnExhaustion::fallback`] — substitute a value computed from the
//!   failure.
//!
//! A fallback that panics propagates unhandled; the engine never retries a
//! failing fallback.

use std::fmt;
use std::sync::Arc;

use crate::error::RetryError;

/// Computes a substitute value from the last qualifying failure.
pub type RecoverFn<T, E> = Arc<dyn Fn(E) -> T + Send + Sync>;

/// Disposition applied once the attempt budget is spent.
pub enum OnExhaustion<T, E> {
    /// Propagate the last failure (default).
    Raise,
    /// Turn the last failure into the call's value.
    Recover(RecoverFn<T, E>),
}

impl<T, E> Clone for OnExhaustion<T, E> {
    fn clone(&self) -> Self {
        match self {
            OnExhaustion::Raise => OnExhaustion::Raise,
            OnExhaustion::Recover(f) => OnExhaustion::Recover(Arc::clone(f)),
        }
    }
}

impl<T, E> Default for OnExhaustion<T, E> {
    fn default() -> Self {
        OnExhaustion::Raise
    }
}

impl<T, E> fmt::Debug for OnExhaustion<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OnExhaustion::Raise => f.write_str("OnExhaustion::Raise"),
            OnExhaustion::Recover(_) => f.write_str("OnExhaustion::Recover(..)"),
        }
    }
}

impl<T, E> OnExhaustion<T, E> {
    /// Propagate the last failure as [`RetryError::Exhausted`].
    pub fn raise() -> Self {
        OnExhaustion::Raise
    }

    /// Return the causing failure as the call's value instead of raising it.
    ///
    /// # Example
    /// ```
    /// use retrier::OnExhaustion;
    ///
    /// let disposition: OnExhaustion<String, &str> = OnExhaustion::return_failure();
    /// ```
    pub fn return_failure() -> Self
    where
        E: Into<T>,
    {
        OnExhaustion::Recover(Arc::new(|failure: E| failure.into()))
    }

    /// Invoke `f(failure)` and return its result as the call's value.
    pub fn fallback<F>(f: F) -> Self
    where
        F: Fn(E) -> T + Send + Sync + 'static,
    {
        OnExhaustion::Recover(Arc::new(f))
    }

    /// Resolves the final outcome for the last qualifying failure.
    pub(crate) fn resolve(&self, failure: E) -> Result<T, RetryError<E>> {
        match self {
            OnExhaustion::Raise => Err(RetryError::Exhausted(failure)),
            OnExhaustion::Recover(f) => Ok(f(failure)),
        }
    }
}
