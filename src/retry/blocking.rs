//! # Blocking retrier.
//!
//! [`Retrier`] wraps a fallible operation and re-invokes it according to the
//! configured policy, sleeping on the calling thread between attempts.
//!
//! ## Example
//! ```
//! use std::time::Duration;
//! use retrier::{Backoff, Retrier};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let retrier: Retrier<u32, String> = Retrier::builder()
//!     .name("fetch-config")
//!     .retries(3)
//!     .backoff(Backoff::constant(Duration::ZERO))
//!     .build()?;
//!
//! let mut failures_left = 2;
//! let value = retrier.execute(|| {
//!     if failures_left > 0 {
//!         failures_left -= 1;
//!         Err("not ready".to_string())
//!     } else {
//!         Ok(7)
//!     }
//! })?;
//! assert_eq!(value, 7);
//! # Ok(())
//! # }
//! ```

use std::borrow::Cow;
use std::fmt::Display;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::error::{ConfigError, RetryError};
use crate::hooks::{Hooks, Matcher};
use crate::policies::{Backoff, Budget, OnExhaustion};

/// Blocking retry policy plus engine.
///
/// Immutable once built; share it across threads by cloning.
pub struct Retrier<T, E> {
    name: Cow<'static, str>,
    qualifies: Matcher<E>,
    budget: Budget,
    backoff: Backoff,
    hooks: Hooks<E>,
    on_exhaustion: OnExhaustion<T, E>,
}

impl<T, E> std::fmt::Debug for Retrier<T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Retrier")
            .field("name", &self.name)
            .field("budget", &self.budget)
            .field("backoff", &self.backoff)
            .field("on_exhaustion", &self.on_exhaustion)
            .finish_non_exhaustive()
    }
}

impl<T, E> Clone for Retrier<T, E> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            qualifies: Arc::clone(&self.qualifies),
            budget: self.budget,
            backoff: self.backoff,
            hooks: self.hooks.clone(),
            on_exhaustion: self.on_exhaustion.clone(),
        }
    }
}

impl<T, E> Retrier<T, E> {
    /// Starts building a policy; [`RetrierBuilder::build`] validates it.
    pub fn builder() -> RetrierBuilder<T, E> {
        RetrierBuilder::new()
    }

    /// The name used in log lines.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<T, E: Display> Retrier<T, E> {
    /// Invokes `op` until it succeeds, fails terminally, or the budget is
    /// spent.
    ///
    /// Per qualifying failure the engine dispatches hooks, logs a warning,
    /// and sleeps for the computed backoff delay (a zero delay retries
    /// immediately). A failure outside the qualifying set is returned as
    /// [`RetryError::Rejected`] untouched — no hooks, no backoff, no
    /// exhaustion handling.
    pub fn execute<F>(&self, mut op: F) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Result<T, E>,
    {
        let mut failures: u64 = 0;
        loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(failure) => {
                    if !(self.qualifies)(&failure) {
                        return Err(RetryError::Rejected(failure));
                    }

                    let last = self.budget.is_last_attempt(failures);
                    self.hooks.dispatch(&failure, last);

                    failures += 1;
                    log::warn!("{}: attempt {} failed: {}", self.name, failures, failure);

                    if self.budget.is_spent(failures) {
                        log::error!("{}: exceeded {} attempts", self.name, failures);
                        return self.on_exhaustion.resolve(failure);
                    }

                    let delay = self.backoff.delay(failures);
                    if delay > Duration::ZERO {
                        thread::sleep(delay);
                    }
                }
            }
        }
    }

    /// Wraps `op` into a callable of the same shape, retried per this policy.
    ///
    /// `A` is the operation's argument bundle (use a tuple for several
    /// arguments); it must be `Clone` so later attempts can re-invoke the
    /// operation with the original arguments.
    ///
    /// # Example
    /// ```
    /// use retrier::Retrier;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let retrier: Retrier<usize, String> = Retrier::builder()
    ///     .retries(1)
    ///     .build()?;
    ///
    /// let mut wrapped = retrier.wrap(|(text, repeat): (String, usize)| {
    ///     if repeat == 0 {
    ///         Err("zero repeat".to_string())
    ///     } else {
    ///         Ok(text.len() * repeat)
    ///     }
    /// });
    ///
    /// assert_eq!(wrapped(("ab".to_string(), 3))?, 6);
    /// # Ok(())
    /// # }
    /// ```
    pub fn wrap<A, F>(self, mut op: F) -> impl FnMut(A) -> Result<T, RetryError<E>>
    where
        A: Clone,
        F: FnMut(A) -> Result<T, E>,
    {
        move |args: A| self.execute(|| op(args.clone()))
    }
}

/// Builder for [`Retrier`]; `build` runs the configuration validator.
pub struct RetrierBuilder<T, E> {
    name: Cow<'static, str>,
    qualifies: Matcher<E>,
    budget: Budget,
    backoff: Backoff,
    hooks: Hooks<E>,
    on_exhaustion: OnExhaustion<T, E>,
}

impl<T, E> Default for RetrierBuilder<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> RetrierBuilder<T, E> {
    /// Defaults: one retry, no delay, every failure qualifies, no hooks,
    /// re-raise on exhaustion.
    pub fn new() -> Self {
        Self {
            name: Cow::Borrowed("operation"),
            qualifies: Arc::new(|_| true),
            budget: Budget::default(),
            backoff: Backoff::default(),
            hooks: Hooks::new(),
            on_exhaustion: OnExhaustion::Raise,
        }
    }

    /// Name used in log lines (defaults to `"operation"`).
    pub fn name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    /// Predicate deciding which failures qualify for retry.
    ///
    /// Non-matching failures propagate immediately. Defaults to accepting
    /// every failure.
    pub fn retry_if<M>(mut self, qualifies: M) -> Self
    where
        M: Fn(&E) -> bool + Send + Sync + 'static,
    {
        self.qualifies = Arc::new(qualifies);
        self
    }

    /// Allows up to `n` retries (`n + 1` attempts in total).
    pub fn retries(mut self, n: u32) -> Self {
        self.budget = Budget::Limited(n);
        self
    }

    /// Retries without bound until the operation succeeds.
    pub fn unbounded(mut self) -> Self {
        self.budget = Budget::Unlimited;
        self
    }

    /// Sets the attempt budget directly.
    pub fn budget(mut self, budget: Budget) -> Self {
        self.budget = budget;
        self
    }

    /// Sets the delay strategy.
    pub fn backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    /// Sets the failure-hook registry.
    pub fn hooks(mut self, hooks: Hooks<E>) -> Self {
        self.hooks = hooks;
        self
    }

    /// Sets the disposition applied once the budget is spent.
    pub fn on_exhaustion(mut self, on_exhaustion: OnExhaustion<T, E>) -> Self {
        self.on_exhaustion = on_exhaustion;
        self
    }

    /// Validates the configuration and produces the retrier.
    pub fn build(self) -> Result<Retrier<T, E>, ConfigError> {
        self.backoff.validate()?;
        Ok(Retrier {
            name: self.name,
            qualifies: self.qualifies,
            budget: self.budget,
            backoff: self.backoff,
            hooks: self.hooks,
            on_exhaustion: self.on_exhaustion,
        })
    }
}
