//! # Suspending (async) retrier.
//!
//! [`AsyncRetrier`] drives the same state machine as the blocking form, but
//! the delay between attempts yields to the tokio scheduler instead of
//! occupying a thread, and the wait can be aborted through a
//! [`CancellationToken`].
//!
//! The engine introduces no parallelism of its own: within one invocation,
//! attempts, hook dispatch, and delays run strictly sequentially. The only
//! suspension points are the inter-attempt delay and whatever the wrapped
//! operation awaits itself.
//!
//! ## Example
//! ```
//! use retrier::AsyncRetrier;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let retrier: AsyncRetrier<u32, String> = AsyncRetrier::builder()
//!     .name("probe")
//!     .retries(2)
//!     .build()?;
//!
//! let mut failures_left = 1;
//! let value = retrier
//!     .execute(|| {
//!         let fail = failures_left > 0;
//!         failures_left -= 1;
//!         async move {
//!             if fail {
//!                 Err("not ready".to_string())
//!             } else {
//!                 Ok(41)
//!             }
//!         }
//!     })
//!     .await?;
//! assert_eq!(value, 41);
//! # Ok(())
//! # }
//! ```

use std::borrow::Cow;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use tokio::{select, time};
use tokio_util::sync::CancellationToken;

use crate::error::{ConfigError, RetryError};
use crate::hooks::{AsyncHooks, Matcher};
use crate::policies::{Backoff, Budget, OnExhaustion};

/// Suspending retry policy plus engine.
///
/// Immutable once built; clone it to share one policy across any number of
/// concurrent invocations.
pub struct AsyncRetrier<T, E> {
    name: Cow<'static, str>,
    qualifies: Matcher<E>,
    budget: Budget,
    backoff: Backoff,
    hooks: AsyncHooks<E>,
    on_exhaustion: OnExhaustion<T, E>,
}

impl<T, E> Clone for AsyncRetrier<T, E> {
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

impl<T, E> AsyncRetrier<T, E> {
    /// Starts building a policy; [`AsyncRetrierBuilder::build`] validates it.
    pub fn builder() -> AsyncRetrierBuilder<T, E> {
        AsyncRetrierBuilder::new()
    }

    /// The name used in log lines.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<T, E: Display> AsyncRetrier<T, E> {
    /// Invokes `op` until it succeeds, fails terminally, or the budget is
    /// spent. Not cancellable; see [`execute_cancellable`](Self::execute_cancellable).
    pub async fn execute<F, Fut>(&self, op: F) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.execute_cancellable(&CancellationToken::new(), op).await
    }

    /// Like [`execute`](Self::execute), aborting as soon as `cancel` fires
    /// during a wait.
    ///
    /// Cancellation is not exhaustion: the loop returns
    /// [`RetryError::Canceled`] immediately, without consulting the
    /// exhaustion disposition. A token canceled up front stops the loop
    /// before the first attempt. Cancellation is observed between attempts
    /// and during waits; a running attempt is never interrupted mid-flight.
    pub async fn execute_cancellable<F, Fut>(
        &self,
        cancel: &CancellationToken,
        mut op: F,
    ) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut failures: u64 = 0;
        loop {
            if cancel.is_cancelled() {
                return Err(RetryError::Canceled);
            }
            match op().await {
                Ok(value) => return Ok(value),
                Err(failure) => {
                    if !(self.qualifies)(&failure) {
                        return Err(RetryError::Rejected(failure));
                    }

                    let last = self.budget.is_last_attempt(failures);
                    self.hooks.dispatch(&failure, last).await;

                    failures += 1;
                    log::warn!("{}: attempt {} failed: {}", self.name, failures, failure);

                    if self.budget.is_spent(failures) {
                        log::error!("{}: exceeded {} attempts", self.name, failures);
                        return self.on_exhaustion.resolve(failure);
                    }

                    let delay = self.backoff.delay(failures);
                    if delay > Duration::ZERO {
                        let sleep = time::sleep(delay);
                        tokio::pin!(sleep);
                        select! {
                            _ = &mut sleep => {}
                            _ = cancel.cancelled() => return Err(RetryError::Canceled),
                        }
                    }
                }
            }
        }
    }
}

impl<T, E> AsyncRetrier<T, E>
where
    T: Send + 'static,
    E: Display + Send + Sync + 'static,
{
    /// Wraps `op` into an async callable of the same shape, retried per this
    /// policy.
    ///
    /// `A` is the operation's argument bundle (use a tuple for several
    /// arguments); it must be `Clone` so later attempts can re-invoke the
    /// operation with the original arguments.
    pub fn wrap<A, F, Fut>(
        self,
        op: F,
    ) -> impl Fn(A) -> BoxFuture<'static, Result<T, RetryError<E>>>
    where
        A: Clone + Send + 'static,
        F: Fn(A) -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let this = Arc::new(self);
        move |args: A| -> BoxFuture<'static, Result<T, RetryError<E>>> {
            let this = Arc::clone(&this);
            let op = op.clone();
            Box::pin(async move { this.execute(move || op(args.clone())).await })
        }
    }
}

/// Builder for [`AsyncRetrier`]; `build` runs the configuration validator.
pub struct AsyncRetrierBuilder<T, E> {
    name: Cow<'static, str>,
    qualifies: Matcher<E>,
    budget: Budget,
    backoff: Backoff,
    hooks: AsyncHooks<E>,
    on_exhaustion: OnExhaustion<T, E>,
}

impl<T, E> Default for AsyncRetrierBuilder<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> AsyncRetrierBuilder<T, E> {
    /// Defaults: one retry, no delay, every failure qualifies, no hooks,
    /// re-raise on exhaustion.
    pub fn new() -> Self {
        Self {
            name: Cow::Borrowed("operation"),
            qualifies: Arc::new(|_| true),
            budget: Budget::default(),
            backoff: Backoff::default(),
            hooks: AsyncHooks::new(),
            on_exhaustion: OnExhaustion::Raise,
        }
    }

    /// Name used in log lines (defaults to `"operation"`).
    pub fn name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    /// Predicate deciding which failures qualify for retry.
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

    /// Sets the failure-hook registry (suspending hooks only).
    pub fn hooks(mut self, hooks: AsyncHooks<E>) -> Self {
        self.hooks = hooks;
        self
    }

    /// Sets the disposition applied once the budget is spent.
    pub fn on_exhaustion(mut self, on_exhaustion: OnExhaustion<T, E>) -> Self {
        self.on_exhaustion = on_exhaustion;
        self
    }

    /// Validates the configuration and produces the retrier.
    pub fn build(self) -> Result<AsyncRetrier<T, E>, ConfigError> {
        self.backoff.validate()?;
        Ok(AsyncRetrier {
            name: self.name,
            qualifies: self.qualifies,
            budget: self.budget,
            backoff: self.backoff,
            hooks: self.hooks,
            on_exhaustion: self.on_exhaustion,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::{async_hook, HookOpts};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn succeeds_after_transient_failures() {
        let retrier: AsyncRetrier<u32, String> =
            AsyncRetrier::builder().retries(5).build().unwrap();
        let calls = AtomicUsize::new(0);
        let out = retrier
            .execute(|| {
                let n = calls.fetch_add(1, Ordering::Relaxed) + 1;
                async move {
                    if n <= 2 {
                        Err(format!("try {n}"))
                    } else {
                        Ok(99)
                    }
                }
            })
            .await;
        assert_eq!(out.unwrap(), 99);
        assert_eq!(calls.load(Ordering::Relaxed), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn exponential_waits_sum_exactly() {
        let retrier: AsyncRetrier<(), String> = AsyncRetrier::builder()
            .retries(3)
            .backoff(Backoff::exponential(Duration::from_millis(100)))
            .build()
            .unwrap();

        let started = time::Instant::now();
        let out = retrier
            .execute(|| async { Err::<(), _>("boom".to_string()) })
            .await;

        // Waits of 100 + 200 + 400 ms between the four attempts; the paused
        // clock advances by exactly the slept amount.
        assert_eq!(started.elapsed(), Duration::from_millis(700));
        assert!(matches!(out, Err(RetryError::Exhausted(_))));
    }

    #[tokio::test]
    async fn non_qualifying_failure_rejected_without_retry() {
        let retrier: AsyncRetrier<(), String> = AsyncRetrier::builder()
            .retries(5)
            .retry_if(|e: &String| e.starts_with("transient"))
            .build()
            .unwrap();
        let calls = AtomicUsize::new(0);
        let out = retrier
            .execute(|| {
                calls.fetch_add(1, Ordering::Relaxed);
                async { Err::<(), _>("permanent: bad schema".to_string()) }
            })
            .await;
        assert_eq!(calls.load(Ordering::Relaxed), 1);
        match out {
            Err(RetryError::Rejected(e)) => assert_eq!(e, "permanent: bad schema"),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn cancellation_during_wait_aborts_without_exhaustion() {
        let retrier: AsyncRetrier<(), String> = AsyncRetrier::builder()
            .retries(10)
            .backoff(Backoff::constant(Duration::from_secs(30)))
            .on_exhaustion(OnExhaustion::fallback(|_| ()))
            .build()
            .unwrap();

        let token = CancellationToken::new();
        let canceler = token.clone();
        tokio::spawn(async move {
            time::sleep(Duration::from_millis(20)).await;
            canceler.cancel();
        });

        let calls = AtomicUsize::new(0);
        let out = retrier
            .execute_cancellable(&token, || {
                calls.fetch_add(1, Ordering::Relaxed);
                async { Err::<(), _>("boom".to_string()) }
            })
            .await;

        // One attempt ran, then the 30s wait was aborted by the token. The
        // fallback disposition is never consulted.
        assert_eq!(calls.load(Ordering::Relaxed), 1);
        assert!(matches!(out, Err(RetryError::Canceled)));
    }

    #[tokio::test]
    async fn pre_canceled_token_stops_before_the_first_attempt() {
        let retrier: AsyncRetrier<(), String> =
            AsyncRetrier::builder().retries(3).build().unwrap();
        let token = CancellationToken::new();
        token.cancel();

        let calls = AtomicUsize::new(0);
        let out = retrier
            .execute_cancellable(&token, || {
                calls.fetch_add(1, Ordering::Relaxed);
                async { Err::<(), _>("boom".to_string()) }
            })
            .await;
        assert_eq!(calls.load(Ordering::Relaxed), 0);
        assert!(matches!(out, Err(RetryError::Canceled)));
    }

    #[tokio::test]
    async fn async_hooks_run_per_failure_and_skip_the_last_attempt() {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&runs);
        let retrier: AsyncRetrier<(), String> = AsyncRetrier::builder()
            .retries(2)
            .hooks(AsyncHooks::any(async_hook(move || {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::Relaxed);
                }
            })))
            .build()
            .unwrap();

        let _ = retrier
            .execute(|| async { Err::<(), _>("boom".to_string()) })
            .await;
        assert_eq!(runs.load(Ordering::Relaxed), 2);
    }

    #[tokio::test]
    async fn break_out_hook_suppresses_later_entries() {
        let later = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&later);
        let retrier: AsyncRetrier<(), String> = AsyncRetrier::builder()
            .retries(2)
            .hooks(
                AsyncHooks::new()
                    .on_with(
                        |_| true,
                        async_hook(|| async {}),
                        HookOpts::new().break_out(),
                    )
                    .on(
                        |_| true,
                        async_hook(move || {
                            let counter = Arc::clone(&counter);
                            async move {
                                counter.fetch_add(1, Ordering::Relaxed);
                            }
                        }),
                    ),
            )
            .build()
            .unwrap();

        let _ = retrier
            .execute(|| async { Err::<(), _>("boom".to_string()) })
            .await;
        assert_eq!(later.load(Ordering::Relaxed), 0);
    }

    #[tokio::test]
    async fn wrap_preserves_the_call_shape() {
        let retrier: AsyncRetrier<usize, String> =
            AsyncRetrier::builder().retries(2).build().unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let wrapped = retrier.wrap(move |(s, n): (String, usize)| {
            let call = counter.fetch_add(1, Ordering::Relaxed) + 1;
            async move {
                if call < 2 {
                    Err(format!("call {call} failed"))
                } else {
                    Ok(s.len() * n)
                }
            }
        });

        assert_eq!(wrapped(("abcd".to_string(), 2)).await.unwrap(), 8);
        assert_eq!(calls.load(Ordering::Relaxed), 2);
    }

    #[tokio::test]
    async fn return_failure_disposition_returns_the_failure_as_value() {
        let retrier: AsyncRetrier<String, String> = AsyncRetrier::builder()
            .retries(1)
            .on_exhaustion(OnExhaustion::return_failure())
            .build()
            .unwrap();
        let out = retrier
            .execute(|| async { Err::<String, _>("boom".to_string()) })
            .await;
        assert_eq!(out.unwrap(), "boom");
    }
}
