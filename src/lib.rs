//! # retrier
//!
//! **Retrier** wraps a fallible operation so that qualifying failures are
//! retried automatically according to a configurable policy: attempt budget,
//! delay strategy (constant or exponential, optionally jittered and capped),
//! per-failure-category side-effect hooks, and a final disposition once the
//! budget is spent.
//!
//! ## Architecture
//! ```text
//! RetrierBuilder ──validate──► Retrier / AsyncRetrier (immutable policy)
//!                                   │  shared read-only by any number of
//!                                   │  concurrent invocations (clone freely)
//!                                   ▼
//!                            execute(operation)
//!
//! loop {
//!   ├─► invoke operation
//!   │     ├─ Ok(value)           ─► return value
//!   │     ├─ non-qualifying Err  ─► RetryError::Rejected (hard boundary:
//!   │     │                         no hooks, no backoff, no exhaustion)
//!   │     └─ qualifying Err:
//!   │          ├─► Hooks: registration-order scan, is-a matching,
//!   │          │          RunOnLastAttempt / BreakOut options
//!   │          ├─► log::warn!(attempt, failure)
//!   │          ├─► budget spent? ─► OnExhaustion:
//!   │          │        Raise          ─► RetryError::Exhausted(failure)
//!   │          │        return_failure ─► failure handed back as the value
//!   │          │        fallback(f)    ─► f(failure) as the value
//!   │          └─► Backoff: base [* 2^(n-1)] [+ jitter] [capped], sleep
//!   └─ (async form: the sleep is cancellable ─► RetryError::Canceled)
//! }
//! ```
//!
//! ## Features
//! | Area           | Description                                              | Key types                                   |
//! |----------------|----------------------------------------------------------|---------------------------------------------|
//! | **Policies**   | Budget, delay growth, jitter, exhaustion disposition.    | [`Budget`], [`Backoff`], [`Jitter`], [`OnExhaustion`] |
//! | **Hooks**      | Ordered per-failure-category side effects.               | [`Hooks`], [`AsyncHooks`], [`HookOpts`]     |
//! | **Engines**    | Blocking and suspending attempt loops.                   | [`Retrier`], [`AsyncRetrier`]               |
//! | **Errors**     | Build-time config errors, typed terminal outcomes.       | [`ConfigError`], [`RetryError`]             |
//!
//! Logging goes through the [`log`] facade: one warning per caught qualifying
//! failure, one error on exhaustion. The engine never depends on a specific
//! logging backend.
//!
//! ## Example
//! ```
//! use std::time::Duration;
//! use retrier::{Backoff, Jitter, Retrier};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let retrier: Retrier<String, std::io::Error> = Retrier::builder()
//!     .name("read-marker")
//!     .retries(4)
//!     .retry_if(|e: &std::io::Error| e.kind() == std::io::ErrorKind::NotFound)
//!     .backoff(
//!         Backoff::exponential(Duration::from_millis(50))
//!             .with_jitter(Jitter::Uniform(Duration::from_millis(10)))
//!             .with_max(Duration::from_secs(1)),
//!     )
//!     .build()?;
//!
//! let mut attempts = 0;
//! let contents = retrier.execute(|| {
//!     attempts += 1;
//!     if attempts < 3 {
//!         Err(std::io::Error::new(std::io::ErrorKind::NotFound, "marker missing"))
//!     } else {
//!         Ok("ready".to_string())
//!     }
//! })?;
//! assert_eq!(contents, "ready");
//! # Ok(())
//! # }
//! ```
//!
//! Deciding *which* operations are safe to retry stays with the caller; the
//! engine has no circuit breaking, no per-attempt timeout (wrap the whole
//! invocation if you need one), and no retry state that outlives a call.

mod error;
mod hooks;
mod policies;
mod retry;

// ---- Public re-exports ----

pub use error::{ConfigError, RetryError};
pub use hooks::{async_hook, hook, AsyncHookFn, AsyncHooks, HookFn, HookOpts, Hooks, Matcher, Registry};
pub use policies::{Backoff, Budget, Jitter, OnExhaustion, RecoverFn};
pub use retry::{AsyncRetrier, AsyncRetrierBuilder, Retrier, RetrierBuilder};
