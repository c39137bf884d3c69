//! The attempt loop in its two forms.
//!
//! Both engines drive the same state machine:
//!
//! ```text
//! loop {
//!   ├─► invoke the operation
//!   │     ├─ Ok(value)            → return Ok(value)
//!   │     ├─ Err(non-qualifying)  → return Err(Rejected) immediately
//!   │     └─ Err(qualifying):
//!   │          ├─► dispatch hooks (registration order, last-attempt aware)
//!   │          ├─► failures += 1, warn-log the attempt
//!   │          ├─► budget spent?  → error-log, resolve OnExhaustion
//!   │          ├─► delay = backoff.delay(failures)
//!   │          └─► if delay > 0: suspend(delay), then next attempt
//! }
//! ```
//!
//! - [`Retrier`] — blocking form; the delay occupies the calling thread.
//! - [`AsyncRetrier`] — suspending form; the delay yields to the tokio
//!   scheduler and can be aborted through a `CancellationToken`.
//!
//! Attempts within one invocation are strictly sequential. A retrier is an
//! immutable policy value: clone it (cheap, all shared parts are `Arc`s) and
//! run any number of concurrent invocations against the clones.

mod blocking;
mod future;

pub use blocking::{Retrier, RetrierBuilder};
pub use future::{AsyncRetrier, AsyncRetrierBuilder};
