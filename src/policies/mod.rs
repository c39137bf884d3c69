//! Retry policy pieces.
//!
//! This module groups the knobs that control **how many** attempts an
//! operation gets, **how long** to wait between them, and **what happens**
//! when the budget is spent.
//!
//! ## Contents
//! - [`Budget`] how many retries are allowed (bounded or unbounded)
//! - [`Backoff`] how delays are computed (constant / exponential + jitter + cap)
//! - [`Jitter`] randomization applied to each delay
//! - [`OnExhaustion`] final disposition once the budget is spent
//!
//! ## Quick wiring
//! ```text
//! Retrier / AsyncRetrier {
//!     budget: Budget,
//!     backoff: Backoff { base, exponential, jitter, max },
//!     on_exhaustion: OnExhaustion,
//! }
//!      └─► retry::blocking / retry::future use:
//!           - budget to decide continue/stop
//!           - backoff.delay(failures) to schedule the next attempt
//!           - on_exhaustion.resolve(failure) once the budget is spent
//! ```
//!
//! ## Defaults
//! - `Budget::Limited(1)` → two attempts in total.
//! - `Backoff::default()` → zero base delay, constant, no jitter, no cap.
//! - `OnExhaustion::Raise` → re-raise the last failure.

mod backoff;
mod budget;
mod exhaustion;
mod jitter;

pub use backoff::Backoff;
pub use budget::Budget;
pub use exhaustion::{OnExhaustion, RecoverFn};
pub use jitter::Jitter;
