//! Per-failure-type side-effect hooks.
//!
//! A retrier can run caller-supplied hooks when it catches a qualifying
//! failure, before computing the backoff delay. Hooks exist purely for side
//! effects (logging, alerting, metrics); their return values are discarded.
//!
//! ## Contents
//! - [`Registry`] ordered mapping from failure matcher to (hook, options)
//! - [`HookOpts`] per-entry flags (`run_on_last_attempt`, `break_out`)
//! - [`hook`] / [`async_hook`] helpers turning closures into stored hooks
//!
//! The blocking and async engines use the same registry shape with different
//! hook payloads ([`Hooks`] vs [`AsyncHooks`]), so a blocking hook can never
//! be attached to an async retrier or vice versa — the mode mismatch the
//! engine forbids is a compile error here, not a runtime check.

mod opts;
mod registry;

pub use opts::HookOpts;
pub use registry::{async_hook, hook, AsyncHookFn, AsyncHooks, HookFn, Hooks, Matcher, Registry};
