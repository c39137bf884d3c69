//! # Per-hook option flags.
//!
//! [`HookOpts`] modifies how the registry treats one registered hook:
//!
//! - `run_on_last_attempt` — also invoke the hook when the failure happened on
//!   the final allowed attempt (skipped there by default);
//! - `break_out` — after this hook runs, stop scanning later registry entries
//!   for the current failure.

/// Flags attached to a registered hook.
///
/// # Example
/// ```
/// use retrier::HookOpts;
///
/// let opts = HookOpts::new().run_on_last_attempt().break_out();
/// assert!(opts.run_on_last_attempt);
/// assert!(opts.break_out);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HookOpts {
    /// Invoke the hook even when no attempts remain after this failure.
    pub run_on_last_attempt: bool,
    /// Stop scanning later registry entries once this hook has run.
    pub break_out: bool,
}

impl HookOpts {
    /// No flags set.
    pub const fn new() -> Self {
        Self {
            run_on_last_attempt: false,
            break_out: false,
        }
    }

    /// Also run the hook on the final allowed attempt.
    pub const fn run_on_last_attempt(mut self) -> Self {
        self.run_on_last_attempt = true;
        self
    }

    /// Stop the registry scan after this hook runs.
    pub const fn break_out(mut self) -> Self {
        self.break_out = true;
        self
    }

    /// `true` when the hook must be skipped for this failure.
    pub(crate) fn skip(&self, last_attempt: bool) -> bool {
        last_attempt && !self.run_on_last_attempt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skipped_only_on_last_attempt_by_default() {
        let opts = HookOpts::new();
        assert!(!opts.skip(false));
        assert!(opts.skip(true));
    }

    #[test]
    fn run_on_last_attempt_disables_the_skip() {
        let opts = HookOpts::new().run_on_last_attempt();
        assert!(!opts.skip(false));
        assert!(!opts.skip(true));
    }
}
