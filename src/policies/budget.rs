//! # Attempt budget.
//!
//! [`Budget`] bounds how many retries an invocation gets. A bounded budget of
//! `n` retries means `n + 1` total attempts; an unbounded budget keeps
//! retrying until the operation succeeds (or, in the async form, the caller
//! cancels).

/// How many retries are allowed per invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Budget {
    /// At most `n` retries, so `n + 1` attempts in total.
    ///
    /// `Limited(0)` means a single attempt and no retries.
    Limited(u32),
    /// Retry forever; exhaustion handling is never reached.
    Unlimited,
}

impl Default for Budget {
    /// Returns `Budget::Limited(1)` — two attempts in total.
    fn default() -> Self {
        Budget::Limited(1)
    }
}

impl Budget {
    /// Total number of attempts, or `None` when unbounded.
    ///
    /// # Example
    /// ```
    /// use retrier::Budget;
    ///
    /// assert_eq!(Budget::Limited(3).attempts(), Some(4));
    /// assert_eq!(Budget::Unlimited.attempts(), None);
    /// ```
    pub fn attempts(&self) -> Option<u64> {
        match self {
            Budget::Limited(n) => Some(u64::from(*n) + 1),
            Budget::Unlimited => None,
        }
    }

    /// `true` when the attempt that just failed was the final allowed one.
    ///
    /// `failures` counts qualifying failures caught *before* the current one.
    pub(crate) fn is_last_attempt(&self, failures: u64) -> bool {
        matches!(self, Budget::Limited(n) if failures == u64::from(*n))
    }

    /// `true` once `failures` qualifying failures have consumed the budget.
    ///
    /// `failures` counts qualifying failures *including* the current one.
    pub(crate) fn is_spent(&self, failures: u64) -> bool {
        matches!(self, Budget::Limited(n) if failures > u64::from(*n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limited_budget_counts() {
        let budget = Budget::Limited(3);
        assert_eq!(budget.attempts(), Some(4));

        // Failures 0..=2 leave attempts remaining; the 4th failure spends it.
        assert!(!budget.is_spent(1));
        assert!(!budget.is_spent(3));
        assert!(budget.is_spent(4));

        // The last attempt is the one taken after 3 prior failures.
        assert!(!budget.is_last_attempt(2));
        assert!(budget.is_last_attempt(3));
    }

    #[test]
    fn zero_retries_is_single_attempt() {
        let budget = Budget::Limited(0);
        assert_eq!(budget.attempts(), Some(1));
        assert!(budget.is_last_attempt(0));
        assert!(budget.is_spent(1));
    }

    #[test]
    fn unlimited_never_spends() {
        let budget = Budget::Unlimited;
        assert_eq!(budget.attempts(), None);
        assert!(!budget.is_spent(u64::MAX));
        assert!(!budget.is_last_attempt(u64::MAX));
    }
}
