//! # Ordered failure-hook registry.
//!
//! [`Registry`] holds `(matcher, hook, opts)` entries in registration order.
//! When the engine catches a qualifying failure it scans the entries top to
//! bottom; every entry whose matcher says the failure *is a* member of its
//! category gets its hook invoked, subject to [`HookOpts`].
//!
//! Matchers are plain predicates over the failure value, which is how a
//! category hierarchy is expressed here: a broad matcher ("any transport
//! failure") accepts everything its sub-categories accept, so registering the
//! broad matcher first mirrors handling a superclass before a subclass.
//! Matching is strictly registration-ordered, never specificity-ordered.
//!
//! ## Shapes
//! The canonical form is always the ordered entry list; the constructors
//! cover the common shorter shapes:
//! - [`Registry::new`] — no hooks at all;
//! - [`Registry::any`] — one hook for any qualifying failure;
//! - [`Registry::any_with`] — same, with options;
//! - [`Registry::on`] / [`Registry::on_with`] — explicit matcher entries,
//!   chained in registration order.
//!
//! ## Example
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use retrier::{hook, HookOpts, Hooks};
//!
//! let seen = Arc::new(AtomicUsize::new(0));
//! let counter = Arc::clone(&seen);
//!
//! let hooks: Hooks<String> = Hooks::new()
//!     .on(|e: &String| e.starts_with("io:"), hook(move || {
//!         counter.fetch_add(1, Ordering::Relaxed);
//!     }))
//!     .on_with(|_| true, hook(|| {}), HookOpts::new().break_out());
//! assert_eq!(hooks.len(), 2);
//! ```

use std::sync::Arc;

use futures::future::BoxFuture;

use crate::hooks::opts::HookOpts;

/// Category check: does this failure belong to the entry's failure category?
pub type Matcher<E> = Arc<dyn Fn(&E) -> bool + Send + Sync>;

/// A blocking side-effect hook.
pub type HookFn = Arc<dyn Fn() + Send + Sync>;

/// A suspending side-effect hook.
pub type AsyncHookFn = Arc<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>;

/// Wraps a closure as a blocking [`HookFn`].
pub fn hook<F>(f: F) -> HookFn
where
    F: Fn() + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Wraps an async closure as an [`AsyncHookFn`].
///
/// # Example
/// ```
/// use retrier::{async_hook, AsyncHooks};
///
/// let hooks: AsyncHooks<String> = AsyncHooks::any(async_hook(|| async {
///     // alert, bump a metric, ...
/// }));
/// assert_eq!(hooks.len(), 1);
/// ```
pub fn async_hook<F, Fut>(f: F) -> AsyncHookFn
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: std::future::Future<Output = ()> + Send + 'static,
{
    Arc::new(move || {
        let fut: BoxFuture<'static, ()> = Box::pin(f());
        fut
    })
}

struct Entry<E, H> {
    matches: Matcher<E>,
    hook: H,
    opts: HookOpts,
}

impl<E, H: Clone> Clone for Entry<E, H> {
    fn clone(&self) -> Self {
        Self {
            matches: Arc::clone(&self.matches),
            hook: self.hook.clone(),
            opts: self.opts,
        }
    }
}

/// Ordered mapping from failure category to (hook, options).
///
/// `E` is the failure type the matchers inspect; `H` is the stored hook shape
/// ([`HookFn`] for the blocking engine, [`AsyncHookFn`] for the async one).
pub struct Registry<E, H> {
    entries: Vec<Entry<E, H>>,
}

/// Hooks for the blocking engine.
pub type Hooks<E> = Registry<E, HookFn>;

/// Hooks for the async engine.
pub type AsyncHooks<E> = Registry<E, AsyncHookFn>;

impl<E, H: Clone> Clone for Registry<E, H> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<E, H> Default for Registry<E, H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E, H> Registry<E, H> {
    /// An empty registry: dispatch is a no-op.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// One hook keyed to "any qualifying failure".
    pub fn any(hook: H) -> Self {
        Self::new().on(|_| true, hook)
    }

    /// One hook keyed to "any qualifying failure", with options.
    pub fn any_with(hook: H, opts: HookOpts) -> Self {
        Self::new().on_with(|_| true, hook, opts)
    }

    /// Appends an entry with default options.
    pub fn on<M>(self, matches: M, hook: H) -> Self
    where
        M: Fn(&E) -> bool + Send + Sync + 'static,
    {
        self.on_with(matches, hook, HookOpts::new())
    }

    /// Appends an entry with explicit options. Entries keep registration order.
    pub fn on_with<M>(mut self, matches: M, hook: H, opts: HookOpts) -> Self
    where
        M: Fn(&E) -> bool + Send + Sync + 'static,
    {
        self.entries.push(Entry {
            matches: Arc::new(matches),
            hook,
            opts,
        });
        self
    }

    /// Number of registered entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when no hooks are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Selects the hooks to run for `failure`, in registration order.
    ///
    /// A skipped entry (last attempt, no `run_on_last_attempt`) does not
    /// break the scan even when it carries `break_out`; only an entry that
    /// actually runs can stop it.
    pub(crate) fn selected(&self, failure: &E, last_attempt: bool) -> Vec<&H> {
        let mut picked = Vec::new();
        for entry in &self.entries {
            if !(entry.matches)(failure) {
                continue;
            }
            if entry.opts.skip(last_attempt) {
                continue;
            }
            picked.push(&entry.hook);
            if entry.opts.break_out {
                break;
            }
        }
        picked
    }
}

impl<E> Registry<E, HookFn> {
    /// Runs every selected hook for `failure`.
    pub(crate) fn dispatch(&self, failure: &E, last_attempt: bool) {
        for hook in self.selected(failure, last_attempt) {
            (hook)();
        }
    }
}

impl<E> Registry<E, AsyncHookFn> {
    /// Runs every selected hook for `failure`, awaiting each in turn.
    pub(crate) async fn dispatch(&self, failure: &E, last_attempt: bool) {
        for hook in self.selected(failure, last_attempt) {
            (hook)().await;
        }
    }
}
