//! # Dispatch strategy: where observer callbacks run.
//!
//! [`Dispatch`] is chosen once per engine at construction:
//!
//! | Variant     | `notify` delivers...                                                |
//! |-------------|---------------------------------------------------------------------|
//! | `Immediate` | on the calling thread, before returning                             |
//! | `Deferred`  | by queueing one job per observer on the [`DispatchQueue`], or inline |
//! |             | when already running on that queue or forced synchronous            |
//!
//! The set of strategies is closed. Types needing a different delivery scheme
//! embed an [`Engine`](crate::Engine) and wrap its operations instead.

use super::queue::DispatchQueue;

/// Delivery strategy of an engine.
#[derive(Clone, Debug, Default)]
pub enum Dispatch {
    /// Run callbacks on the notifying thread.
    #[default]
    Immediate,
    /// Hand callbacks to an ordered execution context.
    Deferred(DispatchQueue),
}

/// Resolved decision for one `notify` call.
pub(crate) enum Route<'a> {
    Inline,
    Queued(&'a DispatchQueue),
}

impl Dispatch {
    /// The queue of a deferred strategy.
    pub fn queue(&self) -> Option<&DispatchQueue> {
        match self {
            Dispatch::Immediate => None,
            Dispatch::Deferred(queue) => Some(queue),
        }
    }

    #[inline]
    pub fn is_deferred(&self) -> bool {
        matches!(self, Dispatch::Deferred(_))
    }

    /// Decides how the current call delivers.
    ///
    /// Deferred delivery falls back to inline when `force_synchronous` is set
    /// or when the caller already runs on the designated queue.
    pub(crate) fn route(&self, force_synchronous: bool) -> Route<'_> {
        match self {
            Dispatch::Immediate => Route::Inline,
            Dispatch::Deferred(queue) if force_synchronous || queue.is_current() => Route::Inline,
            Dispatch::Deferred(queue) => Route::Queued(queue),
        }
    }
}
