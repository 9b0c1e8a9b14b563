//! # Core observer trait
//!
//! `Observer` is the contract between a subject and the code that reacts to its
//! changes.
//!
//! ## Contract
//! - `on_update` runs on the thread that called `notify` (immediate delivery)
//!   or on the dispatch queue worker (deferred delivery). It may call back into
//!   the subject; no engine lock is held while it runs.
//! - Returning an error does not stop delivery to other observers. The error
//!   reaches the `notify` caller (immediate) or the queue's failure bus (deferred).
//! - Subjects hold observers by weak reference: keep your own `Arc` alive for
//!   as long as you want to be notified.
//!
//! ## Example
//! ```rust
//! use fieldwatch::{EventKind, Observer, ObserverError, SimpleSubject};
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
//! enum Field { Temperature }
//!
//! struct Alarm;
//!
//! impl Observer<Field, SimpleSubject<Field>> for Alarm {
//!     fn on_update(
//!         &self,
//!         field: Field,
//!         event: EventKind,
//!         subject: &SimpleSubject<Field>,
//!     ) -> Result<(), ObserverError> {
//!         let _ = (field, event, subject);
//!         Ok(())
//!     }
//!
//!     fn name(&self) -> &'static str { "alarm" }
//! }
//! ```

use std::sync::Arc;

use crate::error::ObserverError;
use crate::events::EventKind;

/// Receiver of field changes from a subject of type `S`.
pub trait Observer<F, S>: Send + Sync + 'static {
    /// Called once per matching change.
    ///
    /// # Parameters
    /// - `field`: the field that changed
    /// - `event`: what happened to it
    /// - `subject`: the object being observed; when listening to several
    ///   instances, use its `name()` to tell them apart
    fn on_update(&self, field: F, event: EventKind, subject: &S) -> Result<(), ObserverError>;

    /// Human-readable name (for logs and failure records).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Shared handle to a type-erased observer.
pub type ObserverRef<F, S> = Arc<dyn Observer<F, S>>;
