//! # Closure-backed observer (`ObserverFn`)
//!
//! [`ObserverFn`] wraps a closure `Fn(F, EventKind, &S) -> Result<(), ObserverError>`.
//! Captured state must be `Send + Sync`; use `Arc<...>` or atomics when the
//! closure needs to mutate something.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use fieldwatch::{EventKind, EventSet, ObserverFn, SimpleSubject, Subject};
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
//! enum Field { Level }
//!
//! let subject = SimpleSubject::<Field>::builder().build();
//! let hits = Arc::new(AtomicUsize::new(0));
//! let seen = Arc::clone(&hits);
//!
//! let observer = ObserverFn::arc(
//!     "level-watch",
//!     move |_: Field, _: EventKind, _: &SimpleSubject<Field>| {
//!         seen.fetch_add(1, Ordering::SeqCst);
//!         Ok(())
//!     },
//! );
//!
//! subject.attach(&observer, EventSet::U, &[Field::Level]).unwrap();
//! subject.notify_update(Field::Level).unwrap();
//! assert_eq!(hits.load(Ordering::SeqCst), 1);
//! ```

use std::fmt;
use std::sync::Arc;

use super::observer::Observer;
use crate::error::ObserverError;
use crate::events::EventKind;

/// Function-backed observer implementation.
pub struct ObserverFn<C> {
    name: &'static str,
    f: C,
}

impl<C> ObserverFn<C> {
    /// Creates a new function-backed observer.
    ///
    /// Prefer [`ObserverFn::arc`] when you immediately attach it.
    pub fn new(name: &'static str, f: C) -> Self {
        Self { name, f }
    }

    /// Creates the observer and returns it behind an `Arc`.
    pub fn arc(name: &'static str, f: C) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

impl<C> fmt::Debug for ObserverFn<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverFn").field("name", &self.name).finish()
    }
}

impl<F, S, C> Observer<F, S> for ObserverFn<C>
where
    C: Fn(F, EventKind, &S) -> Result<(), ObserverError> + Send + Sync + 'static,
{
    fn on_update(&self, field: F, event: EventKind, subject: &S) -> Result<(), ObserverError> {
        (self.f)(field, event, subject)
    }

    fn name(&self) -> &'static str {
        self.name
    }
}
