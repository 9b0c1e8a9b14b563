//! # Counting observer for tests.
//!
//! [`ObserverCounter`] records how many times each `(field, event)` pair was
//! delivered. Use it in assertions to check that a subject fires the right
//! fields and events.
//!
//! When the subject under test uses deferred delivery, set it synchronous
//! (`set_synchronous(true)` or `SubjectConfig::synchronous`) or flush the
//! queue before reading counts; otherwise the counts race the test thread.
//!
//! ## Example
//! ```rust
//! use fieldwatch::{EventKind, EventSet, ObserverCounter, SimpleSubject, Subject};
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
//! enum Field { Number }
//!
//! let subject = SimpleSubject::<Field>::builder().build();
//! let counter = ObserverCounter::arc();
//!
//! subject.attach(&counter, EventSet::CRUD, &[Field::Number]).unwrap();
//! subject.notify(Field::Number, EventKind::Delete).unwrap();
//!
//! assert_eq!(counter.count(Field::Number, EventKind::Initial), 1);
//! assert_eq!(counter.count(Field::Number, EventKind::Delete), 1);
//! assert_eq!(counter.count_updates(Field::Number), 0);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use parking_lot::Mutex;

use super::observer::Observer;
use crate::error::ObserverError;
use crate::events::EventKind;
use crate::field::Field;

/// Observer that counts deliveries per `(field, event)`.
pub struct ObserverCounter<F, S> {
    counts: Mutex<HashMap<(F, EventKind), usize>>,
    _subject: PhantomData<fn(&S)>,
}

impl<F: Field, S> ObserverCounter<F, S> {
    pub fn new() -> Self {
        Self {
            counts: Mutex::new(HashMap::new()),
            _subject: PhantomData,
        }
    }

    /// Creates a counter behind an `Arc`, ready to attach.
    pub fn arc() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Number of `event` deliveries received for `field`.
    pub fn count(&self, field: F, event: EventKind) -> usize {
        self.counts.lock().get(&(field, event)).copied().unwrap_or(0)
    }

    /// Number of [`EventKind::Update`] deliveries received for `field`.
    pub fn count_updates(&self, field: F) -> usize {
        self.count(field, EventKind::Update)
    }

    /// Total deliveries across all fields and events.
    pub fn total(&self) -> usize {
        self.counts.lock().values().sum()
    }

    /// Forgets everything counted so far.
    pub fn reset(&self) {
        self.counts.lock().clear();
    }
}

impl<F: Field, S> Default for ObserverCounter<F, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Field, S> fmt::Debug for ObserverCounter<F, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverCounter")
            .field("counts", &*self.counts.lock())
            .finish()
    }
}

impl<F: Field, S: 'static> Observer<F, S> for ObserverCounter<F, S> {
    fn on_update(&self, field: F, event: EventKind, _subject: &S) -> Result<(), ObserverError> {
        *self.counts.lock().entry((field, event)).or_insert(0) += 1;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "observer_counter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Field {
        A,
        B,
    }

    #[test]
    fn test_counts_per_field_and_event() {
        let counter: ObserverCounter<Field, ()> = ObserverCounter::new();
        counter.on_update(Field::A, EventKind::Update, &()).unwrap();
        counter.on_update(Field::A, EventKind::Update, &()).unwrap();
        counter.on_update(Field::A, EventKind::Create, &()).unwrap();
        counter.on_update(Field::B, EventKind::Update, &()).unwrap();

        assert_eq!(counter.count_updates(Field::A), 2);
        assert_eq!(counter.count(Field::A, EventKind::Create), 1);
        assert_eq!(counter.count(Field::A, EventKind::Delete), 0);
        assert_eq!(counter.count_updates(Field::B), 1);
        assert_eq!(counter.total(), 4);

        counter.reset();
        assert_eq!(counter.total(), 0);
    }
}
