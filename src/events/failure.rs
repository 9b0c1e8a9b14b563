//! # Record of an observer that failed to take a delivery.
//!
//! A [`DeliveryFailure`] names the observer, the subject, the field and the
//! event kind of the delivery that went wrong, plus the [`ObserverError`] the
//! observer returned (or the panic it raised on a queue worker).
//!
//! Failures of immediate deliveries are collected into
//! [`SubjectError::Delivery`](crate::SubjectError::Delivery); failures of
//! deferred deliveries are broadcast on the queue's
//! [`FailureBus`](crate::FailureBus).
//!
//! ## Ordering guarantees
//! Each failure has a globally unique sequence number (`seq`) that increases
//! monotonically, so records gathered from several queues can be ordered.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use super::kind::EventKind;
use crate::error::ObserverError;

/// Global sequence counter for failure ordering.
static FAILURE_SEQ: AtomicU64 = AtomicU64::new(0);

/// A single failed delivery.
#[derive(Clone, Debug)]
pub struct DeliveryFailure {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Observer name (see [`Observer::name`](crate::Observer::name)).
    pub observer: &'static str,
    /// Subject name (see [`Engine::name`](crate::Engine::name)).
    pub subject: Arc<str>,
    /// Field being delivered, rendered with `Debug`.
    pub field: Arc<str>,
    /// Event kind being delivered.
    pub event: EventKind,
    /// What the observer reported.
    pub error: ObserverError,
}

impl DeliveryFailure {
    /// Creates a failure record with the current timestamp and next sequence number.
    pub fn new(
        observer: &'static str,
        subject: impl Into<Arc<str>>,
        field: impl Into<Arc<str>>,
        event: EventKind,
        error: ObserverError,
    ) -> Self {
        Self {
            seq: FAILURE_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            observer,
            subject: subject.into(),
            field: field.into(),
            event,
            error,
        }
    }

    #[inline]
    pub fn is_panic(&self) -> bool {
        matches!(self.error, ObserverError::Panicked { .. })
    }
}

impl fmt::Display for DeliveryFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "observer '{}' failed on {}.{} ({}): {}",
            self.observer, self.subject, self.field, self.event, self.error
        )
    }
}
