//! Error types used by subjects and observers.
//!
//! This module defines two main error enums:
//!
//! - [`SubjectError`]: errors raised by the engine itself (`attach`, `notify`).
//! - [`ObserverError`]: errors raised by individual observer callbacks.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging/metrics.

use std::fmt::Debug;
use std::sync::Arc;

use thiserror::Error;

use crate::events::DeliveryFailure;

/// # Errors produced by a subject's engine.
#[non_exhaustive]
#[derive(Error, Debug, Clone)]
pub enum SubjectError {
    /// `attach` was called with arguments that cannot form a subscription.
    /// Nothing was changed.
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// What was wrong with the call.
        reason: &'static str,
    },

    /// One or more observers failed during immediate delivery.
    ///
    /// Every other matched observer was still delivered to.
    #[error("{} observer(s) failed: {}", .failures.len(), join_failures(.failures))]
    Delivery {
        /// One record per failed observer, in delivery order.
        failures: Vec<DeliveryFailure>,
    },

    /// The object observers should see has been dropped.
    #[error("subject dropped; nothing left to observe")]
    SubjectDropped,

    /// A deferred delivery was submitted to a queue that has been shut down.
    #[error("dispatch queue '{queue}' is closed")]
    QueueClosed {
        /// Name of the closed queue.
        queue: Arc<str>,
    },
}

fn join_failures(failures: &[DeliveryFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl SubjectError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use fieldwatch::SubjectError;
    ///
    /// let err = SubjectError::InvalidArgument { reason: "no fields" };
    /// assert_eq!(err.as_label(), "subject_invalid_argument");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            SubjectError::InvalidArgument { .. } => "subject_invalid_argument",
            SubjectError::Delivery { .. } => "subject_delivery_failed",
            SubjectError::SubjectDropped => "subject_dropped",
            SubjectError::QueueClosed { .. } => "subject_queue_closed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            SubjectError::InvalidArgument { reason } => format!("invalid argument: {reason}"),
            SubjectError::Delivery { failures } => {
                let observers: Vec<_> = failures.iter().map(|f| f.observer).collect();
                format!("delivery failed; observers={observers:?}")
            }
            SubjectError::SubjectDropped => "subject dropped".to_string(),
            SubjectError::QueueClosed { queue } => format!("queue closed: {queue}"),
        }
    }

    /// Failed deliveries carried by this error (empty for other kinds).
    pub fn failures(&self) -> &[DeliveryFailure] {
        match self {
            SubjectError::Delivery { failures } => failures,
            _ => &[],
        }
    }
}

/// # Errors produced by observer callbacks.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ObserverError {
    /// The observer received a field it has no handling for.
    #[error("field '{field}' is not observed by this code")]
    NotObserved {
        /// The field, rendered with `Debug`.
        field: String,
    },

    /// The observer failed to process the change.
    #[error("execution failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// The observer panicked; the panic was caught and delivery went on.
    #[error("observer panicked: {info}")]
    Panicked {
        /// Panic payload, if it was a string.
        info: String,
    },
}

impl ObserverError {
    /// Builds [`ObserverError::NotObserved`] for `field`.
    ///
    /// # Example
    /// ```
    /// use fieldwatch::ObserverError;
    ///
    /// #[derive(Debug)]
    /// enum Field { Sum }
    ///
    /// let err = ObserverError::not_observed(Field::Sum);
    /// assert_eq!(err.to_string(), "field 'Sum' is not observed by this code");
    /// ```
    pub fn not_observed(field: impl Debug) -> Self {
        ObserverError::NotObserved {
            field: format!("{field:?}"),
        }
    }

    /// Builds [`ObserverError::Fail`] from any displayable error.
    pub fn fail(error: impl ToString) -> Self {
        ObserverError::Fail {
            error: error.to_string(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ObserverError::NotObserved { .. } => "observer_not_observed",
            ObserverError::Fail { .. } => "observer_failed",
            ObserverError::Panicked { .. } => "observer_panicked",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ObserverError::NotObserved { field } => format!("not observed: {field}"),
            ObserverError::Fail { error } => format!("error: {error}"),
            ObserverError::Panicked { info } => format!("panic: {info}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;

    #[test]
    fn test_labels() {
        assert_eq!(SubjectError::SubjectDropped.as_label(), "subject_dropped");
        assert_eq!(
            SubjectError::QueueClosed { queue: "ui".into() }.as_label(),
            "subject_queue_closed"
        );
        assert_eq!(ObserverError::fail("x").as_label(), "observer_failed");
        assert_eq!(
            ObserverError::Panicked { info: "x".into() }.as_label(),
            "observer_panicked"
        );
    }

    #[test]
    fn test_delivery_error_lists_failures() {
        let err = SubjectError::Delivery {
            failures: vec![
                DeliveryFailure::new("a", "S", "F", EventKind::Update, ObserverError::fail("one")),
                DeliveryFailure::new("b", "S", "F", EventKind::Update, ObserverError::fail("two")),
            ],
        };
        assert_eq!(err.failures().len(), 2);
        assert_eq!(err.as_message(), r#"delivery failed; observers=["a", "b"]"#);
        assert!(err.to_string().starts_with("2 observer(s) failed"));
        assert!(SubjectError::SubjectDropped.failures().is_empty());
    }
}
