//! # Logging observer for debugging and demos.
//!
//! [`LogObserver`] records every delivery as a `tracing` event at `INFO` level
//! under the `fieldwatch::observers` target.
//!
//! ## Output format (fmt subscriber)
//! ```text
//! INFO fieldwatch::observers: change subject="Account" field=Balance event=update
//! ```

use std::fmt::Debug;

use super::observer::Observer;
use crate::error::ObserverError;
use crate::events::EventKind;
use crate::subject::Subject;

/// Observer that logs every change it receives.
///
/// Enabled via the `logging` feature. Not intended for production use;
/// implement a custom [`Observer`] for structured metrics.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl<S> Observer<S::Field, S> for LogObserver
where
    S: Subject,
    S::Field: Debug,
{
    fn on_update(&self, field: S::Field, event: EventKind, subject: &S) -> Result<(), ObserverError> {
        tracing::info!(
            target: "fieldwatch::observers",
            subject = subject.name(),
            field = ?field,
            event = event.as_label(),
            "change"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
