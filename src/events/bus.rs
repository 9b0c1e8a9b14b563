//! # Broadcast bus for failed deferred deliveries.
//!
//! [`FailureBus`] is a thin wrapper around [`tokio::sync::broadcast`] that the
//! dispatch queue worker uses to report observers that returned an error or
//! panicked. Deferred deliveries run out-of-band, so this is the channel through
//! which their failures reach the application.
//!
//! ## Rules
//! - **Non-blocking publish**: `publish()` never blocks; it calls `broadcast::Sender::send`.
//! - **Bounded capacity**: a single ring buffer stores recent failures for all receivers.
//! - **Lag handling**: slow receivers get `RecvError::Lagged(n)` and skip `n` oldest items.
//! - **No persistence**: failures are only logged if there are no receivers at send time.

use tokio::sync::broadcast;

use super::failure::DeliveryFailure;

/// Broadcast channel for [`DeliveryFailure`]s.
///
/// Cheap to clone (internally holds an `Arc`-backed sender).
#[derive(Clone, Debug)]
pub struct FailureBus {
    tx: broadcast::Sender<DeliveryFailure>,
}

impl FailureBus {
    /// Creates a new bus with the given channel capacity (clamped to at least 1).
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel::<DeliveryFailure>(capacity.max(1));
        Self { tx }
    }

    /// Publishes a failure to all active receivers.
    ///
    /// Returns `false` when nobody is listening and the failure was dropped.
    pub fn publish(&self, failure: DeliveryFailure) -> bool {
        self.tx.send(failure).is_ok()
    }

    /// Creates a new receiver that will observe subsequent failures.
    pub fn subscribe(&self) -> broadcast::Receiver<DeliveryFailure> {
        self.tx.subscribe()
    }

    /// Number of live receivers.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ObserverError;
    use crate::events::EventKind;

    #[test]
    fn test_publish_without_receivers_is_dropped() {
        let bus = FailureBus::new(0);
        let f = DeliveryFailure::new("o", "S", "F", EventKind::Read, ObserverError::fail("x"));
        assert!(!bus.publish(f));
    }

    #[test]
    fn test_receiver_sees_published_failure() {
        let bus = FailureBus::new(4);
        let mut rx = bus.subscribe();
        assert_eq!(bus.receiver_count(), 1);

        let f = DeliveryFailure::new("o", "S", "F", EventKind::Read, ObserverError::fail("x"));
        assert!(bus.publish(f));

        let got = rx.try_recv().expect("failure delivered");
        assert_eq!(got.observer, "o");
        assert_eq!(got.event, EventKind::Read);
    }
}
