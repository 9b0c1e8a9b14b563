//! Change events: kinds, subscription groups and the failure bus.
//!
//! This module groups the event **vocabulary** observers subscribe with and the
//! **bus** used to report failed deferred deliveries.
//!
//! ## Contents
//! - [`EventKind`] the closed set of change kinds (initial/create/read/update/delete)
//! - [`EventSet`] immutable groups of kinds used as subscription filters
//! - [`FailureBus`] thin wrapper over `tokio::sync::broadcast` carrying [`DeliveryFailure`]s
//!
//! ## Quick reference
//! - **Subscription filters**: `EventSet::CRUD`, `EventSet::CUD`, `EventSet::U`, ...
//! - **Publishers of failures**: `DispatchQueue` worker (observer error or panic).
//! - **Consumers of failures**: anyone holding `DispatchQueue::subscribe_failures()`.

mod bus;
mod failure;
mod kind;
mod set;

pub use bus::FailureBus;
pub use failure::DeliveryFailure;
pub use kind::EventKind;
pub use set::EventSet;
