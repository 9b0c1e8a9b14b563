//! # Observers: user-facing change handlers.
//!
//! The [`Observer`] trait is the main **extension point** for end users.
//! A subject calls [`Observer::on_update`] for every change that matches the
//! observer's subscription.
//!
//! ```text
//!   model.set_x() ── notify(Field::X, Update) ──► Engine
//!                                                   │ snapshot_matching(X, Update)
//!              ┌────────────────────────────────────┼─────────────────────┐
//!              ▼                                    ▼                     ▼
//!        ObserverCounter                        ObserverFn           CustomObserver
//!        (test assertions)                     (closure)             (user logic)
//! ```
//!
//! Provided implementations:
//! - [`ObserverFn`] wraps a closure;
//! - [`ObserverCounter`] counts deliveries, for tests;
//! - [`LogObserver`] (enabled via the `logging` feature) records deliveries with `tracing`.

mod counter;
mod func;
#[cfg(feature = "logging")]
mod log;
mod observer;

pub use counter::ObserverCounter;
pub use func::ObserverFn;
#[cfg(feature = "logging")]
pub use log::LogObserver;
pub use observer::{Observer, ObserverRef};
