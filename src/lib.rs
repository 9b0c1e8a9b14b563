//! # fieldwatch
//!
//! **Fieldwatch** is a small, strongly-typed observer library for Rust.
//!
//! A *subject* reports changes to its named fields; *observers* subscribe to a
//! subset of those fields and a subset of change kinds
//! (initial/create/read/update/delete) and are called back when a matching
//! change is notified. Delivery happens either on the notifying thread or on a
//! designated serial queue.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!  ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//!  │ SimpleSubject │   │    Account    │   │     Clock     │
//!  │ (standalone)  │   │ (impl Subject)│   │ (impl Subject)│
//!  └───────┬───────┘   └───────┬───────┘   └───────┬───────┘
//!          ▼                   ▼                   ▼
//! ┌────────────────────────────────────────────────────────────────┐
//! │  Engine<F, S>                                                  │
//! │  - Registry   (observer → fields × events, RwLock, Weak refs)  │
//! │  - Dispatch   (Immediate | Deferred(DispatchQueue))            │
//! │  - Weak<S>    (the object observers see)                       │
//! └───────┬──────────────────────────────────────────┬─────────────┘
//!         │ Immediate (caller's thread)               │ Deferred
//!         ▼                                           ▼
//!  on_update() per matched observer        ┌──────────────────────┐
//!  failures → SubjectError::Delivery       │ DispatchQueue worker │
//!                                          │ (FIFO, one at a time)│
//!                                          └──────────┬───────────┘
//!                                                     ▼
//!                                   on_update(); failures → FailureBus
//! ```
//!
//! ### Attach / notify
//! ```text
//! attach(observer, events, fields)
//!   ├─► empty events or fields       ─► InvalidArgument (no change)
//!   ├─► Initial ∈ events             ─► on_update(f, Initial) per field, caller's thread
//!   └─► install (replaces any earlier subscription of the same observer)
//!
//! notify(field, event)
//!   ├─► snapshot of observers with field ∈ fields ∧ event ∈ events
//!   ├─► synchronous ─► deliver to each, aggregate failures
//!   └─► deferred    ─► one job per observer on the queue (inline if already on it)
//! ```
//!
//! ## Features
//! | Area              | Description                                                    | Key types / traits                         |
//! |-------------------|----------------------------------------------------------------|--------------------------------------------|
//! | **Observer API**  | React to field changes of a subject.                           | [`Observer`], [`ObserverFn`]               |
//! | **Subjects**      | Ready-made subject or delegate from your own type.             | [`SimpleSubject`], [`Subject`], [`Engine`] |
//! | **Events**        | Change kinds and immutable subscription groups.                | [`EventKind`], [`EventSet`]                |
//! | **Dispatch**      | Immediate or queued delivery.                                  | [`Dispatch`], [`DispatchQueue`]            |
//! | **Errors**        | Typed errors for subjects and observer callbacks.              | [`SubjectError`], [`ObserverError`]        |
//! | **Configuration** | Names, forced synchronous delivery, queue settings.            | [`SubjectConfig`], [`QueueConfig`]         |
//! | **Testing**       | Count deliveries per field and event.                          | [`ObserverCounter`]                        |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogObserver`] _(demo/reference only)_.
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
//! subject.attach(&counter, EventSet::CRUD, &[Field::Number])?;
//! subject.notify(Field::Number, EventKind::Delete)?;
//! subject.notify_update(Field::Number)?;
//!
//! assert_eq!(counter.count(Field::Number, EventKind::Initial), 1);
//! assert_eq!(counter.count(Field::Number, EventKind::Delete), 1);
//! assert_eq!(counter.count_updates(Field::Number), 1);
//! # Ok::<(), fieldwatch::SubjectError>(())
//! ```
mod config;
mod core;
mod error;
mod events;
mod field;
mod observers;
mod subject;

// ---- Public re-exports ----

pub use config::{QueueConfig, SubjectConfig};
pub use crate::core::{Dispatch, DispatchQueue, Engine, SubjectBuilder, Subscription};
pub use error::{ObserverError, SubjectError};
pub use events::{DeliveryFailure, EventKind, EventSet, FailureBus};
pub use field::Field;
pub use observers::{Observer, ObserverCounter, ObserverFn, ObserverRef};
pub use subject::{SimpleSubject, Subject};

// Optional: expose a simple built-in logging observer (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use observers::LogObserver;
