//! # Engine: subscription registry + dispatch strategy + matching fan-out.
//!
//! An [`Engine`] is the whole notification machinery of one subject. It is
//! deliberately separate from the subject itself: a type embeds an engine,
//! hands it a weak reference to "the object observers should see", and
//! forwards its public operations to it (usually by implementing
//! [`Subject`](crate::Subject)).
//!
//! ## Flow
//! ```text
//! attach(obs, events, fields)
//!   ├─► validate (non-empty events and fields)      ─► InvalidArgument
//!   ├─► events ∋ Initial? obs.on_update(f, Initial) for each field (caller's thread)
//!   └─► registry.install(obs, subscription)         (replace, never merge)
//!
//! notify(field, event)
//!   ├─► registry.snapshot_matching(field, event)    (copy, no lock held after)
//!   └─► dispatch.route(synchronous)
//!         ├─ Inline  ─► on_update() per observer, collect failures ─► Delivery{..}
//!         └─ Queued  ─► one Job per observer ─► DispatchQueue (returns at once)
//! ```
//!
//! ## States
//! Two externally visible states: **synchronous** and **asynchronous**.
//! An immediate engine is always synchronous; a deferred one is asynchronous
//! unless [`Engine::set_synchronous`] (or [`SubjectConfig::synchronous`]) forces
//! inline delivery. The state never touches the registry.
//!
//! ## Example: delegating subject
//! ```rust
//! use std::sync::Arc;
//! use fieldwatch::{Dispatch, Engine, EventKind, EventSet, ObserverCounter, Subject, SubjectConfig};
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
//! enum Field { Time }
//!
//! struct Clock {
//!     events: Engine<Field, Clock>,
//! }
//!
//! impl Subject for Clock {
//!     type Field = Field;
//!     fn engine(&self) -> &Engine<Field, Clock> { &self.events }
//! }
//!
//! let clock = Arc::new_cyclic(|me| Clock {
//!     events: Engine::new(me.clone(), SubjectConfig::default(), Dispatch::Immediate),
//! });
//!
//! let counter = ObserverCounter::arc();
//! clock.attach(&counter, EventSet::CRUD, &[Field::Time]).unwrap();
//! clock.notify(Field::Time, EventKind::Read).unwrap();
//!
//! assert_eq!(clock.name(), "Clock");
//! assert_eq!(counter.count(Field::Time, EventKind::Initial), 1);
//! assert_eq!(counter.count(Field::Time, EventKind::Read), 1);
//! ```

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use super::dispatch::{Dispatch, Route};
use super::queue::{panic_info, DispatchQueue, Job};
use super::registry::{Registry, Subscription};
use crate::config::SubjectConfig;
use crate::error::{ObserverError, SubjectError};
use crate::events::{DeliveryFailure, EventKind, EventSet};
use crate::field::Field;
use crate::observers::{Observer, ObserverRef};

/// Notification engine for subjects of type `S` with fields `F`.
pub struct Engine<F: Field, S> {
    name: Arc<str>,
    target: Weak<S>,
    registry: Registry<F, S>,
    dispatch: Dispatch,
    synchronous: AtomicBool,
}

impl<F: Field, S: Send + Sync + 'static> Engine<F, S> {
    /// Creates an engine that presents `target` to its observers.
    ///
    /// `target` is normally obtained from [`Arc::new_cyclic`] while building
    /// the subject that embeds this engine.
    pub fn new(target: Weak<S>, config: SubjectConfig, dispatch: Dispatch) -> Self {
        let name: Arc<str> = Arc::from(config.name_or(short_type_name::<S>()));
        Self {
            name,
            target,
            registry: Registry::new(),
            dispatch,
            synchronous: AtomicBool::new(config.synchronous),
        }
    }

    /// Engine delivering on the notifying thread.
    pub fn immediate(target: Weak<S>) -> Self {
        Self::new(target, SubjectConfig::default(), Dispatch::Immediate)
    }

    /// Engine delivering through `queue`.
    pub fn deferred(target: Weak<S>, queue: DispatchQueue) -> Self {
        Self::new(target, SubjectConfig::default(), Dispatch::Deferred(queue))
    }

    /// Stable display identifier of the subject.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Delivery strategy chosen at construction.
    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    /// True when `notify` delivers before returning.
    pub fn is_synchronous(&self) -> bool {
        !self.dispatch.is_deferred() || self.synchronous.load(Ordering::Acquire)
    }

    /// Forces a deferred engine to deliver inline (`true`) or restores queued
    /// delivery (`false`). No effect on an immediate engine.
    pub fn set_synchronous(&self, synchronous: bool) {
        self.synchronous.store(synchronous, Ordering::Release);
    }

    /// Subscribes `observer` to `events` on `fields`.
    ///
    /// If `events` contains [`EventKind::Initial`], the observer first receives
    /// one `Initial` per entry of `fields` on the calling thread; only then is the
    /// subscription installed. A later `attach` of the same observer replaces
    /// its subscription.
    ///
    /// # Errors
    /// - [`SubjectError::InvalidArgument`] for empty `events` or `fields` (nothing changes)
    /// - [`SubjectError::Delivery`] if the observer fails its `Initial` replay
    ///   (the subscription is not installed)
    /// - [`SubjectError::SubjectDropped`] if a replay is needed but the subject is gone
    pub fn attach<O>(&self, observer: &Arc<O>, events: EventSet, fields: &[F]) -> Result<(), SubjectError>
    where
        O: Observer<F, S>,
    {
        let observer: ObserverRef<F, S> = observer.clone();
        self.attach_dyn(&observer, events, fields)
    }

    /// [`attach`](Self::attach) for an already type-erased observer.
    pub fn attach_dyn(
        &self,
        observer: &ObserverRef<F, S>,
        events: EventSet,
        fields: &[F],
    ) -> Result<(), SubjectError> {
        let subscription = Subscription::new(events, fields)?;

        if events.contains(EventKind::Initial) {
            let target = self.target()?;
            for &field in fields {
                tracing::trace!(
                    subject = %self.name,
                    observer = observer.name(),
                    field = ?field,
                    "sending initial"
                );
                deliver(observer, field, EventKind::Initial, &target).map_err(|error| SubjectError::Delivery {
                    failures: vec![self.failure(observer.name(), field, EventKind::Initial, error)],
                })?;
            }
        }

        let replaced = self.registry.install(observer, subscription);
        tracing::debug!(
            subject = %self.name,
            observer = observer.name(),
            events = ?events,
            fields = ?fields,
            replaced,
            "observer attached"
        );
        Ok(())
    }

    /// Ends the subscription of `observer`. Returns `false` if it had none.
    pub fn detach<O: ?Sized>(&self, observer: &Arc<O>) -> bool {
        let removed = self.registry.remove(observer);
        tracing::debug!(subject = %self.name, removed, "observer detached");
        removed
    }

    /// Ends every subscription. Safe to call any number of times.
    pub fn detach_all(&self) {
        let removed = self.registry.clear();
        tracing::debug!(subject = %self.name, removed, "all observers detached");
    }

    /// Notifies every observer subscribed to both `field` and `event`.
    ///
    /// # Errors
    /// - [`SubjectError::Delivery`] when inline delivery failed for one or more
    ///   observers; all other matched observers were still delivered to
    /// - [`SubjectError::SubjectDropped`] when delivering inline to a dropped subject
    /// - [`SubjectError::QueueClosed`] when the deferred queue has been shut down
    pub fn notify(&self, field: F, event: EventKind) -> Result<(), SubjectError> {
        let observers = self.registry.snapshot_matching(field, event);
        tracing::trace!(
            subject = %self.name,
            field = ?field,
            event = event.as_label(),
            matched = observers.len(),
            "notify"
        );
        if observers.is_empty() {
            return Ok(());
        }

        match self.dispatch.route(self.synchronous.load(Ordering::Acquire)) {
            Route::Inline => self.deliver_inline(&observers, field, event),
            Route::Queued(queue) => self.enqueue(queue, observers, field, event),
        }
    }

    /// Shorthand for `notify(field, EventKind::Update)`.
    pub fn notify_update(&self, field: F) -> Result<(), SubjectError> {
        self.notify(field, EventKind::Update)
    }

    /// Current subscription of `observer`, if attached.
    pub fn subscription<O: ?Sized>(&self, observer: &Arc<O>) -> Option<Subscription<F>> {
        self.registry.subscription(observer)
    }

    /// Number of attached (and still alive) observers.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// True when no live observer is attached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn deliver_inline(
        &self,
        observers: &[ObserverRef<F, S>],
        field: F,
        event: EventKind,
    ) -> Result<(), SubjectError> {
        let target = self.target()?;
        let failures: Vec<DeliveryFailure> = observers
            .iter()
            .filter_map(|observer| {
                tracing::trace!(observer = observer.name(), "deliver");
                deliver(observer, field, event, &target)
                    .err()
                    .map(|error| self.failure(observer.name(), field, event, error))
            })
            .collect();

        if failures.is_empty() {
            Ok(())
        } else {
            Err(SubjectError::Delivery { failures })
        }
    }

    fn enqueue(
        &self,
        queue: &DispatchQueue,
        observers: Vec<ObserverRef<F, S>>,
        field: F,
        event: EventKind,
    ) -> Result<(), SubjectError> {
        let field_label: Arc<str> = Arc::from(format!("{field:?}"));
        for observer in observers {
            let target = self.target.clone();
            let name = observer.name();
            let subject = Arc::clone(&self.name);
            let run = move || match target.upgrade() {
                Some(s) => observer.on_update(field, event, &s),
                None => {
                    tracing::debug!(subject = %subject, "subject dropped before deferred delivery");
                    Ok(())
                }
            };
            queue.submit(Job {
                observer: name,
                subject: Arc::clone(&self.name),
                field: Arc::clone(&field_label),
                event,
                run: Box::new(run),
            })?;
        }
        Ok(())
    }

    fn target(&self) -> Result<Arc<S>, SubjectError> {
        self.target.upgrade().ok_or(SubjectError::SubjectDropped)
    }

    fn failure(&self, observer: &'static str, field: F, event: EventKind, error: ObserverError) -> DeliveryFailure {
        DeliveryFailure::new(observer, Arc::clone(&self.name), format!("{field:?}"), event, error)
    }
}

impl<F: Field, S> fmt::Debug for Engine<F, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("name", &self.name)
            .field("dispatch", &self.dispatch)
            .field("synchronous", &self.synchronous.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

/// Runs one callback; a panic becomes [`ObserverError::Panicked`].
fn deliver<F: 'static, S: 'static>(observer: &ObserverRef<F, S>, field: F, event: EventKind, target: &S) -> Result<(), ObserverError> {
    panic::catch_unwind(AssertUnwindSafe(|| observer.on_update(field, event, target))).unwrap_or_else(|payload| {
        Err(ObserverError::Panicked {
            info: panic_info(&*payload),
        })
    })
}

/// `a::b::Model<c::Field>` → `Model`.
pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
