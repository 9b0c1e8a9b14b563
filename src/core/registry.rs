//! # Subscription registry - who listens to which fields and events.
//!
//! The registry maps observer identity to a [`Subscription`] (fields × events).
//! It is the only shared mutable structure of an engine.
//!
//! ## Architecture
//! ```text
//! Engine.attach()     ──► install(observer, subscription)   (write lock)
//! Engine.detach()     ──► remove(observer)                  (write lock)
//! Engine.detach_all() ──► clear()                           (write lock)
//! Engine.notify()     ──► snapshot_matching(field, event)   (read lock, copy out)
//!                              └─► callbacks run with no lock held
//! ```
//!
//! ## Rules
//! - Identity is the observer's allocation address (`Arc::as_ptr`).
//! - Observers are held by `Weak`; entries whose observer was dropped are
//!   skipped by snapshots and pruned afterwards.
//! - Re-installing an observer replaces its subscription (no merge) and moves
//!   it to the end of the delivery order.
//! - Snapshots return observers in install order, each at most once.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use crate::error::SubjectError;
use crate::events::{EventKind, EventSet};
use crate::field::Field;
use crate::observers::{Observer, ObserverRef};

/// The fields and event kinds one observer listens to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Subscription<F: Field> {
    fields: HashSet<F>,
    events: EventSet,
}

impl<F: Field> Subscription<F> {
    /// Validates and builds a subscription.
    ///
    /// Fails with [`SubjectError::InvalidArgument`] when `events` or `fields`
    /// is empty. Duplicate fields collapse.
    pub fn new(events: EventSet, fields: &[F]) -> Result<Self, SubjectError> {
        if fields.is_empty() {
            return Err(SubjectError::InvalidArgument {
                reason: "subscribe (attach) to 1 or more fields",
            });
        }
        if events.is_empty() {
            return Err(SubjectError::InvalidArgument {
                reason: "subscribe (attach) to at least 1 event",
            });
        }
        Ok(Self {
            fields: fields.iter().copied().collect(),
            events,
        })
    }

    /// True when both `field` and `event` are subscribed.
    #[inline]
    pub fn matches(&self, field: F, event: EventKind) -> bool {
        self.events.contains(event) && self.fields.contains(&field)
    }

    /// Subscribed event kinds.
    pub fn events(&self) -> EventSet {
        self.events
    }

    /// Subscribed fields, in no particular order.
    pub fn fields(&self) -> impl Iterator<Item = F> + '_ {
        self.fields.iter().copied()
    }

    /// True when `field` is subscribed, for any event kind.
    pub fn contains_field(&self, field: F) -> bool {
        self.fields.contains(&field)
    }
}

/// Identity of an observer (address of its shared allocation).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct ObserverKey(usize);

impl ObserverKey {
    pub(crate) fn of<T: ?Sized>(observer: &Arc<T>) -> Self {
        Self(Arc::as_ptr(observer) as *const () as usize)
    }
}

struct Entry<F: Field, S> {
    observer: Weak<dyn Observer<F, S>>,
    subscription: Subscription<F>,
    seq: u64,
}

struct Inner<F: Field, S> {
    entries: HashMap<ObserverKey, Entry<F, S>>,
    next_seq: u64,
}

/// Thread-safe observer → subscription map.
pub(crate) struct Registry<F: Field, S> {
    inner: RwLock<Inner<F, S>>,
}

impl<F: Field, S: 'static> Registry<F, S> {
    pub(crate) fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                entries: HashMap::new(),
                next_seq: 0,
            }),
        }
    }

    /// Installs or replaces the subscription of `observer`.
    ///
    /// Returns `true` if an earlier subscription was replaced. Entries of
    /// dropped observers are pruned on the way.
    pub(crate) fn install(&self, observer: &ObserverRef<F, S>, subscription: Subscription<F>) -> bool {
        let key = ObserverKey::of(observer);
        let mut inner = self.inner.write();
        Self::retain_alive(&mut inner);
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner
            .entries
            .insert(
                key,
                Entry {
                    observer: Arc::downgrade(observer),
                    subscription,
                    seq,
                },
            )
            .is_some()
    }

    /// Removes the subscription of `observer`; returns `false` if there was none.
    pub(crate) fn remove<O: ?Sized>(&self, observer: &Arc<O>) -> bool {
        self.inner
            .write()
            .entries
            .remove(&ObserverKey::of(observer))
            .is_some()
    }

    /// Removes every subscription; returns how many were removed.
    pub(crate) fn clear(&self) -> usize {
        let mut inner = self.inner.write();
        let n = inner.entries.len();
        inner.entries.clear();
        n
    }

    /// Observers whose subscription matches `field` and `event`, in install order.
    pub(crate) fn snapshot_matching(&self, field: F, event: EventKind) -> Vec<ObserverRef<F, S>> {
        let mut dead = false;
        let mut matched: Vec<(u64, ObserverRef<F, S>)> = {
            let inner = self.inner.read();
            inner
                .entries
                .values()
                .filter(|e| e.subscription.matches(field, event))
                .filter_map(|e| {
                    let strong = e.observer.upgrade();
                    dead |= strong.is_none();
                    strong.map(|o| (e.seq, o))
                })
                .collect()
        };

        if dead {
            self.prune();
        }

        matched.sort_unstable_by_key(|(seq, _)| *seq);
        matched.into_iter().map(|(_, o)| o).collect()
    }

    /// Current subscription of `observer`, if any.
    pub(crate) fn subscription<O: ?Sized>(&self, observer: &Arc<O>) -> Option<Subscription<F>> {
        self.inner
            .read()
            .entries
            .get(&ObserverKey::of(observer))
            .filter(|e| e.observer.strong_count() > 0)
            .map(|e| e.subscription.clone())
    }

    /// Number of subscriptions whose observer is still alive.
    pub(crate) fn len(&self) -> usize {
        self.inner
            .read()
            .entries
            .values()
            .filter(|e| e.observer.strong_count() > 0)
            .count()
    }

    /// Drops entries whose observer no longer exists.
    fn prune(&self) {
        Self::retain_alive(&mut self.inner.write());
    }

    fn retain_alive(inner: &mut Inner<F, S>) {
        let before = inner.entries.len();
        inner.entries.retain(|_, e| e.observer.strong_count() > 0);
        let pruned = before - inner.entries.len();
        if pruned > 0 {
            tracing::trace!(pruned, "registry pruned dropped observers");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observers::ObserverCounter;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Field {
        A,
        B,
    }

    fn counter() -> ObserverRef<Field, ()> {
        Arc::new(ObserverCounter::<Field, ()>::new())
    }

    fn same(a: &ObserverRef<Field, ()>, b: &ObserverRef<Field, ()>) -> bool {
        ObserverKey::of(a) == ObserverKey::of(b)
    }

    #[test]
    fn test_subscription_rejects_empty_inputs() {
        assert!(matches!(
            Subscription::<Field>::new(EventSet::CRUD, &[]),
            Err(SubjectError::InvalidArgument { .. })
        ));
        assert!(matches!(
            Subscription::new(EventSet::EMPTY, &[Field::A]),
            Err(SubjectError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_subscription_matches_both_field_and_event() {
        let sub = Subscription::new(EventSet::U, &[Field::A, Field::A]).unwrap();
        assert!(sub.matches(Field::A, EventKind::Update));
        assert!(!sub.matches(Field::A, EventKind::Delete));
        assert!(!sub.matches(Field::B, EventKind::Update));
        assert_eq!(sub.fields().count(), 1);
        assert!(sub.contains_field(Field::A));
        assert!(!sub.contains_field(Field::B));
    }

    #[test]
    fn test_install_replaces_without_merge() {
        let reg = Registry::<Field, ()>::new();
        let obs = counter();

        assert!(!reg.install(&obs, Subscription::new(EventSet::U, &[Field::A]).unwrap()));
        assert!(reg.install(&obs, Subscription::new(EventSet::D, &[Field::B]).unwrap()));
        assert_eq!(reg.len(), 1);

        assert!(reg.snapshot_matching(Field::A, EventKind::Update).is_empty());
        assert_eq!(reg.snapshot_matching(Field::B, EventKind::Delete).len(), 1);
        assert_eq!(reg.subscription(&obs).unwrap().events(), EventSet::D);
    }

    #[test]
    fn test_snapshot_in_install_order() {
        let reg = Registry::<Field, ()>::new();
        let first = counter();
        let second = counter();
        let third = counter();
        for o in [&first, &second, &third] {
            reg.install(o, Subscription::new(EventSet::U, &[Field::A]).unwrap());
        }
        // re-attach moves `first` to the back
        reg.install(&first, Subscription::new(EventSet::U, &[Field::A]).unwrap());

        let snap = reg.snapshot_matching(Field::A, EventKind::Update);
        assert_eq!(snap.len(), 3);
        assert!(same(&snap[0], &second));
        assert!(same(&snap[1], &third));
        assert!(same(&snap[2], &first));
    }

    #[test]
    fn test_remove_and_clear() {
        let reg = Registry::<Field, ()>::new();
        let a = counter();
        let b = counter();
        reg.install(&a, Subscription::new(EventSet::CRUD, &[Field::A]).unwrap());
        reg.install(&b, Subscription::new(EventSet::CRUD, &[Field::A]).unwrap());

        assert!(reg.remove(&a));
        assert!(!reg.remove(&a));
        assert_eq!(reg.len(), 1);

        assert_eq!(reg.clear(), 1);
        assert_eq!(reg.clear(), 0);
        assert!(reg.snapshot_matching(Field::A, EventKind::Create).is_empty());
    }

    #[test]
    fn test_dropped_observer_is_skipped_and_pruned() {
        let reg = Registry::<Field, ()>::new();
        let kept = counter();
        let dropped = counter();
        reg.install(&kept, Subscription::new(EventSet::U, &[Field::A]).unwrap());
        reg.install(&dropped, Subscription::new(EventSet::U, &[Field::A]).unwrap());
        drop(dropped);

        assert_eq!(reg.len(), 1);
        let snap = reg.snapshot_matching(Field::A, EventKind::Update);
        assert_eq!(snap.len(), 1);
        assert!(same(&snap[0], &kept));
        assert_eq!(reg.inner.read().entries.len(), 1);
    }

    #[test]
    fn test_unmatched_dropped_observers_do_not_accumulate() {
        let reg = Registry::<Field, ()>::new();
        for _ in 0..1000 {
            let temp = counter();
            reg.install(&temp, Subscription::new(EventSet::D, &[Field::A]).unwrap());
        }
        // nothing ever matched Delete, so no snapshot pruned them
        assert!(reg.snapshot_matching(Field::A, EventKind::Update).is_empty());
        assert_eq!(reg.len(), 0);
        assert!(reg.inner.read().entries.len() <= 1);

        let kept = counter();
        reg.install(&kept, Subscription::new(EventSet::U, &[Field::B]).unwrap());
        assert_eq!(reg.inner.read().entries.len(), 1);
    }
}
