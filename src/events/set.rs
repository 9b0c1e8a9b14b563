//! # Immutable groups of event kinds.
//!
//! [`EventSet`] is the filter half of a subscription: an observer only receives
//! notifications whose [`EventKind`] is in the set it attached with.
//!
//! The named groups are `const` values. `EventSet` is `Copy` and has no
//! in-place mutators, so a group can never change once defined; [`EventSet::with`]
//! and [`EventSet::without`] build new sets instead.
//!
//! | Group  | Members                                  |
//! |--------|------------------------------------------|
//! | `I`    | Initial                                  |
//! | `C`    | Create                                   |
//! | `R`    | Read                                     |
//! | `U`    | Update                                   |
//! | `D`    | Delete                                   |
//! | `CUD`  | Initial, Create, Update, Delete          |
//! | `CRUD` | Initial, Create, Read, Update, Delete    |
//!
//! ## Example
//! ```rust
//! use fieldwatch::{EventKind, EventSet};
//!
//! let quiet = EventSet::CRUD.without(EventKind::Read);
//! assert_eq!(quiet, EventSet::CUD);
//! assert_eq!(EventSet::CRUD.len(), 5);
//! ```

use std::fmt;
use std::ops::BitOr;

use bitflags::bitflags;

use super::kind::EventKind;

bitflags! {
    /// Raw kind bits; one per [`EventKind`], in declaration order.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    struct Kinds: u8 {
        const INITIAL = EventKind::Initial.bit();
        const CREATE = EventKind::Create.bit();
        const READ = EventKind::Read.bit();
        const UPDATE = EventKind::Update.bit();
        const DELETE = EventKind::Delete.bit();
    }
}

/// Fixed set of [`EventKind`]s.
///
/// Wraps the flag bits without exposing their in-place mutators.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EventSet(Kinds);

impl EventSet {
    /// No kinds. Rejected by `attach`.
    pub const EMPTY: EventSet = EventSet(Kinds::empty());
    /// Only [`EventKind::Initial`].
    pub const I: EventSet = EventSet(Kinds::INITIAL);
    /// Only [`EventKind::Create`].
    pub const C: EventSet = EventSet(Kinds::CREATE);
    /// Only [`EventKind::Read`].
    pub const R: EventSet = EventSet(Kinds::READ);
    /// Only [`EventKind::Update`].
    pub const U: EventSet = EventSet(Kinds::UPDATE);
    /// Only [`EventKind::Delete`].
    pub const D: EventSet = EventSet(Kinds::DELETE);
    /// The most common scenario: everything except [`EventKind::Read`].
    pub const CUD: EventSet = EventSet(Kinds::all().difference(Kinds::READ));
    /// Every kind.
    pub const CRUD: EventSet = EventSet(Kinds::all());

    /// Builds a set from a slice of kinds (duplicates collapse).
    pub const fn of(kinds: &[EventKind]) -> EventSet {
        let mut set = Kinds::empty();
        let mut i = 0;
        while i < kinds.len() {
            set = set.union(Kinds::from_bits_retain(kinds[i].bit()));
            i += 1;
        }
        EventSet(set)
    }

    /// True when `kind` is a member.
    #[inline]
    pub const fn contains(self, kind: EventKind) -> bool {
        self.0.contains(Kinds::from_bits_retain(kind.bit()))
    }

    /// Number of member kinds.
    #[inline]
    pub const fn len(self) -> usize {
        self.0.bits().count_ones() as usize
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0.is_empty()
    }

    /// Returns a copy of this set that also contains `kind`.
    #[must_use]
    pub const fn with(self, kind: EventKind) -> EventSet {
        EventSet(self.0.union(Kinds::from_bits_retain(kind.bit())))
    }

    /// Returns a copy of this set without `kind`.
    #[must_use]
    pub const fn without(self, kind: EventKind) -> EventSet {
        EventSet(self.0.difference(Kinds::from_bits_retain(kind.bit())))
    }

    /// Iterates members in declaration order of [`EventKind`].
    pub fn iter(self) -> impl Iterator<Item = EventKind> {
        EventKind::ALL.into_iter().filter(move |k| self.contains(*k))
    }
}

impl From<EventKind> for EventSet {
    fn from(kind: EventKind) -> Self {
        EventSet::EMPTY.with(kind)
    }
}

impl FromIterator<EventKind> for EventSet {
    fn from_iter<T: IntoIterator<Item = EventKind>>(iter: T) -> Self {
        iter.into_iter().fold(EventSet::EMPTY, EventSet::with)
    }
}

impl BitOr for EventSet {
    type Output = EventSet;

    fn bitor(self, rhs: EventSet) -> EventSet {
        EventSet(self.0 | rhs.0)
    }
}

impl BitOr<EventKind> for EventSet {
    type Output = EventSet;

    fn bitor(self, rhs: EventKind) -> EventSet {
        self.with(rhs)
    }
}

impl fmt::Debug for EventSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cud() {
        assert_eq!(EventSet::CUD.len(), 4);
        assert!(EventSet::CUD.contains(EventKind::Initial));
        assert!(EventSet::CUD.contains(EventKind::Create));
        assert!(EventSet::CUD.contains(EventKind::Update));
        assert!(EventSet::CUD.contains(EventKind::Delete));
        assert!(!EventSet::CUD.contains(EventKind::Read));
    }

    #[test]
    fn test_crud() {
        assert_eq!(EventSet::CRUD.len(), 5);
        for kind in EventKind::ALL {
            assert!(EventSet::CRUD.contains(kind), "CRUD should contain {kind}");
        }
    }

    #[test]
    fn test_single_groups() {
        let singles = [
            (EventSet::I, EventKind::Initial),
            (EventSet::C, EventKind::Create),
            (EventSet::R, EventKind::Read),
            (EventSet::U, EventKind::Update),
            (EventSet::D, EventKind::Delete),
        ];
        for (set, kind) in singles {
            assert_eq!(set.len(), 1, "{kind} group length");
            assert!(set.contains(kind), "group should contain {kind}");
        }
    }

    #[test]
    fn test_without_leaves_group_untouched() {
        let reduced = EventSet::CRUD.without(EventKind::Read);
        assert_eq!(reduced.len(), 4);
        assert_eq!(EventSet::CRUD.len(), 5);
        assert!(EventSet::CRUD.contains(EventKind::Read));

        let grown = EventSet::C.with(EventKind::Delete);
        assert_eq!(grown.len(), 2);
        assert_eq!(EventSet::C.len(), 1);
    }

    #[test]
    fn test_collect_and_bitor() {
        let collected: EventSet = [EventKind::Create, EventKind::Create, EventKind::Update]
            .into_iter()
            .collect();
        assert_eq!(collected, EventSet::C | EventSet::U);
        assert_eq!(EventSet::EMPTY | EventKind::Read, EventSet::R);
        assert!(EventSet::EMPTY.is_empty());
    }

    #[test]
    fn test_of_matches_named_groups() {
        assert_eq!(
            EventSet::of(&[EventKind::Delete, EventKind::Create, EventKind::Update, EventKind::Initial]),
            EventSet::CUD
        );
        assert_eq!(EventSet::of(&EventKind::ALL), EventSet::CRUD);
        assert_eq!(EventSet::of(&[EventKind::Read, EventKind::Read]), EventSet::R);
        assert!(EventSet::of(&[]).is_empty());
    }

    #[test]
    fn test_iter_order() {
        let kinds: Vec<_> = EventSet::CUD.iter().collect();
        assert_eq!(
            kinds,
            vec![
                EventKind::Initial,
                EventKind::Create,
                EventKind::Update,
                EventKind::Delete
            ]
        );
    }
}
