//! # Change event kinds.
//!
//! [`EventKind`] classifies what happened to an observed field. The set is
//! closed: subjects pick one of these five kinds on every notification and
//! observers filter on them through [`EventSet`](crate::EventSet).
//!
//! It is up to the subject how to interpret the kinds. Most subjects only ever
//! send [`EventKind::Update`]; the others are there for models that create,
//! expose or remove things.
//!
//! ## Example
//! ```rust
//! use fieldwatch::EventKind;
//!
//! assert_eq!(EventKind::Update.as_label(), "update");
//! assert_eq!(EventKind::ALL.len(), 5);
//! ```

use std::fmt;

/// Classification of a field change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    /// Snapshot signal sent once per field when an observer attaches.
    ///
    /// Never sent by [`notify`](crate::Engine::notify) unless the subject asks
    /// for it explicitly.
    Initial,

    /// Something was made or is new.
    Create,

    /// Something was read. Usually issued on demand, e.g. to surface API usage.
    Read,

    /// By far the most common kind, issued each time a setter changes a value.
    Update,

    /// Something was destroyed or removed.
    Delete,
}

impl EventKind {
    /// Every kind, in declaration order.
    pub const ALL: [EventKind; 5] = [
        EventKind::Initial,
        EventKind::Create,
        EventKind::Read,
        EventKind::Update,
        EventKind::Delete,
    ];

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub const fn as_label(self) -> &'static str {
        match self {
            EventKind::Initial => "initial",
            EventKind::Create => "create",
            EventKind::Read => "read",
            EventKind::Update => "update",
            EventKind::Delete => "delete",
        }
    }

    /// Bit used by [`EventSet`](crate::EventSet).
    #[inline]
    pub(crate) const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}
