//! # Subjects: observable objects.
//!
//! A subject owns an [`Engine`] and exposes the observer-facing operations.
//! There are two ways to get one:
//!
//! - **Standalone**: [`SimpleSubject`], built with [`SimpleSubject::builder`].
//!   Observers receive `&SimpleSubject<F>`.
//! - **Delegating**: any type that embeds an `Engine<F, Self>` and implements
//!   [`Subject`]. Observers receive `&Self`, so they can read the current state
//!   of the type that changed.
//!
//! ```text
//!   Account ──── impl Subject ────► engine() ──► Engine<AccountField, Account>
//!      ▲                                             │ (Weak<Account>)
//!      └──────────── on_update(field, event, &Account) ◄─┘
//! ```
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicI64, Ordering};
//! use fieldwatch::{Engine, EventKind, EventSet, ObserverError, ObserverFn, Subject, SubjectError};
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
//! enum AccountField { Balance }
//!
//! struct Account {
//!     balance: AtomicI64,
//!     events: Engine<AccountField, Account>,
//! }
//!
//! impl Subject for Account {
//!     type Field = AccountField;
//!     fn engine(&self) -> &Engine<AccountField, Account> { &self.events }
//! }
//!
//! impl Account {
//!     fn deposit(&self, amount: i64) -> Result<(), SubjectError> {
//!         self.balance.fetch_add(amount, Ordering::SeqCst);
//!         self.notify_update(AccountField::Balance)
//!     }
//! }
//!
//! let account = Arc::new_cyclic(|me| Account {
//!     balance: AtomicI64::new(0),
//!     events: Engine::immediate(me.clone()),
//! });
//!
//! let audit = ObserverFn::arc("audit", |_: AccountField, _: EventKind, a: &Account| {
//!     if a.balance.load(Ordering::SeqCst) < 0 {
//!         return Err(ObserverError::fail("overdrawn"));
//!     }
//!     Ok(())
//! });
//! account.attach(&audit, EventSet::U, &[AccountField::Balance]).unwrap();
//!
//! account.deposit(10).unwrap();
//! assert!(account.deposit(-20).is_err());
//! ```

use std::fmt;
use std::sync::Arc;

use crate::core::{Engine, SubjectBuilder, Subscription};
use crate::error::SubjectError;
use crate::events::{EventKind, EventSet};
use crate::field::Field;
use crate::observers::Observer;

/// An object whose field changes can be observed.
///
/// Implementors only provide [`engine`](Subject::engine); every other method
/// forwards to it.
pub trait Subject: Sized + Send + Sync + 'static {
    /// Identifiers of the observable fields.
    type Field: Field;

    /// The engine that stores subscriptions and delivers notifications.
    fn engine(&self) -> &Engine<Self::Field, Self>;

    /// Stable display identifier (configured name, or the short type name).
    fn name(&self) -> &str {
        self.engine().name()
    }

    /// Subscribes `observer` to `events` on `fields`.
    ///
    /// See [`Engine::attach`] for replay and error semantics.
    fn attach<O>(&self, observer: &Arc<O>, events: EventSet, fields: &[Self::Field]) -> Result<(), SubjectError>
    where
        O: Observer<Self::Field, Self>,
    {
        self.engine().attach(observer, events, fields)
    }

    /// Subscribes `observer` to every event kind ([`EventSet::CRUD`]) on `fields`.
    fn attach_crud<O>(&self, observer: &Arc<O>, fields: &[Self::Field]) -> Result<(), SubjectError>
    where
        O: Observer<Self::Field, Self>,
    {
        self.attach(observer, EventSet::CRUD, fields)
    }

    /// Ends the subscription of `observer`; `false` if it had none.
    fn detach<O: ?Sized>(&self, observer: &Arc<O>) -> bool {
        self.engine().detach(observer)
    }

    /// Ends every subscription (idempotent).
    fn detach_all(&self) {
        self.engine().detach_all()
    }

    /// Notifies observers subscribed to both `field` and `event`.
    fn notify(&self, field: Self::Field, event: EventKind) -> Result<(), SubjectError> {
        self.engine().notify(field, event)
    }

    /// Shorthand for `notify(field, EventKind::Update)`.
    fn notify_update(&self, field: Self::Field) -> Result<(), SubjectError> {
        self.engine().notify_update(field)
    }
}

/// Ready-made standalone subject.
pub struct SimpleSubject<F: Field> {
    engine: Engine<F, SimpleSubject<F>>,
}

impl<F: Field> SimpleSubject<F> {
    /// Starts building a subject (immediate dispatch by default).
    pub fn builder() -> SubjectBuilder<F> {
        SubjectBuilder::new()
    }

    pub(crate) fn with_engine(engine: Engine<F, SimpleSubject<F>>) -> Self {
        Self { engine }
    }

    /// True when `notify` delivers before returning.
    pub fn is_synchronous(&self) -> bool {
        self.engine.is_synchronous()
    }

    /// See [`Engine::set_synchronous`].
    pub fn set_synchronous(&self, synchronous: bool) {
        self.engine.set_synchronous(synchronous)
    }

    /// Current subscription of `observer`, if attached.
    pub fn subscription<O: ?Sized>(&self, observer: &Arc<O>) -> Option<Subscription<F>> {
        self.engine.subscription(observer)
    }

    /// Number of attached observers.
    pub fn len(&self) -> usize {
        self.engine.len()
    }

    /// True when nothing is attached.
    pub fn is_empty(&self) -> bool {
        self.engine.is_empty()
    }
}

impl<F: Field> Subject for SimpleSubject<F> {
    type Field = F;

    fn engine(&self) -> &Engine<F, Self> {
        &self.engine
    }
}

impl<F: Field> fmt::Debug for SimpleSubject<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimpleSubject").field("engine", &self.engine).finish()
    }
}
