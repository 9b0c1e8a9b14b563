//! # Observable field identifiers.
//!
//! A subject type names the attributes it can report changes for with a small
//! `enum`; that enum is its [`Field`] type. Because the engine is generic over
//! the field type, notifying or subscribing with a field that belongs to a
//! different subject is a compile error.
//!
//! ```rust
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
//! enum AccountField {
//!     Owner,
//!     Balance,
//! }
//!
//! fn assert_field<F: fieldwatch::Field>() {}
//! assert_field::<AccountField>();
//! ```

use std::fmt::Debug;
use std::hash::Hash;

/// Identifier of one observable attribute of a subject.
///
/// Blanket-implemented for every `Copy + Eq + Hash + Debug + Send + Sync + 'static`
/// type; fieldless enums are the intended use.
pub trait Field: Copy + Eq + Hash + Debug + Send + Sync + 'static {}

impl<T> Field for T where T: Copy + Eq + Hash + Debug + Send + Sync + 'static {}
