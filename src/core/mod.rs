//! Notification core: registry, dispatch and the engine tying them together.
//!
//! The public entry point of this module is [`Engine`]; subjects embed one and
//! forward to it.
//!
//! Internal modules:
//! - [`registry`]: observer → subscription map with snapshot-then-deliver reads;
//! - [`dispatch`]: the two delivery strategies (immediate and deferred);
//! - [`queue`]: the serial execution context behind deferred delivery;
//! - [`engine`]: matching, INITIAL replay, fan-out and failure aggregation;
//! - [`builder`]: construction of [`SimpleSubject`](crate::SimpleSubject)s.

mod builder;
mod dispatch;
mod engine;
mod queue;
mod registry;

pub use builder::SubjectBuilder;
pub use dispatch::Dispatch;
pub use engine::Engine;
pub use queue::DispatchQueue;
pub use registry::Subscription;
