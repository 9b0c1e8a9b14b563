//! # Subject and queue configuration.
//!
//! Provides [`SubjectConfig`] (per-engine settings) and [`QueueConfig`]
//! (settings for a [`DispatchQueue`](crate::DispatchQueue)).
//!
//! Config is used in two ways:
//! 1. **Engine creation**: `Engine::new(target, config, dispatch)`
//! 2. **Builder**: `SimpleSubject::builder().with_config(config)`
//!
//! ## Sentinel values
//! - `name = None` → the short type name of the subject type is used
//! - `failure_capacity = 0` → clamped to 1

/// Per-engine configuration.
///
/// ## Field semantics
/// - `name`: display identifier returned by `name()` (`None` = subject type name)
/// - `synchronous`: force a deferred engine to deliver on the calling thread
///
/// ## Notes
/// All fields are public for flexibility. `synchronous` has no effect on an
/// engine built with [`Dispatch::Immediate`](crate::Dispatch::Immediate), which
/// is always synchronous.
#[derive(Clone, Debug, Default)]
pub struct SubjectConfig {
    /// Stable display identifier for the subject.
    ///
    /// Observers attached to several instances of the same subject type use
    /// this to tell them apart.
    pub name: Option<String>,

    /// Deliver deferred notifications on the calling thread.
    ///
    /// Meant for tests: asynchronous delivery order relative to the test
    /// thread is otherwise unobservable in a bounded way.
    pub synchronous: bool,
}

impl SubjectConfig {
    /// Config with an explicit name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Returns the configured name, or `fallback` when none is set.
    #[inline]
    pub fn name_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.name.as_deref().unwrap_or(fallback)
    }
}

/// Configuration of a [`DispatchQueue`](crate::DispatchQueue).
///
/// ## Field semantics
/// - `name`: queue name used in logs and [`SubjectError::QueueClosed`](crate::SubjectError::QueueClosed)
/// - `failure_capacity`: ring buffer size of the failure bus (min 1)
#[derive(Clone, Debug)]
pub struct QueueConfig {
    /// Queue name.
    pub name: String,

    /// Capacity of the failure broadcast channel.
    ///
    /// Receivers lagging more than this many failures skip the oldest ones.
    pub failure_capacity: usize,
}

impl QueueConfig {
    /// Config with an explicit queue name and default capacity.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Returns the failure bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn failure_capacity_clamped(&self) -> usize {
        self.failure_capacity.max(1)
    }
}

impl Default for QueueConfig {
    /// Default configuration:
    ///
    /// - `name = "dispatch"`
    /// - `failure_capacity = 256`
    fn default() -> Self {
        Self {
            name: "dispatch".to_string(),
            failure_capacity: 256,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_fallback() {
        let cfg = SubjectConfig::default();
        assert_eq!(cfg.name_or("Model"), "Model");
        assert!(!cfg.synchronous);

        let cfg = SubjectConfig::named("left");
        assert_eq!(cfg.name_or("Model"), "left");
    }

    #[test]
    fn test_failure_capacity_clamped() {
        let mut cfg = QueueConfig::named("ui");
        assert_eq!(cfg.failure_capacity_clamped(), 256);
        cfg.failure_capacity = 0;
        assert_eq!(cfg.failure_capacity_clamped(), 1);
        assert_eq!(cfg.name, "ui");
    }
}
