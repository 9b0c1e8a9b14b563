use std::marker::PhantomData;
use std::sync::Arc;

use super::{dispatch::Dispatch, engine::Engine, queue::DispatchQueue};
use crate::{config::SubjectConfig, field::Field, subject::SimpleSubject};

/// Builder for constructing a [`SimpleSubject`] with optional features.
pub struct SubjectBuilder<F: Field> {
    cfg: SubjectConfig,
    dispatch: Dispatch,
    _field: PhantomData<fn() -> F>,
}

impl<F: Field> SubjectBuilder<F> {
    /// Creates a new builder: immediate dispatch, default configuration.
    pub fn new() -> Self {
        Self {
            cfg: SubjectConfig::default(),
            dispatch: Dispatch::Immediate,
            _field: PhantomData,
        }
    }

    /// Replaces the whole configuration.
    pub fn with_config(mut self, cfg: SubjectConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Sets the display name returned by `name()`.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.cfg.name = Some(name.into());
        self
    }

    /// Delivers notifications through `queue` instead of the calling thread.
    ///
    /// The queue may be shared by many subjects; deliveries from all of them
    /// run in submission order.
    pub fn with_queue(mut self, queue: DispatchQueue) -> Self {
        self.dispatch = Dispatch::Deferred(queue);
        self
    }

    /// Forces inline delivery even when a queue is configured.
    pub fn synchronous(mut self, synchronous: bool) -> Self {
        self.cfg.synchronous = synchronous;
        self
    }

    /// Builds the subject.
    ///
    /// The engine's target is the subject itself, so observers receive
    /// `&SimpleSubject<F>`.
    pub fn build(self) -> Arc<SimpleSubject<F>> {
        let Self { cfg, dispatch, .. } = self;
        Arc::new_cyclic(|me| SimpleSubject::with_engine(Engine::new(me.clone(), cfg, dispatch)))
    }
}

impl<F: Field> Default for SubjectBuilder<F> {
    fn default() -> Self {
        Self::new()
    }
}
