//! # Example: delegate
//!
//! Demonstrates a type that delegates its observer plumbing to an [`Engine`].
//!
//! Shows how to:
//! - Embed an [`Engine`] and implement [`Subject`] with `Arc::new_cyclic`.
//! - Deliver through a [`DispatchQueue`] and read failures from its bus.
//! - Attach the built-in [`LogObserver`] alongside a custom observer.
//!
//! ## Flow
//! ```text
//! Thermostat::set_target()
//!     └─► notify_update(Target) ──► Engine ──► DispatchQueue (worker)
//!                                                ├─► LogObserver.on_update()
//!                                                └─► Limits.on_update() ─ Err ─► FailureBus
//! ```
//!
//! ## Run
//! Requires the `logging` feature to export [`LogObserver`].
//! ```bash
//! RUST_LOG=debug cargo run --example delegate --features logging
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};

use fieldwatch::{
    Dispatch, DispatchQueue, Engine, EventKind, EventSet, LogObserver, Observer, ObserverError,
    QueueConfig, Subject, SubjectConfig, SubjectError,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum ThermostatField {
    Target,
    Current,
}

struct Thermostat {
    target: AtomicI32,
    current: AtomicI32,
    events: Engine<ThermostatField, Thermostat>,
}

impl Subject for Thermostat {
    type Field = ThermostatField;

    fn engine(&self) -> &Engine<ThermostatField, Thermostat> {
        &self.events
    }
}

impl Thermostat {
    fn new(name: &str, queue: DispatchQueue) -> Arc<Self> {
        Arc::new_cyclic(|me| Thermostat {
            target: AtomicI32::new(20),
            current: AtomicI32::new(18),
            events: Engine::new(me.clone(), SubjectConfig::named(name), Dispatch::Deferred(queue)),
        })
    }

    fn set_target(&self, celsius: i32) -> Result<(), SubjectError> {
        self.target.store(celsius, Ordering::SeqCst);
        self.notify_update(ThermostatField::Target)
    }

    fn measure(&self, celsius: i32) -> Result<(), SubjectError> {
        self.current.store(celsius, Ordering::SeqCst);
        self.notify_update(ThermostatField::Current)
    }
}

/// Rejects targets outside a comfortable range.
struct Limits {
    min: i32,
    max: i32,
}

impl Observer<ThermostatField, Thermostat> for Limits {
    fn on_update(&self, field: ThermostatField, event: EventKind, t: &Thermostat) -> Result<(), ObserverError> {
        if event == EventKind::Initial {
            return Ok(());
        }
        match field {
            ThermostatField::Target => {
                let target = t.target.load(Ordering::SeqCst);
                if !(self.min..=self.max).contains(&target) {
                    return Err(ObserverError::fail(format!(
                        "target {target} outside {}..={}",
                        self.min, self.max
                    )));
                }
                println!("[limits] {} target ok: {target}", t.name());
                Ok(())
            }
            other => Err(ObserverError::not_observed(other)),
        }
    }

    fn name(&self) -> &'static str {
        "limits"
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let queue = DispatchQueue::new(QueueConfig::named("ui"));
    let mut failures = queue.subscribe_failures();

    let living_room = Thermostat::new("living-room", queue.clone());
    let limits = Arc::new(Limits { min: 16, max: 26 });
    let log = Arc::new(LogObserver);

    living_room.attach(&limits, EventSet::U, &[ThermostatField::Target])?;
    living_room.attach_crud(&log, &[ThermostatField::Target, ThermostatField::Current])?;

    living_room.set_target(22)?;
    living_room.measure(21)?;
    living_room.set_target(35)?;
    queue.flush().await?;

    while let Ok(failure) = failures.try_recv() {
        println!("[failure] {failure}");
    }

    living_room.detach_all();
    queue.shutdown().await;
    Ok(())
}
