//! # DispatchQueue: ordered execution context for deferred delivery.
//!
//! [`DispatchQueue`] is a cheaply cloneable handle to one worker task that runs
//! submitted jobs one at a time, in submission order. Deferred engines hand
//! their deliveries to it instead of running observers on the notifying thread.
//!
//! ## Architecture
//! ```text
//! notify() ─┐
//! notify() ─┼──► [unbounded mpsc] ──► worker ──► job() ──► observer.on_update()
//! execute()─┘      (FIFO)              │           ├─ Err   → FailureBus + warn!
//!                                      │           └─ panic → FailureBus + warn!
//!                                      └─ CURRENT_QUEUE = id (task-local, per job)
//! ```
//!
//! ## Rules
//! - **Non-blocking submit**: submitting never waits for the worker.
//! - **FIFO**: jobs run in the order they were submitted (single consumer).
//! - **No drops**: the channel is unbounded; a job is only refused once the
//!   queue has been shut down ([`SubjectError::QueueClosed`]).
//! - **Isolation**: a failing or panicking job is reported and the worker moves on.
//! - **Re-entrancy**: [`DispatchQueue::is_current`] is `true` while a job runs,
//!   which lets engines deliver inline instead of re-queueing.
//!
//! Observer callbacks are synchronous and run on a runtime worker thread; keep
//! them short or give the queue a multi-thread runtime.

use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use futures::FutureExt;
use parking_lot::{Mutex, RwLock};
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::config::QueueConfig;
use crate::error::{ObserverError, SubjectError};
use crate::events::{DeliveryFailure, EventKind, FailureBus};

tokio::task_local! {
    /// Id of the queue whose job is currently running on this task.
    static CURRENT_QUEUE: u64;
}

static QUEUE_IDS: AtomicU64 = AtomicU64::new(1);

/// One deferred observer delivery.
pub(crate) struct Job {
    pub(crate) observer: &'static str,
    pub(crate) subject: Arc<str>,
    pub(crate) field: Arc<str>,
    pub(crate) event: EventKind,
    pub(crate) run: Box<dyn FnOnce() -> Result<(), ObserverError> + Send + 'static>,
}

enum Message {
    Deliver(Job),
    Execute(Box<dyn FnOnce() + Send + 'static>),
    Flush(oneshot::Sender<()>),
}

struct Shared {
    id: u64,
    name: Arc<str>,
    tx: RwLock<Option<mpsc::UnboundedSender<Message>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
    failures: FailureBus,
}

/// Handle to a serial job queue backed by one tokio task.
#[derive(Clone)]
pub struct DispatchQueue {
    shared: Arc<Shared>,
}

impl DispatchQueue {
    /// Creates the queue and spawns its worker.
    ///
    /// # Panics
    /// Panics if called outside of a tokio runtime context.
    pub fn new(cfg: QueueConfig) -> Self {
        let id = QUEUE_IDS.fetch_add(1, AtomicOrdering::Relaxed);
        let name: Arc<str> = Arc::from(cfg.name.as_str());
        let failures = FailureBus::new(cfg.failure_capacity_clamped());
        let (tx, rx) = mpsc::unbounded_channel::<Message>();

        let handle = tokio::spawn(worker_loop(id, Arc::clone(&name), rx, failures.clone()));
        tracing::debug!(queue = %name, id, "dispatch queue started");

        Self {
            shared: Arc::new(Shared {
                id,
                name,
                tx: RwLock::new(Some(tx)),
                worker: Mutex::new(Some(handle)),
                failures,
            }),
        }
    }

    /// Queue name from [`QueueConfig::name`].
    pub fn name(&self) -> &str {
        &self.shared.name
    }

    /// True when called from a job running on this queue.
    pub fn is_current(&self) -> bool {
        CURRENT_QUEUE
            .try_with(|id| *id == self.shared.id)
            .unwrap_or(false)
    }

    /// Runs `f` on the queue after everything submitted before it.
    pub fn execute(&self, f: impl FnOnce() + Send + 'static) -> Result<(), SubjectError> {
        self.send(Message::Execute(Box::new(f)))
    }

    /// Resolves once every job submitted before this call has run.
    pub async fn flush(&self) -> Result<(), SubjectError> {
        let (tx, rx) = oneshot::channel();
        self.send(Message::Flush(tx))?;
        rx.await.map_err(|_| self.closed())
    }

    /// Receiver of failed deferred deliveries on this queue.
    ///
    /// Only failures published after subscribing are received.
    pub fn subscribe_failures(&self) -> broadcast::Receiver<DeliveryFailure> {
        self.shared.failures.subscribe()
    }

    /// Closes the queue, runs what is already queued, then joins the worker.
    ///
    /// Later submissions fail with [`SubjectError::QueueClosed`]. Calling it
    /// again is a no-op.
    pub async fn shutdown(&self) {
        drop(self.shared.tx.write().take());
        let handle = self.shared.worker.lock().take();
        if let Some(h) = handle {
            let _ = h.await;
            tracing::debug!(queue = %self.shared.name, "dispatch queue stopped");
        }
    }

    /// True once [`shutdown`](Self::shutdown) has been called.
    pub fn is_closed(&self) -> bool {
        self.shared.tx.read().is_none()
    }

    pub(crate) fn submit(&self, job: Job) -> Result<(), SubjectError> {
        self.send(Message::Deliver(job))
    }

    fn send(&self, msg: Message) -> Result<(), SubjectError> {
        let guard = self.shared.tx.read();
        match guard.as_ref() {
            Some(tx) if tx.send(msg).is_ok() => Ok(()),
            _ => Err(self.closed()),
        }
    }

    fn closed(&self) -> SubjectError {
        SubjectError::QueueClosed {
            queue: Arc::clone(&self.shared.name),
        }
    }
}

impl fmt::Debug for DispatchQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchQueue")
            .field("name", &self.shared.name)
            .field("id", &self.shared.id)
            .field("closed", &self.is_closed())
            .finish()
    }
}

async fn worker_loop(
    id: u64,
    name: Arc<str>,
    mut rx: mpsc::UnboundedReceiver<Message>,
    failures: FailureBus,
) {
    while let Some(msg) = rx.recv().await {
        match msg {
            Message::Deliver(job) => {
                let Job {
                    observer,
                    subject,
                    field,
                    event,
                    run,
                } = job;
                let fut = CURRENT_QUEUE.scope(id, async move { run() });
                let outcome = match AssertUnwindSafe(fut).catch_unwind().await {
                    Ok(res) => res,
                    Err(panic_err) => Err(ObserverError::Panicked {
                        info: panic_info(&*panic_err),
                    }),
                };
                if let Err(error) = outcome {
                    let failure = DeliveryFailure::new(observer, subject, field, event, error);
                    report(&failures, &name, failure);
                }
            }
            Message::Execute(f) => {
                let fut = CURRENT_QUEUE.scope(id, async move { f() });
                if let Err(panic_err) = AssertUnwindSafe(fut).catch_unwind().await {
                    tracing::warn!(
                        queue = %name,
                        info = %panic_info(&*panic_err),
                        "queued task panicked"
                    );
                }
            }
            Message::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
}

fn report(failures: &FailureBus, queue: &str, failure: DeliveryFailure) {
    tracing::warn!(
        queue,
        observer = failure.observer,
        subject = %failure.subject,
        field = %failure.field,
        event = failure.event.as_label(),
        error = %failure.error,
        "deferred delivery failed"
    );
    failures.publish(failure);
}

pub(crate) fn panic_info(any: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = any.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = any.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn job(run: impl FnOnce() -> Result<(), ObserverError> + Send + 'static) -> Job {
        Job {
            observer: "probe",
            subject: "Model".into(),
            field: "Value".into(),
            event: EventKind::Update,
            run: Box::new(run),
        }
    }

    #[tokio::test]
    async fn test_jobs_run_in_submission_order() {
        let queue = DispatchQueue::new(QueueConfig::default());
        let seen = Arc::new(Mutex::new(Vec::new()));
        for i in 0..10 {
            let seen = Arc::clone(&seen);
            queue.execute(move || seen.lock().push(i)).unwrap();
        }
        queue.flush().await.unwrap();
        assert_eq!(*seen.lock(), (0..10).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_is_current_only_inside_jobs() {
        let queue = DispatchQueue::new(QueueConfig::default());
        let other = DispatchQueue::new(QueueConfig::named("other"));
        assert!(!queue.is_current());

        let inside = Arc::new(AtomicBool::new(false));
        let inside_other = Arc::new(AtomicBool::new(true));
        {
            let (q, o) = (queue.clone(), other.clone());
            let (inside, inside_other) = (Arc::clone(&inside), Arc::clone(&inside_other));
            queue
                .execute(move || {
                    inside.store(q.is_current(), Ordering::SeqCst);
                    inside_other.store(o.is_current(), Ordering::SeqCst);
                })
                .unwrap();
        }
        queue.flush().await.unwrap();

        assert!(inside.load(Ordering::SeqCst));
        assert!(!inside_other.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_failures_are_published() {
        let queue = DispatchQueue::new(QueueConfig::default());
        let mut failures = queue.subscribe_failures();

        queue.submit(job(|| Err(ObserverError::fail("nope")))).unwrap();
        queue.submit(job(|| panic!("observer blew up"))).unwrap();
        queue.submit(job(|| Ok(()))).unwrap();
        queue.flush().await.unwrap();

        let first = failures.try_recv().unwrap();
        assert_eq!(first.observer, "probe");
        assert_eq!(first.error, ObserverError::fail("nope"));

        let second = failures.try_recv().unwrap();
        assert!(second.is_panic());
        assert_eq!(
            second.error,
            ObserverError::Panicked { info: "observer blew up".into() }
        );
        assert!(failures.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_worker_survives_panicking_task() {
        let queue = DispatchQueue::new(QueueConfig::default());
        let ran = Arc::new(AtomicBool::new(false));
        queue.execute(|| panic!("boom")).unwrap();
        {
            let ran = Arc::clone(&ran);
            queue.execute(move || ran.store(true, Ordering::SeqCst)).unwrap();
        }
        queue.flush().await.unwrap();
        assert!(ran.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_shutdown_drains_then_refuses() {
        let queue = DispatchQueue::new(QueueConfig::named("ui"));
        let seen = Arc::new(Mutex::new(0));
        for _ in 0..5 {
            let seen = Arc::clone(&seen);
            queue.execute(move || *seen.lock() += 1).unwrap();
        }

        queue.shutdown().await;
        assert_eq!(*seen.lock(), 5);
        assert!(queue.is_closed());

        let err = queue.execute(|| {}).unwrap_err();
        assert!(matches!(err, SubjectError::QueueClosed { ref queue } if &**queue == "ui"));
        assert!(queue.flush().await.is_err());

        // second shutdown is a no-op
        queue.shutdown().await;
    }
}
