//! store::debounce
//!
//! Collapse bursts of changes into one save.
//!
//! # Architecture
//!
//! The saver owns at most one pending task. Each [`DebouncedSaver::schedule`]
//! aborts that task and spawns a new one that sleeps for the quiescence window
//! and then writes the snapshot it was given on the blocking pool. Only the
//! last snapshot of a burst reaches the store.
//!
//! # Write ordering
//!
//! Every write, debounced or direct, runs under one [`WriteGate`]. A debounced
//! write carries the generation it was scheduled in and is skipped if a later
//! schedule or cancel has moved the generation on. A write that already holds
//! the gate runs to completion, and [`DebouncedSaver::exclusive`] waits for it,
//! so a clear issued after a cancel always lands last.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::snapshot::{Persistence, SessionSnapshot};

/// Serializes writes and tracks which scheduled save is current.
#[derive(Debug, Default)]
struct WriteGate {
    generation: AtomicU64,
    write: Mutex<()>,
}

impl WriteGate {
    /// Invalidate every scheduled save. Returns the new generation.
    fn bump(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    fn run<R>(&self, write: impl FnOnce() -> R) -> R {
        let _held = self.write.lock().unwrap_or_else(PoisonError::into_inner);
        write()
    }
}

/// Debounced writer on the current tokio runtime.
#[derive(Debug)]
pub struct DebouncedSaver {
    persistence: Persistence,
    delay: Duration,
    runtime: Handle,
    gate: Arc<WriteGate>,
    pending: Option<JoinHandle<()>>,
}

impl DebouncedSaver {
    /// Saver bound to the calling tokio runtime.
    ///
    /// Returns `None` outside a runtime; callers then save synchronously.
    pub fn try_new(persistence: Persistence, delay: Duration) -> Option<Self> {
        let runtime = Handle::try_current().ok()?;
        Some(Self {
            persistence,
            delay,
            runtime,
            gate: Arc::default(),
            pending: None,
        })
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Restart the quiescence window with a newer snapshot.
    pub fn schedule(&mut self, snapshot: SessionSnapshot) {
        self.cancel();
        let generation = self.gate.bump();

        let persistence = self.persistence.clone();
        let gate = Arc::clone(&self.gate);
        let delay = self.delay;
        self.pending = Some(self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            let written = tokio::task::spawn_blocking(move || {
                gate.run(|| {
                    if !gate.is_current(generation) {
                        return Ok(false);
                    }
                    persistence.save(&snapshot).map(|()| true)
                })
            })
            .await;
            match written {
                Ok(Ok(true)) => debug!("debounced save written"),
                Ok(Ok(false)) => debug!("debounced save superseded"),
                Ok(Err(e)) => warn!(error = %e, "debounced save failed"),
                Err(e) => warn!(error = %e, "debounced save task failed"),
            }
        }));
    }

    /// Drop the pending save, if any. Returns whether one was pending.
    ///
    /// A save already writing finishes; one still waiting is skipped.
    pub fn cancel(&mut self) -> bool {
        let was_pending = self.is_pending();
        self.gate.bump();
        if let Some(task) = self.pending.take() {
            task.abort();
        }
        was_pending
    }

    /// Whether a scheduled save has not yet finished.
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Run a direct write once any in-flight debounced write has finished.
    ///
    /// Call after [`cancel`](Self::cancel) so no older snapshot can land
    /// on top of `write`.
    pub fn exclusive<R>(&self, write: impl FnOnce() -> R) -> R {
        self.gate.run(write)
    }
}

impl Drop for DebouncedSaver {
    fn drop(&mut self) {
        self.gate.bump();
        if let Some(task) = self.pending.take() {
            task.abort();
        }
    }
}
