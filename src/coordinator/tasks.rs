//! Per-coordinator registry of in-flight action handlers.
//!
//! Every task spawned for a coordinator is recorded under an id and the
//! registry generation it started in. Cancelling bumps the generation and
//! aborts everything in flight, so a torn-down coordinator leaves no
//! handlers mutating state behind it.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::Notify;
use tokio::task::AbortHandle;

use super::CoordinatorError;

/// Identifies one spawned handler task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskTicket {
    pub id: u64,
    pub generation: u64,
}

struct RegistryState {
    generation: u64,
    next_id: u64,
    closed: bool,
    /// `None` while the task is being spawned.
    tasks: HashMap<u64, Option<AbortHandle>>,
}

struct Inner {
    runtime: Handle,
    state: Mutex<RegistryState>,
    idle: Notify,
}

impl Inner {
    fn finish(&self, id: u64) {
        let mut state = self.state.lock();
        if state.tasks.remove(&id).is_some() && state.tasks.is_empty() {
            self.idle.notify_waiters();
        }
    }
}

/// Cheaply cloneable handle to a coordinator's task registry.
#[derive(Clone)]
pub struct TaskRegistry {
    inner: Arc<Inner>,
}

impl TaskRegistry {
    pub fn new(runtime: Handle) -> Self {
        Self {
            inner: Arc::new(Inner {
                runtime,
                state: Mutex::new(RegistryState {
                    generation: 0,
                    next_id: 0,
                    closed: false,
                    tasks: HashMap::new(),
                }),
                idle: Notify::new(),
            }),
        }
    }

    /// Registry bound to the tokio runtime of the calling context.
    pub fn current() -> Result<Self, CoordinatorError> {
        let runtime = Handle::try_current().map_err(|_| CoordinatorError::NoRuntime)?;
        Ok(Self::new(runtime))
    }

    /// Spawn a handler task. Returns `None` once the registry is closed.
    ///
    /// The task leaves the registry when its future completes, panics or
    /// is aborted.
    pub fn spawn<F>(&self, future: F) -> Option<TaskTicket>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let (id, generation) = {
            let mut state = self.inner.state.lock();
            if state.closed {
                return None;
            }
            let id = state.next_id;
            state.next_id += 1;
            // Reserved before spawning so wait_idle sees the task at once.
            state.tasks.insert(id, None);
            (id, state.generation)
        };

        // Spawned without the lock: the guard takes it, and the runtime
        // drops the future inline when it is shutting down.
        let inner = Arc::clone(&self.inner);
        let handle = self.inner.runtime.spawn(async move {
            scopeguard::defer! {
                inner.finish(id);
            }
            future.await;
        });

        let abort = handle.abort_handle();
        let mut guard = self.inner.state.lock();
        let state = &mut *guard;
        match state.tasks.get_mut(&id) {
            Some(slot) => *slot = Some(abort),
            // Cancelled while spawning.
            None if state.generation != generation => abort.abort(),
            None => {}
        }
        drop(guard);

        tracing::trace!(task = id, generation, "Handler task spawned");
        Some(TaskTicket { id, generation })
    }

    /// Abort every in-flight task and start a new generation.
    ///
    /// Returns the number of tasks aborted.
    pub fn cancel_all(&self) -> usize {
        let (handles, generation) = {
            let mut state = self.inner.state.lock();
            state.generation += 1;
            let handles: Vec<_> = state.tasks.drain().map(|(_, handle)| handle).collect();
            (handles, state.generation)
        };
        self.inner.idle.notify_waiters();

        // Aborted outside the lock; dropping a future re-enters `finish`.
        let aborted = handles.len();
        for handle in handles.into_iter().flatten() {
            handle.abort();
        }

        if aborted > 0 {
            tracing::debug!(aborted, generation, "Cancelled in-flight handler tasks");
        }
        aborted
    }

    /// Refuse further spawns. In-flight tasks are left running.
    pub fn close(&self) {
        self.inner.state.lock().closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.inner.state.lock().closed
    }

    pub fn in_flight(&self) -> usize {
        self.inner.state.lock().tasks.len()
    }

    pub fn generation(&self) -> u64 {
        self.inner.state.lock().generation
    }

    /// Wait until no task is in flight.
    pub async fn wait_idle(&self) {
        loop {
            // Register interest before checking so a finish between the
            // check and the await is not lost.
            let notified = self.inner.idle.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            if self.in_flight() == 0 {
                return;
            }
            notified.await;
        }
    }
}

impl fmt::Debug for TaskRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("TaskRegistry")
            .field("generation", &state.generation)
            .field("in_flight", &state.tasks.len())
            .field("closed", &state.closed)
            .finish()
    }
}
