//! Fixed-size asynchronous worker pool
//!
//! A [`WorkerPool`] owns a fixed number of long-lived tokio tasks that pull
//! work from one shared, bounded FIFO queue. Every worker and every task sees
//! the same [`CancellationToken`].
//!
//! Lifecycle:
//! 1. `WorkerPool::new(n)` spawns exactly `n` workers (minimum 1)
//! 2. `submit` enqueues tasks, suspending the caller while the queue is full
//! 3. `close` cancels the token, closes the queue and waits for all workers;
//!    tasks already queued when `close` is called still run
//!
//! Tasks are fire-and-forget: the pool never reports what a task did. A task
//! that wants to surface a result must do so through its own side effects.
//!
//! Calling `close` from inside a task running on the same pool deadlocks, as
//! the closing task waits for its own worker.

mod error;
mod worker;

pub use error::{PoolError, Result};

use worker::{LiveWorker, WorkerState};

use async_channel::{Sender, TrySendError};
use futures::FutureExt;
use futures::future::BoxFuture;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Queue slots allocated by [`WorkerPool::new`]
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Boxed unit of work accepted by the pool
pub type Task = Box<dyn FnOnce(CancellationToken) -> BoxFuture<'static, ()> + Send + 'static>;

/// Box an async closure into a [`Task`]
pub fn task<F, Fut>(f: F) -> Task
where
    F: FnOnce(CancellationToken) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    Box::new(move |token| f(token).boxed())
}

/// Handle to a running worker pool.
///
/// Cloning the handle is cheap; all clones refer to the same workers and
/// queue. Dropping the last handle without closing cancels the workers but
/// does not wait for them.
#[derive(Clone)]
pub struct WorkerPool {
    inner: Arc<Inner>,
}

struct Inner {
    sender: Sender<Option<Task>>,
    token: CancellationToken,
    handles: Mutex<Vec<JoinHandle<()>>>,
    state: Arc<WorkerState>,
    workers: usize,
    queue_capacity: usize,
}

impl WorkerPool {
    /// Start a pool with `workers` workers and the default queue capacity.
    ///
    /// Counts `<= 0` are treated as 1. Must be called inside a tokio runtime.
    pub fn new(workers: i64) -> Self {
        Self::with_queue_capacity(workers, DEFAULT_QUEUE_CAPACITY)
    }

    /// Start a pool with an explicit queue capacity (0 is treated as 1)
    pub fn with_queue_capacity(workers: i64, queue_capacity: usize) -> Self {
        let workers = usize::try_from(workers)
            .ok()
            .filter(|n| *n > 0)
            .unwrap_or(1);
        let queue_capacity = queue_capacity.max(1);

        let (sender, receiver) = async_channel::bounded(queue_capacity);
        let token = CancellationToken::new();
        let state = Arc::new(WorkerState::default());

        let handles = (0..workers)
            .map(|worker_id| {
                tokio::spawn(worker::worker_loop(
                    worker_id,
                    receiver.clone(),
                    token.clone(),
                    LiveWorker::register(state.clone()),
                ))
            })
            .collect();

        info!(workers, queue_capacity, "Worker pool started");

        Self {
            inner: Arc::new(Inner {
                sender,
                token,
                handles: Mutex::new(handles),
                state,
                workers,
                queue_capacity,
            }),
        }
    }

    /// Enqueue an async closure, waiting for a free slot if the queue is full
    pub async fn submit<F, Fut>(&self, f: F) -> Result<()>
    where
        F: FnOnce(CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.submit_task(Some(task(f))).await
    }

    /// Enqueue a pre-boxed task.
    ///
    /// `None` is accepted and skipped by whichever worker dequeues it.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Closed`] if the pool was closed before the task
    /// could be enqueued, including while this call was waiting for space.
    pub async fn submit_task(&self, task: Option<Task>) -> Result<()> {
        if self.inner.token.is_cancelled() {
            return Err(PoolError::Closed);
        }

        self.inner
            .sender
            .send(task)
            .await
            .map_err(|_| PoolError::Closed)
    }

    /// Enqueue an async closure without waiting
    pub fn try_submit<F, Fut>(&self, f: F) -> Result<()>
    where
        F: FnOnce(CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.try_submit_task(Some(task(f)))
    }

    /// Enqueue a pre-boxed task without waiting.
    ///
    /// # Errors
    ///
    /// - [`PoolError::Full`] if every queue slot is taken
    /// - [`PoolError::Closed`] if the pool is closed
    pub fn try_submit_task(&self, task: Option<Task>) -> Result<()> {
        if self.inner.token.is_cancelled() {
            return Err(PoolError::Closed);
        }

        self.inner.sender.try_send(task).map_err(|e| match e {
            TrySendError::Full(_) => PoolError::Full,
            TrySendError::Closed(_) => PoolError::Closed,
        })
    }

    /// Stop the pool and wait for every worker to exit.
    ///
    /// Cancels the shared token first, then closes the queue. Tasks queued
    /// before the call still run; a task enqueued by a submitter racing with
    /// `close` may be abandoned. Tasks already running are never interrupted.
    ///
    /// Safe to call more than once; later calls wait for the same workers.
    pub async fn close(&self) {
        let queued = self.size();
        debug!(queued, "Closing worker pool");
        if !self.inner.token.is_cancelled() {
            self.inner.state.set_drain_budget(queued);
        }
        self.inner.token.cancel();
        self.inner.sender.close();
        self.join_workers().await;
    }

    /// Stop accepting tasks, let the workers drain the queue, then cancel.
    pub async fn close_graceful(&self) {
        debug!(queued = self.size(), "Draining worker pool");
        self.inner.sender.close();
        self.join_workers().await;
        self.inner.token.cancel();
    }

    async fn join_workers(&self) {
        let mut handles = self.inner.handles.lock().await;
        if handles.is_empty() {
            return;
        }

        let workers = handles.len();
        for (worker_id, handle) in handles.drain(..).enumerate() {
            if let Err(e) = handle.await {
                warn!(worker_id, error = %e, "Worker exited abnormally");
            }
        }

        info!(workers, abandoned = self.size(), "Worker pool closed");
    }

    /// Number of tasks queued and not yet picked up by a worker
    pub fn size(&self) -> usize {
        self.inner.sender.len()
    }

    /// Number of workers started at construction
    pub fn workers(&self) -> usize {
        self.inner.workers
    }

    /// Number of workers whose dispatch loop has not yet exited
    pub fn live_workers(&self) -> usize {
        self.inner.state.live()
    }

    pub fn queue_capacity(&self) -> usize {
        self.inner.queue_capacity
    }

    /// Whether the queue no longer accepts tasks
    pub fn is_closed(&self) -> bool {
        self.inner.sender.is_closed() || self.inner.token.is_cancelled()
    }

    /// A token that is cancelled when the pool shuts down.
    ///
    /// Cancelling the returned token does not affect the pool.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.inner.token.child_token()
    }
}

impl fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerPool")
            .field("workers", &self.inner.workers)
            .field("live_workers", &self.live_workers())
            .field("queue_capacity", &self.inner.queue_capacity)
            .field("queued", &self.size())
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        self.token.cancel();
        self.sender.close();
    }
}
