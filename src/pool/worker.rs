use super::Task;
use async_channel::Receiver;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, trace};

/// Counters shared between a pool handle and its workers
#[derive(Debug, Default)]
pub(super) struct WorkerState {
    live: AtomicUsize,
    drain_budget: AtomicUsize,
}

impl WorkerState {
    pub(super) fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    /// Allow workers that observe cancellation to run `queued` more tasks
    pub(super) fn set_drain_budget(&self, queued: usize) {
        self.drain_budget.store(queued, Ordering::SeqCst);
    }

    fn claim_drain_slot(&self) -> bool {
        self.drain_budget
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

/// Counts one worker as live until the worker future is dropped
pub(super) struct LiveWorker(Arc<WorkerState>);

impl LiveWorker {
    pub(super) fn register(state: Arc<WorkerState>) -> Self {
        state.live.fetch_add(1, Ordering::SeqCst);
        Self(state)
    }
}

impl Drop for LiveWorker {
    fn drop(&mut self) {
        self.0.live.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Dispatch loop run by every worker in the pool.
///
/// Each iteration waits for either the next queued task or the shared
/// cancellation token. When both are ready the branch is picked at random.
///
/// The loop exits when:
/// - the token is cancelled, after running its share of the tasks that were
///   queued when `close` was called, or
/// - the queue is closed and empty.
///
/// Tasks run to completion on this worker; cancellation is never observed
/// mid-task except by the task itself through the token it receives.
pub(super) async fn worker_loop(
    worker_id: usize,
    queue: Receiver<Option<Task>>,
    token: CancellationToken,
    live: LiveWorker,
) {
    trace!(worker_id, "Worker started");

    loop {
        tokio::select! {
            received = queue.recv() => match received {
                Ok(Some(task)) => run_task(worker_id, task, token.clone()).await,
                Ok(None) => trace!(worker_id, "Skipping empty task"),
                Err(_) => {
                    debug!(worker_id, "Task queue closed and drained");
                    break;
                }
            },
            _ = token.cancelled() => {
                let drained = drain_queued(worker_id, &queue, &token, &live.0).await;
                debug!(worker_id, drained, "Cancellation observed");
                break;
            }
        }
    }

    trace!(worker_id, "Worker stopped");
}

/// Runs queued tasks while the shared drain budget lasts.
///
/// The budget is the queue depth recorded by `close` just before it
/// cancelled, so tasks accepted before `close` are not lost to the select
/// race. Returns the number of queue entries this worker consumed.
async fn drain_queued(
    worker_id: usize,
    queue: &Receiver<Option<Task>>,
    token: &CancellationToken,
    state: &WorkerState,
) -> usize {
    let mut drained = 0;
    while state.claim_drain_slot() {
        match queue.try_recv() {
            Ok(Some(task)) => run_task(worker_id, task, token.clone()).await,
            Ok(None) => {}
            Err(_) => break,
        }
        drained += 1;
    }
    drained
}

/// Runs a single task, containing any panic so the worker survives it.
async fn run_task(worker_id: usize, task: Task, token: CancellationToken) {
    let outcome = AssertUnwindSafe(async move { task(token).await })
        .catch_unwind()
        .await;

    if let Err(payload) = outcome {
        error!(
            worker_id,
            panic = panic_message(payload.as_ref()),
            "Task panicked"
        );
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}
