use super::JoinHandle;
use super::state::{CANCELLED, COMPLETED, IDLE, NOTIFIED, QUEUED, RUNNING};
use crate::runtime::context::CURRENT_QUEUE;
use crate::runtime::queue::RunQueue;
use crate::runtime::task::waker::make_waker;

use std::cell::UnsafeCell;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll, Waker};

use tracing::trace;

static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(1);

type BoxedFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

/// A runnable unit of work.
///
/// Erases the output type so the run queue can hold heterogeneous tasks as
/// `Arc<dyn Runnable>`.
pub(crate) trait Runnable: Send + Sync {
    fn run(self: Arc<Self>);
}

/// A spawned future and its lifecycle.
pub(crate) struct Task<T> {
    /// Identifier used in trace output.
    pub(crate) id: u64,

    /// The spawned future; `None` once it has completed.
    ///
    /// Only touched while the task is `RUNNING`, which gives the poll
    /// exclusive access.
    future: UnsafeCell<Option<BoxedFuture<T>>>,

    /// Output of the future, written once on completion and taken once by
    /// the join handle.
    pub(crate) result: UnsafeCell<Option<T>>,

    /// Lifecycle state (see [`super::state`]).
    pub(crate) state: AtomicUsize,

    /// Queue the task re-enters when woken.
    queue: Arc<RunQueue>,

    /// Wakers of the handles awaiting this task.
    pub(crate) waiters: Mutex<Vec<Waker>>,
}

unsafe impl<T> Send for Task<T> {}
unsafe impl<T> Sync for Task<T> {}

impl<T: Send + 'static> Task<T> {
    /// Creates a task in the `QUEUED` state; the caller must push it.
    pub(crate) fn new<F>(future: F, queue: Arc<RunQueue>) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Self {
            id: NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed),
            future: UnsafeCell::new(Some(Box::pin(future))),
            result: UnsafeCell::new(None),
            state: AtomicUsize::new(QUEUED),
            queue,
            waiters: Mutex::new(Vec::new()),
        }
    }

    /// Polls the future once.
    ///
    /// - `Poll::Pending`: back to `IDLE`, or straight back into the queue if
    ///   a wake arrived during the poll.
    /// - `Poll::Ready`: stores the output, drops the future and wakes every
    ///   join handle.
    pub(crate) fn run(self: Arc<Self>) {
        let current = self.state.load(Ordering::Acquire);

        if current != QUEUED && current != NOTIFIED {
            return;
        }

        // Exclusive access to the UnsafeCells starts here.
        if self
            .state
            .compare_exchange(current, RUNNING, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }

        let waker = make_waker(self.clone());
        let mut cx = Context::from_waker(&waker);

        // Safety: RUNNING guarantees nobody else touches the future.
        let slot = unsafe { &mut *self.future.get() };
        let Some(future) = slot.as_mut() else {
            return;
        };

        match future.as_mut().poll(&mut cx) {
            Poll::Pending => {
                match self.state.compare_exchange(
                    RUNNING,
                    IDLE,
                    Ordering::AcqRel,
                    Ordering::Acquire,
                ) {
                    Ok(_) => {}
                    Err(NOTIFIED) => {
                        self.state.store(QUEUED, Ordering::Release);
                        self.queue.push(self.clone());
                    }
                    // Aborted from inside its own poll.
                    Err(_) => {}
                }
            }
            Poll::Ready(val) => {
                *slot = None;

                if self.state.load(Ordering::Acquire) == CANCELLED {
                    return;
                }

                unsafe {
                    *self.result.get() = Some(val);
                }
                self.state.store(COMPLETED, Ordering::Release);

                trace!(task.id = self.id, "task completed");

                let waiters = std::mem::take(&mut *self.waiters.lock().unwrap());
                for w in waiters {
                    w.wake();
                }
            }
        }
    }

    /// Schedules the task to be polled.
    ///
    /// An `IDLE` task is queued; a `RUNNING` task is marked `NOTIFIED` so it
    /// is re-queued when its current poll returns. Anything else is a no-op.
    pub(crate) fn wake(self: Arc<Self>) {
        loop {
            let state = self.state.load(Ordering::Acquire);

            match state {
                IDLE => {
                    if self
                        .state
                        .compare_exchange(IDLE, QUEUED, Ordering::AcqRel, Ordering::Acquire)
                        .is_ok()
                    {
                        self.queue.push(self.clone());
                        return;
                    }
                }
                RUNNING => {
                    if self
                        .state
                        .compare_exchange(RUNNING, NOTIFIED, Ordering::AcqRel, Ordering::Acquire)
                        .is_ok()
                    {
                        return;
                    }
                }
                _ => return,
            }
        }
    }

    /// Moves the task to `CANCELLED` unless it already finished.
    ///
    /// The future is never polled again. Join handles are woken so that
    /// sets can observe the cancellation.
    pub(crate) fn abort(&self) {
        loop {
            let state = self.state.load(Ordering::Acquire);

            if state == COMPLETED || state == CANCELLED {
                return;
            }

            if self
                .state
                .compare_exchange(state, CANCELLED, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                trace!(task.id = self.id, "task aborted");

                let waiters = std::mem::take(&mut *self.waiters.lock().unwrap());
                for w in waiters {
                    w.wake();
                }
                return;
            }
        }
    }
}

impl<T: Send + 'static> Runnable for Task<T> {
    fn run(self: Arc<Self>) {
        Task::run(self)
    }
}

/// Spawns a future as a task onto the current runtime.
///
/// The task joins the back of the run queue. Dropping the returned handle
/// does not cancel it.
///
/// # Panics
///
/// Panics if called outside the context of a runtime.
pub fn spawn<F, T>(future: F) -> JoinHandle<T>
where
    T: Send + 'static,
    F: Future<Output = T> + Send + 'static,
{
    let queue = CURRENT_QUEUE.with(|cell| {
        cell.borrow()
            .as_ref()
            .expect("spawn must be called within the context of a tempo runtime")
            .clone()
    });

    let task = Arc::new(Task::new(future, queue.clone()));
    trace!(task.id = task.id, "task spawned");

    queue.push(task.clone());

    JoinHandle { task }
}
