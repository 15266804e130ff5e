use super::context::enter_context;
use super::queue::RunQueue;
use super::task::{self, JoinHandle};
use crate::reactor::{Reactor, ReactorHandle};

use std::cell::RefCell;
use std::future::Future;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use tracing::trace;

/// The runtime handle.
///
/// `Runtime` owns the run queue and the reactor and drives both from the
/// thread that calls [`block_on`](Self::block_on). Tasks never run
/// concurrently with each other: a task runs until it returns `Pending`,
/// then the next ready task runs, and when nothing is ready the reactor
/// waits for the earliest timer or an I/O event.
///
/// Dropping the runtime discards every task that has not completed.
pub struct Runtime {
    /// Tasks ready to be polled.
    queue: Arc<RunQueue>,

    /// Timer heap and I/O poller, driven between batches of tasks.
    reactor: RefCell<Reactor>,

    /// Command channel into `reactor`, installed in the thread context.
    handle: ReactorHandle,

    /// Upper bound on tasks run between two reactor turns.
    tasks_per_tick: usize,
}

impl Runtime {
    pub(crate) fn new(event_capacity: usize, tasks_per_tick: usize) -> io::Result<Self> {
        let (reactor, handle) = Reactor::new(event_capacity)?;
        let queue = Arc::new(RunQueue::new(reactor.waker()));

        Ok(Self {
            queue,
            reactor: RefCell::new(reactor),
            handle,
            tasks_per_tick,
        })
    }

    /// Spawns a future onto the runtime.
    ///
    /// The task is queued immediately but only makes progress while some
    /// thread is inside [`block_on`](Self::block_on).
    pub fn spawn<F>(&self, future: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        self.enter(|| task::spawn(future))
    }

    /// Runs a future to completion on the current thread.
    ///
    /// The future is spawned as a task and the run loop is driven until
    /// that task completes. Other spawned tasks make progress in the
    /// meantime; those still pending when this returns stay queued for the
    /// next call.
    ///
    /// # Panics
    ///
    /// Panics if the poller fails, or if the root task is aborted.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let result = runtime.block_on(async {
    ///     42
    /// });
    /// assert_eq!(result, 42);
    /// ```
    pub fn block_on<F>(&self, future: F) -> F::Output
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let root = self.spawn(future);

        loop {
            self.run_ready();

            if let Some(output) = root.try_take() {
                return output;
            }

            assert!(!root.is_cancelled(), "block_on root task was aborted");

            if let Err(err) = self.turn() {
                panic!("tempo reactor failed: {err}");
            }
        }
    }

    /// Runs at most `tasks_per_tick` queued tasks inside the runtime context.
    fn run_ready(&self) {
        self.enter(|| {
            for _ in 0..self.tasks_per_tick {
                let Some(task) = self.queue.pop() else {
                    break;
                };

                task.run();
            }
        });
    }

    /// Gives the reactor one turn.
    ///
    /// The turn is non-blocking if tasks are still queued; otherwise it
    /// blocks until the next timer deadline, an I/O event, or a wake from
    /// another thread.
    fn turn(&self) -> io::Result<()> {
        self.queue.set_parked(true);

        let timeout = if self.queue.is_empty() {
            None
        } else {
            Some(Duration::ZERO)
        };

        trace!(?timeout, "reactor turn");

        let result = self.reactor.borrow_mut().turn(timeout);
        self.queue.set_parked(false);

        result
    }

    fn enter<R>(&self, f: impl FnOnce() -> R) -> R {
        enter_context(self.handle.clone(), self.queue.clone(), f)
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        self.queue.shutdown();
    }
}
