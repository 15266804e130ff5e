use crate::reactor::poller;
use crate::runtime::task::Runnable;

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// FIFO queue of tasks that are ready to be polled.
///
/// Wakers push into it from anywhere; only the thread inside
/// [`Runtime::block_on`](crate::Runtime::block_on) pops. While that thread
/// is blocked in the poller, a push also writes to the poller's eventfd so
/// the blocking turn returns immediately.
pub(crate) struct RunQueue {
    /// Tasks in wake order.
    queue: Mutex<VecDeque<Arc<dyn Runnable>>>,

    /// Set while the driving thread may be blocked in the poller.
    parked: AtomicBool,

    /// Interrupts a blocking poll.
    unparker: Arc<poller::Waker>,

    /// Once set, pushes are discarded.
    shutdown: AtomicBool,
}

impl RunQueue {
    pub(crate) fn new(unparker: Arc<poller::Waker>) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            parked: AtomicBool::new(false),
            unparker,
            shutdown: AtomicBool::new(false),
        }
    }

    /// Appends a task and unparks the driver if it is waiting on I/O.
    pub(crate) fn push(&self, task: Arc<dyn Runnable>) {
        if self.shutdown.load(Ordering::Acquire) {
            return;
        }

        self.queue.lock().unwrap().push_back(task);

        if self.parked.load(Ordering::Acquire) {
            self.unparker.wake();
        }
    }

    /// Removes the oldest ready task.
    pub(crate) fn pop(&self) -> Option<Arc<dyn Runnable>> {
        self.queue.lock().unwrap().pop_front()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.queue.lock().unwrap().is_empty()
    }

    /// Marks whether the driver is about to block (`true`) or is running
    /// tasks again (`false`).
    pub(crate) fn set_parked(&self, parked: bool) {
        self.parked.store(parked, Ordering::Release);
    }

    /// Discards every queued task and rejects later pushes.
    ///
    /// Queued tasks hold an `Arc` back to this queue; clearing them breaks
    /// that cycle when the runtime is dropped.
    pub(crate) fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Release);

        let drained: Vec<_> = self.queue.lock().unwrap().drain(..).collect();
        drop(drained);
    }
}
