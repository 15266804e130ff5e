use super::Task;
use super::state::{CANCELLED, COMPLETED};

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::task::{Context, Poll};

/// A handle to a spawned task.
///
/// `JoinHandle` is a future resolving to the task's output. Dropping it
/// does **not** cancel the task; it only discards the ability to observe
/// its result. Use [`abort`](Self::abort) to cancel.
pub struct JoinHandle<T> {
    pub(crate) task: Arc<Task<T>>,
}

impl<T: Send + 'static> JoinHandle<T> {
    /// Cancels the task. Has no effect if it already completed.
    ///
    /// A pending timer set with [`set_timeout`](crate::time::set_timeout)
    /// is cleared this way.
    pub fn abort(&self) {
        self.task.abort();
    }

    /// Returns `true` once the task has completed or been aborted.
    pub fn is_finished(&self) -> bool {
        matches!(self.task.state.load(Ordering::Acquire), COMPLETED | CANCELLED)
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.task.state.load(Ordering::Acquire) == CANCELLED
    }

    /// Takes the output if the task has completed and nobody took it yet.
    pub(crate) fn try_take(&self) -> Option<T> {
        if self.task.state.load(Ordering::Acquire) != COMPLETED {
            return None;
        }

        // Safety: COMPLETED is stored after the result is written, and the
        // task never touches the result again.
        unsafe { (*self.task.result.get()).take() }
    }
}

impl<T: Send + 'static> Future for JoinHandle<T> {
    type Output = T;

    /// Resolves with the task output.
    ///
    /// The waker is registered **before** re-checking the state to avoid a
    /// missed wake-up.
    ///
    /// # Panics
    ///
    /// Panics if the task was aborted, or if the output was already taken.
    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<T> {
        if let Some(done) = self.ready() {
            return done;
        }

        self.task.waiters.lock().unwrap().push(cx.waker().clone());

        self.ready().unwrap_or(Poll::Pending)
    }
}

impl<T: Send + 'static> JoinHandle<T> {
    fn ready(&self) -> Option<Poll<T>> {
        match self.task.state.load(Ordering::Acquire) {
            COMPLETED => {
                let value = self.try_take().expect("task output already taken");
                Some(Poll::Ready(value))
            }
            CANCELLED => panic!("awaited task {} was aborted", self.task.id),
            _ => None,
        }
    }
}
