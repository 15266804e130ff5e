use super::JoinHandle;
use super::state::{CANCELLED, COMPLETED};
use crate::task;

use std::future::{Future, poll_fn};
use std::pin::Pin;
use std::sync::atomic::Ordering;
use std::task::{Context, Poll};

/// A group of spawned tasks awaited together.
///
/// Outputs are discarded; the set only tracks completion. Dropping the set
/// aborts whatever is still running.
pub struct JoinSet {
    /// Handles erased over their output type.
    pub(crate) handles: Vec<Pin<Box<dyn SetHandle>>>,
}

impl JoinSet {
    pub fn new() -> Self {
        Self {
            handles: Vec::new(),
        }
    }

    /// Spawns `fut` onto the current runtime and adds it to the set.
    pub fn spawn<F, T>(&mut self, fut: F)
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let handle = task::spawn(fut);
        self.handles.push(Box::pin(handle));
    }

    /// Number of tasks not yet joined.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Waits for any task in the set to finish and removes it.
    ///
    /// Returns `None` if the set is empty.
    pub async fn join_next(&mut self) -> Option<()> {
        if self.handles.is_empty() {
            return None;
        }

        poll_fn(|cx| {
            let mut i = 0;

            while i < self.handles.len() {
                match self.handles[i].as_mut().poll_completed(cx) {
                    Poll::Ready(()) => {
                        self.handles.swap_remove(i);
                        return Poll::Ready(Some(()));
                    }
                    Poll::Pending => {
                        i += 1;
                    }
                }
            }
            Poll::Pending
        })
        .await
    }

    /// Aborts every task in the set and empties it.
    pub fn abort_all(&mut self) {
        for handle in &self.handles {
            handle.abort();
        }
        self.handles.clear();
    }

    /// Waits until every task in the set has finished.
    pub async fn join_all(&mut self) {
        while self.join_next().await.is_some() {}
    }
}

impl Default for JoinSet {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for JoinSet {
    fn drop(&mut self) {
        self.abort_all();
    }
}

/// Object-safe view of a `JoinHandle<T>` for any `T`.
pub(crate) trait SetHandle: Send {
    /// Ready once the task completed or was aborted; the output is dropped.
    fn poll_completed(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()>;

    fn abort(&self);
}

impl<T: Send + 'static> SetHandle for JoinHandle<T> {
    fn poll_completed(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let finished =
            |h: &JoinHandle<T>| matches!(h.task.state.load(Ordering::Acquire), COMPLETED | CANCELLED);

        if finished(&*self) {
            drop(self.try_take());
            return Poll::Ready(());
        }

        self.task.waiters.lock().unwrap().push(cx.waker().clone());

        if finished(&*self) {
            drop(self.try_take());
            return Poll::Ready(());
        }

        Poll::Pending
    }

    fn abort(&self) {
        JoinHandle::abort(self);
    }
}
