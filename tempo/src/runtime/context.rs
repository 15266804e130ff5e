use crate::reactor::ReactorHandle;
use crate::runtime::queue::RunQueue;

use std::cell::RefCell;
use std::sync::Arc;

thread_local! {
    /// Handle to the reactor of the runtime driving this thread.
    ///
    /// Timers and sockets use it to submit commands without the handle
    /// being threaded through every API.
    pub(crate) static CURRENT_REACTOR: RefCell<Option<ReactorHandle>> =
        const { RefCell::new(None) };

    /// Run queue of the runtime driving this thread; `task::spawn` pushes here.
    pub(crate) static CURRENT_QUEUE: RefCell<Option<Arc<RunQueue>>> =
        const { RefCell::new(None) };
}

/// Installs the runtime context for the duration of `f`.
///
/// The previous context, if any, is restored afterwards, so nested runtimes
/// on the same thread see their own reactor and queue.
pub(crate) fn enter_context<R>(
    reactor: ReactorHandle,
    queue: Arc<RunQueue>,
    f: impl FnOnce() -> R,
) -> R {
    CURRENT_REACTOR.with(|r| {
        CURRENT_QUEUE.with(|q| {
            let prev_r = r.replace(Some(reactor));
            let prev_q = q.replace(Some(queue));

            let out = f();

            q.replace(prev_q);
            r.replace(prev_r);

            out
        })
    })
}

/// Runs `f` with the current reactor handle.
///
/// # Panics
///
/// Panics if called outside of a runtime context.
pub(crate) fn with_reactor<R>(what: &str, f: impl FnOnce(&ReactorHandle) -> R) -> R {
    CURRENT_REACTOR.with(|cell| {
        let binding = cell.borrow();
        let Some(reactor) = binding.as_ref() else {
            panic!("{what} must be used within the context of a tempo runtime");
        };

        f(reactor)
    })
}
