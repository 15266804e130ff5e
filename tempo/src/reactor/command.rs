use super::poller::common::Interest;

use std::os::fd::RawFd;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::task::Waker;
use std::time::Instant;

/// A request from a future to the reactor.
pub(crate) enum Command {
    /// Wake `waker` once `fd` is ready for `interest`.
    ///
    /// Registering an fd that is already registered replaces its waker and
    /// interest.
    Register {
        fd: RawFd,
        interest: Interest,
        waker: Waker,
    },
    /// Forget any pending registration for `fd`.
    Deregister { fd: RawFd },
    /// Wake `waker` at `deadline` unless `cancelled` is set by then.
    SetTimer {
        deadline: Instant,
        waker: Waker,
        cancelled: Arc<AtomicBool>,
    },
}
