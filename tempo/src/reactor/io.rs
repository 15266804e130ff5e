use super::poller::common::Interest;

use std::os::fd::RawFd;
use std::task::Waker;

/// A one-shot readiness registration.
///
/// The reactor wakes `waker` the first time `fd` reports readiness matching
/// `interest`, then forgets the registration. A future that still cannot
/// make progress registers again on its next poll.
pub(crate) struct Registration {
    pub(crate) fd: RawFd,

    pub(crate) interest: Interest,

    pub(crate) waker: Waker,
}

impl Registration {
    /// Returns `true` if an event with the given readiness concerns this
    /// registration.
    pub(crate) fn matches(&self, readable: bool, writable: bool) -> bool {
        (readable && self.interest.read) || (writable && self.interest.write)
    }
}
