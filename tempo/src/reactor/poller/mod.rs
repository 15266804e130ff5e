//! Platform I/O poller.
//!
//! The reactor uses the poller to wait for readiness with a timeout, and
//! other threads use its [`Waker`] to interrupt that wait.

pub(crate) mod common;

pub(crate) use common::Waker;

#[cfg(target_os = "linux")]
mod epoll;

#[cfg(target_os = "linux")]
pub(crate) type Poller = epoll::EpollPoller;

#[cfg(not(target_os = "linux"))]
compile_error!("tempo's reactor currently supports Linux (epoll) only");

#[cfg(unix)]
pub(crate) mod unix;

#[cfg(unix)]
pub(crate) use unix as platform;
