//! Reactor: timers and I/O readiness.
//!
//! The reactor owns the epoll poller and a min-heap of timer deadlines.
//! Futures never touch it directly; they send [`command::Command`]s through
//! the [`ReactorHandle`] installed in the thread context, and the runtime
//! applies those commands at the start of every reactor turn. When a
//! deadline passes or a descriptor becomes ready, the stored waker is
//! woken and the owning task goes back into the run queue.

mod core;
mod event;
mod timer;

pub(crate) mod command;
pub(crate) mod future;
pub(crate) mod io;
pub(crate) mod poller;

pub(crate) use core::{Reactor, ReactorHandle};
