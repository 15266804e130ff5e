//! The cooperative execution context.
//!
//! Everything here runs on the thread that calls
//! [`Runtime::block_on`](crate::Runtime::block_on): a FIFO run queue of
//! woken tasks, the reactor that fires timers and I/O readiness, and the
//! loop that alternates between the two. There are no worker threads.
//!
//! It is responsible for:
//! - executing asynchronous tasks,
//! - re-queueing tasks when their wakers fire,
//! - providing the runtime context used by timers and sockets,
//! - enabling cooperative multitasking via yielding.

mod core;
mod queue;

pub(crate) mod builder;
pub(crate) mod context;
pub(crate) mod yield_now;

pub mod task;

pub use core::Runtime;
