//! Asynchronous task primitives.
//!
//! A task wraps a spawned future together with its lifecycle state, the
//! wakers of everyone awaiting its output, and the output itself once it
//! exists. [`spawn`] creates one; [`JoinHandle`] awaits one; [`JoinSet`]
//! manages a group.

pub(crate) mod handle;
pub(crate) mod set;
pub(crate) mod state;
pub(crate) mod waker;

pub(crate) mod core;

pub(crate) use core::{Runnable, Task};

pub use core::spawn;
pub use handle::JoinHandle;
pub use set::JoinSet;
