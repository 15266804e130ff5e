//! # tempo
//!
//! Twenty short lessons in asynchronous programming and object modelling,
//! together with the small runtime they run on.
//!
//! The runtime is single-threaded and cooperative. Spawned tasks wait in a
//! FIFO run queue; when none is ready, an epoll reactor sleeps until the
//! next timer deadline or socket event and wakes whoever was waiting for
//! it. On top of that sit timers, TCP sockets, a minimal HTTP client for
//! JSON, one-shot deferred values and completion callbacks, which is all
//! the lessons need.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use tempo::deferred;
//!
//! let runtime = tempo::RuntimeBuilder::new().build()?;
//!
//! let greeting = runtime.block_on(async {
//!     deferred::resolve_after::<_, ()>(Duration::from_millis(10), "hello").await
//! });
//! assert_eq!(greeting, Ok("hello"));
//! ```
//!
//! ## Modules
//!
//! - [`task`]: spawning, join handles, join sets
//! - [`time`]: sleep, timeout, instrumented, set_timeout
//! - [`net`]: client TCP streams
//! - [`http`]: JSON `GET` over HTTP/1.1
//! - [`deferred`]: deferred values, cleanup, joint waits
//! - [`callback`]: completion callbacks and sequential chains
//! - [`objects`]: the object models of lessons 16 to 20
//! - [`lessons`]: the lessons and the driver that runs them

mod reactor;
mod runtime;
mod utils;

pub mod callback;
pub mod config;
pub mod deferred;
pub mod error;
pub mod http;
pub mod lessons;
pub mod net;
pub mod objects;
pub mod output;
pub mod time;

use std::future::Future;
use std::pin::Pin;

pub use error::{Error, Result};
pub use runtime::Runtime;
pub use runtime::builder::RuntimeBuilder;
pub use runtime::task;
pub use runtime::yield_now::yield_now;

pub use tempo_macros::{join, test, try_join};

/// A boxed, sendable future borrowing for `'a`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
