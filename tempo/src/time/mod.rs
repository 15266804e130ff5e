//! Timers.
//!
//! - [`sleep`] completes after a duration,
//! - [`timeout`] bounds how long a future may take,
//! - [`instrumented`] measures how long a future took,
//! - [`set_timeout`] runs a callback once after a delay.

mod instrumented;
mod set_timeout;
mod sleep;
mod timeout;

#[doc(inline)]
pub use instrumented::{Instrumented, instrumented};

#[doc(inline)]
pub use set_timeout::set_timeout;

#[doc(inline)]
pub use sleep::{Sleep, sleep};

#[doc(inline)]
pub use timeout::{Elapsed, Timeout, timeout};
