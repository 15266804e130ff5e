//! TCP networking on the runtime reactor.
//!
//! Sockets are non-blocking; a read, write or connect that would
//! block parks the task until the reactor reports readiness. These types
//! must be used inside a running runtime.

mod tcp;

pub use tcp::stream::TcpStream;
