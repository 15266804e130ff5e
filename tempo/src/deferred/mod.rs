//! One-shot deferred values.
//!
//! A deferred value is a result that does not exist yet. It is split in
//! two halves: the [`Resolver`] settles it exactly once with a value or a
//! failure, and the [`Deferred`] future yields that outcome to whoever
//! awaits it. Consuming `self` in every settling method makes a second
//! settlement unrepresentable.
//!
//! The rest of the module builds on that pair: timed settlement, cleanup
//! that runs after settlement, and joint waits over many deferred values.

mod channel;
mod finally;
mod join;
mod timed;

pub use channel::{Deferred, Rejection, Resolver, channel, rejected, resolved, with_resolver};
pub use finally::{Finally, finally};
pub use join::{join_all, try_join_all};
pub use timed::{reject_after, resolve_after};
