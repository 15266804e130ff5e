use super::channel::{Deferred, with_resolver};
use crate::time::set_timeout;

use std::time::Duration;

/// A deferred value that resolves with `value` after `delay`.
///
/// The timer starts immediately, whether or not the result is awaited.
///
/// # Panics
///
/// Panics if called outside of a runtime context.
pub fn resolve_after<T, E>(delay: Duration, value: T) -> Deferred<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    with_resolver(|resolver| {
        set_timeout(delay, move || resolver.resolve(value));
    })
}

/// A deferred value that rejects with `err` after `delay`.
///
/// # Panics
///
/// Panics if called outside of a runtime context.
pub fn reject_after<T, E>(delay: Duration, err: E) -> Deferred<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    with_resolver(|resolver| {
        set_timeout(delay, move || resolver.reject(err));
    })
}
