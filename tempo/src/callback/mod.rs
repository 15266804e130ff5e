//! Completion callbacks and their conversion to deferred values.
//!
//! A [`Callback`] is invoked at most once with the outcome of an operation.
//! An operation that drops it without calling it abandons the deferred
//! value built from it.

mod sequence;

pub use sequence::{Step, run_sequential};

use crate::deferred::{self, Deferred};

/// A single-shot completion callback.
pub type Callback<T, E> = Box<dyn FnOnce(Result<T, E>) + Send>;

/// Turns a callback-style operation into a deferred value.
///
/// `op` runs immediately with a callback that settles the returned
/// deferred.
///
/// # Examples
///
/// ```rust,ignore
/// let data = into_deferred(|done| read_data(done)).await?;
/// ```
pub fn into_deferred<T, E, F>(op: F) -> Deferred<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
    F: FnOnce(Callback<T, E>),
{
    deferred::with_resolver(|resolver| op(Box::new(move |result| resolver.settle(result))))
}
