use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll, Waker};

use thiserror::Error;

/// Why a [`Deferred`] did not produce a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection<E> {
    /// The resolver settled with a failure.
    #[error("{0}")]
    Rejected(E),

    /// The resolver was dropped without settling.
    #[error("deferred value was abandoned before it settled")]
    Abandoned,
}

impl<E> Rejection<E> {
    /// The failure passed to [`Resolver::reject`], if there was one.
    pub fn into_rejected(self) -> Option<E> {
        match self {
            Rejection::Rejected(err) => Some(err),
            Rejection::Abandoned => None,
        }
    }
}

struct Shared<T, E> {
    outcome: Option<Result<T, Rejection<E>>>,
    waker: Option<Waker>,
}

/// Creates an unsettled deferred value and the resolver that settles it.
pub fn channel<T, E>() -> (Resolver<T, E>, Deferred<T, E>) {
    let shared = Arc::new(Mutex::new(Shared {
        outcome: None,
        waker: None,
    }));

    (
        Resolver {
            shared: Some(shared.clone()),
        },
        Deferred {
            shared,
            done: false,
        },
    )
}

/// Creates a deferred value and hands its resolver to `executor` right
/// away, before returning.
///
/// # Examples
///
/// ```rust,ignore
/// let greeting = with_resolver(|resolver| {
///     set_timeout(Duration::from_millis(10), move || resolver.resolve("hi"));
/// });
/// assert_eq!(greeting.await, Ok("hi"));
/// ```
pub fn with_resolver<T, E, F>(executor: F) -> Deferred<T, E>
where
    F: FnOnce(Resolver<T, E>),
{
    let (resolver, deferred) = channel();
    executor(resolver);
    deferred
}

/// A deferred value that is already settled with `value`.
pub fn resolved<T, E>(value: T) -> Deferred<T, E> {
    with_resolver(|r| r.resolve(value))
}

/// A deferred value that is already settled with `err`.
pub fn rejected<T, E>(err: E) -> Deferred<T, E> {
    with_resolver(|r| r.reject(err))
}

/// The settling half of a deferred value.
///
/// Dropping it unsettled settles the value with [`Rejection::Abandoned`].
pub struct Resolver<T, E> {
    shared: Option<Arc<Mutex<Shared<T, E>>>>,
}

impl<T, E> Resolver<T, E> {
    pub fn resolve(self, value: T) {
        self.settle(Ok(value));
    }

    pub fn reject(self, err: E) {
        self.settle(Err(err));
    }

    /// Settles with either outcome; the completion-callback form.
    pub fn settle(mut self, result: Result<T, E>) {
        self.complete(result.map_err(Rejection::Rejected));
    }

    fn complete(&mut self, outcome: Result<T, Rejection<E>>) {
        let Some(shared) = self.shared.take() else {
            return;
        };

        let waker = {
            let mut shared = shared.lock().unwrap();
            shared.outcome = Some(outcome);
            shared.waker.take()
        };

        if let Some(waker) = waker {
            waker.wake();
        }
    }
}

impl<T, E> Drop for Resolver<T, E> {
    fn drop(&mut self) {
        self.complete(Err(Rejection::Abandoned));
    }
}

/// The awaiting half of a deferred value.
///
/// Resolves once, with `Ok(value)` or the [`Rejection`].
pub struct Deferred<T, E> {
    shared: Arc<Mutex<Shared<T, E>>>,
    done: bool,
}

impl<T, E> Deferred<T, E> {
    /// Returns `true` once the resolver has settled or been dropped.
    pub fn is_settled(&self) -> bool {
        self.done || self.shared.lock().unwrap().outcome.is_some()
    }
}

impl<T, E> Future for Deferred<T, E> {
    type Output = Result<T, Rejection<E>>;

    /// # Panics
    ///
    /// Panics if polled again after it has resolved.
    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        assert!(!this.done, "Deferred polled after completion");

        let mut shared = this.shared.lock().unwrap();

        match shared.outcome.take() {
            Some(outcome) => {
                this.done = true;
                Poll::Ready(outcome)
            }
            None => {
                shared.waker = Some(cx.waker().clone());
                Poll::Pending
            }
        }
    }
}
