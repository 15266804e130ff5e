use super::Callback;
use crate::deferred::{self, Deferred, Resolver};

use std::collections::VecDeque;

use tracing::trace;

/// One link of a sequential chain: takes the running value and a
/// callback to invoke with the next one.
pub type Step<T, E> = Box<dyn FnOnce(T, Callback<T, E>) + Send>;

type Observer<T> = Box<dyn FnMut(usize, &T) + Send>;

/// Runs `steps` one after another, starting from `initial`.
///
/// Step `i + 1` is launched from inside step `i`'s callback, never before.
/// `on_result(i, &value)` observes each intermediate result. The returned
/// deferred resolves with the final value, or rejects with the first
/// failure, after which no further step runs. An empty chain resolves with
/// `initial`.
pub fn run_sequential<T, E>(
    steps: Vec<Step<T, E>>,
    initial: T,
    on_result: impl FnMut(usize, &T) + Send + 'static,
) -> Deferred<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    deferred::with_resolver(|resolver| {
        run_from(steps.into(), 0, initial, Box::new(on_result), resolver);
    })
}

fn run_from<T, E>(
    mut steps: VecDeque<Step<T, E>>,
    index: usize,
    value: T,
    mut on_result: Observer<T>,
    resolver: Resolver<T, E>,
) where
    T: Send + 'static,
    E: Send + 'static,
{
    let Some(step) = steps.pop_front() else {
        resolver.resolve(value);
        return;
    };

    trace!(step = index, "starting step");

    step(
        value,
        Box::new(move |result| match result {
            Ok(next) => {
                on_result(index, &next);
                run_from(steps, index + 1, next, on_result, resolver);
            }
            Err(err) => {
                trace!(step = index, "step failed; chain stopped");
                resolver.reject(err);
            }
        }),
    );
}
