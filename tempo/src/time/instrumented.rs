use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

/// Wraps a future and measures how long it takes to complete.
///
/// Resolves to the wrapped output and the time elapsed since the first
/// poll.
///
/// # Examples
///
/// ```rust,ignore
/// let (value, elapsed) = instrumented(async { 42 }).await;
/// println!("Completed in {:?}", elapsed);
/// ```
pub fn instrumented<F>(future: F) -> Instrumented<F> {
    Instrumented {
        future,
        start: None,
    }
}

/// Future returned by [`instrumented`].
///
/// Timing starts on the first poll, not at construction.
pub struct Instrumented<F> {
    future: F,
    start: Option<Instant>,
}

impl<F: Future> Future for Instrumented<F> {
    type Output = (F::Output, Duration);

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        // Safety: `future` is never moved out of the pinned struct.
        let this = unsafe { self.get_unchecked_mut() };

        let start = *this.start.get_or_insert_with(Instant::now);

        match unsafe { Pin::new_unchecked(&mut this.future) }.poll(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(output) => Poll::Ready((output, start.elapsed())),
        }
    }
}
