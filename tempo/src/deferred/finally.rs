use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Runs `cleanup` once `future` has produced its output, whatever that
/// output is, then yields the output unchanged.
///
/// `cleanup` does not run if the `Finally` is dropped before `future`
/// completes.
///
/// # Examples
///
/// ```rust,ignore
/// let value = finally(resolve_after(ms(500), "Done"), || println!("cleanup")).await;
/// ```
pub fn finally<F, C>(future: F, cleanup: C) -> Finally<F, C>
where
    F: Future,
    C: FnOnce(),
{
    Finally {
        future,
        cleanup: Some(cleanup),
    }
}

/// Future returned by [`finally`].
pub struct Finally<F, C> {
    future: F,
    cleanup: Option<C>,
}

impl<F, C> Future for Finally<F, C>
where
    F: Future,
    C: FnOnce(),
{
    type Output = F::Output;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        // Safety: `future` is never moved out of the pinned struct, and
        // `cleanup` is not structurally pinned.
        let this = unsafe { self.get_unchecked_mut() };

        let output = match unsafe { Pin::new_unchecked(&mut this.future) }.poll(cx) {
            Poll::Pending => return Poll::Pending,
            Poll::Ready(output) => output,
        };

        if let Some(cleanup) = this.cleanup.take() {
            cleanup();
        }

        Poll::Ready(output)
    }
}
