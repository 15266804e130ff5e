use std::future::{Future, poll_fn};
use std::pin::Pin;
use std::task::Poll;

/// Waits for every future and returns their outputs in input order.
pub async fn join_all<F: Future>(futures: Vec<F>) -> Vec<F::Output> {
    let mut slots: Vec<(Pin<Box<F>>, Option<F::Output>)> =
        futures.into_iter().map(|f| (Box::pin(f), None)).collect();

    poll_fn(|cx| {
        let mut pending = false;

        for (future, slot) in slots.iter_mut() {
            if slot.is_none() {
                match future.as_mut().poll(cx) {
                    Poll::Ready(output) => *slot = Some(output),
                    Poll::Pending => pending = true,
                }
            }
        }

        if pending {
            return Poll::Pending;
        }

        Poll::Ready(
            slots
                .iter_mut()
                .filter_map(|(_, slot)| slot.take())
                .collect::<Vec<_>>(),
        )
    })
    .await
}

/// Waits for every future to succeed, or for the first failure.
///
/// Outputs keep input order. On the first `Err` the remaining futures are
/// dropped and no partial results are returned.
pub async fn try_join_all<F, T, E>(futures: Vec<F>) -> Result<Vec<T>, E>
where
    F: Future<Output = Result<T, E>>,
{
    let mut slots: Vec<(Pin<Box<F>>, Option<T>)> =
        futures.into_iter().map(|f| (Box::pin(f), None)).collect();

    poll_fn(|cx| {
        let mut pending = false;

        for (future, slot) in slots.iter_mut() {
            if slot.is_none() {
                match future.as_mut().poll(cx) {
                    Poll::Ready(Ok(value)) => *slot = Some(value),
                    Poll::Ready(Err(err)) => return Poll::Ready(Err(err)),
                    Poll::Pending => pending = true,
                }
            }
        }

        if pending {
            return Poll::Pending;
        }

        Poll::Ready(Ok(slots
            .iter_mut()
            .filter_map(|(_, slot)| slot.take())
            .collect::<Vec<_>>()))
    })
    .await
}
