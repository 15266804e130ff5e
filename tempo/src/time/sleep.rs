use crate::reactor::command::Command;
use crate::runtime::context::with_reactor;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::task::{Context, Poll, Waker};
use std::time::{Duration, Instant};

/// Roughly 30 years; deadlines past this are clamped to it.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Creates a future that completes after `duration`.
///
/// The deadline is fixed when `sleep` is called, not when the future is
/// first polled. Durations too large to represent as an [`Instant`] sleep
/// until a deadline decades away instead of panicking.
///
/// # Panics
///
/// Panics if polled outside of a running runtime.
///
/// # Examples
///
/// ```rust,ignore
/// use std::time::Duration;
///
/// sleep(Duration::from_millis(10)).await;
/// ```
pub fn sleep(duration: Duration) -> Sleep {
    Sleep::new(duration)
}

/// A future that completes once its deadline is reached.
///
/// The timer is registered with the reactor on first poll and cancelled
/// when the future is dropped, so an abandoned sleep never wakes its task.
pub struct Sleep {
    deadline: Instant,

    /// Waker the current timer entry will wake, if one is registered.
    registered: Option<Waker>,

    /// Cancellation flag shared with the current timer entry.
    cancelled: Arc<AtomicBool>,
}

impl Sleep {
    pub(crate) fn new(duration: Duration) -> Self {
        let now = Instant::now();

        Self {
            deadline: now
                .checked_add(duration)
                .unwrap_or_else(|| now + FAR_FUTURE),
            registered: None,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    pub fn is_elapsed(&self) -> bool {
        Instant::now() >= self.deadline
    }
}

impl Future for Sleep {
    type Output = ();

    /// Registers the timer on first poll.
    ///
    /// If a later poll comes with a different waker (the sleep moved to
    /// another task, as inside `join!` or `timeout`) the old entry is
    /// cancelled and a new one registered.
    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();

        if this.is_elapsed() {
            return Poll::Ready(());
        }

        if let Some(waker) = &this.registered {
            if waker.will_wake(cx.waker()) {
                return Poll::Pending;
            }

            this.cancelled.store(true, Ordering::Release);
            this.cancelled = Arc::new(AtomicBool::new(false));
        }

        let waker = cx.waker().clone();

        with_reactor("sleep", |reactor| {
            let _ = reactor.send(Command::SetTimer {
                deadline: this.deadline,
                waker: waker.clone(),
                cancelled: this.cancelled.clone(),
            });
        });

        this.registered = Some(waker);

        Poll::Pending
    }
}

impl Drop for Sleep {
    fn drop(&mut self) {
        self.cancelled.store(true, Ordering::Release);
    }
}
