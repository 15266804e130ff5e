use crate::runtime::task::{self, JoinHandle};
use crate::time::sleep;

use std::time::Duration;

use tracing::trace;

/// Schedules `f` to run once, `delay` from now, on the current runtime.
///
/// The returned handle completes after `f` has run. Aborting it before the
/// delay elapses clears the timer and `f` never runs.
///
/// # Panics
///
/// Panics if called outside of a runtime context.
///
/// # Examples
///
/// ```rust,ignore
/// set_timeout(Duration::from_millis(300), || println!("later"));
/// ```
pub fn set_timeout<F>(delay: Duration, f: F) -> JoinHandle<()>
where
    F: FnOnce() + Send + 'static,
{
    task::spawn(async move {
        sleep(delay).await;
        trace!(?delay, "scheduled callback running");
        f();
    })
}
