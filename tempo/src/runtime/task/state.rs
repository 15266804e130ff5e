/// Task is idle and not scheduled.
///
/// The task exists but is not currently queued or running.
pub(crate) const IDLE: usize = 0;

/// Task is queued for execution.
pub(crate) const QUEUED: usize = 1;

/// Task is currently being polled.
pub(crate) const RUNNING: usize = 2;

/// The future has returned `Poll::Ready` and will not be polled again.
pub(crate) const COMPLETED: usize = 3;

/// Task was woken while running and must be re-queued once the current poll
/// returns.
pub(crate) const NOTIFIED: usize = 4;

/// Task was aborted; it will never be polled again and has no output.
pub(crate) const CANCELLED: usize = 5;
