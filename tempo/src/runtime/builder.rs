use super::Runtime;

use std::io;

/// Default number of readiness events fetched per reactor turn.
pub(crate) const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Default number of tasks run before the reactor is given a turn.
pub(crate) const DEFAULT_TASKS_PER_TICK: usize = 64;

/// Builder for configuring and creating a runtime.
///
/// # Examples
///
/// ```rust,ignore
/// let runtime = RuntimeBuilder::new()
///     .event_capacity(128)
///     .tasks_per_tick(32)
///     .build()?;
/// ```
pub struct RuntimeBuilder {
    /// Size of the poller's event buffer.
    event_capacity: usize,

    /// Upper bound on tasks polled between two reactor turns.
    tasks_per_tick: usize,
}

impl RuntimeBuilder {
    /// Creates a new `RuntimeBuilder` with default configuration.
    pub fn new() -> Self {
        Self {
            event_capacity: DEFAULT_EVENT_CAPACITY,
            tasks_per_tick: DEFAULT_TASKS_PER_TICK,
        }
    }

    /// Sets how many readiness events a single reactor turn can report.
    ///
    /// # Panics
    ///
    /// Panics if `n == 0`.
    pub fn event_capacity(mut self, n: usize) -> Self {
        assert!(n > 0, "event_capacity must be > 0");

        self.event_capacity = n;
        self
    }

    /// Sets how many queued tasks run before timers and I/O are checked.
    ///
    /// Lower values favour timer precision, higher values favour throughput.
    ///
    /// # Panics
    ///
    /// Panics if `n == 0`.
    pub fn tasks_per_tick(mut self, n: usize) -> Self {
        assert!(n > 0, "tasks_per_tick must be > 0");

        self.tasks_per_tick = n;
        self
    }

    /// Builds the runtime with the configured options.
    ///
    /// Fails if the poller (epoll instance and wake-up eventfd) cannot be
    /// created.
    pub fn build(self) -> io::Result<Runtime> {
        Runtime::new(self.event_capacity, self.tasks_per_tick)
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
