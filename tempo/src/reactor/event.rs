/// A readiness event reported by the poller.
pub(crate) struct Event {
    /// Slab token of the registration the event belongs to.
    pub(crate) token: usize,

    /// Readable, or the peer hung up, or an error is pending.
    pub(crate) readable: bool,

    pub(crate) writable: bool,
}
