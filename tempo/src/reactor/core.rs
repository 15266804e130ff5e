use super::command::Command;
use super::event::Event;
use super::io::Registration;
use super::poller::{self, Poller};
use super::timer::TimerEntry;
use crate::utils::Slab;

use std::collections::{BinaryHeap, HashMap};
use std::io;
use std::os::fd::RawFd;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::sync::mpsc::{Receiver, SendError, Sender, channel};
use std::time::{Duration, Instant};

use tracing::trace;

/// Cloneable sending side of the reactor's command channel.
#[derive(Clone)]
pub(crate) struct ReactorHandle {
    sender: Sender<Command>,
}

impl ReactorHandle {
    /// Queues a command; it takes effect at the start of the next turn.
    pub(crate) fn send(&self, command: Command) -> Result<(), SendError<Command>> {
        self.sender.send(command)
    }
}

pub(crate) struct Reactor {
    receiver: Receiver<Command>,

    poller: Poller,
    events: Vec<Event>,

    timers: BinaryHeap<TimerEntry>,
    next_timer_seq: u64,

    /// Pending registrations, addressed by poller token.
    io: Slab<Registration>,

    /// Token of the pending registration for each fd.
    tokens: HashMap<RawFd, usize>,
}

impl Reactor {
    pub(crate) fn new(event_capacity: usize) -> io::Result<(Self, ReactorHandle)> {
        let (sender, receiver) = channel();
        let poller = Poller::new(event_capacity)?;

        Ok((
            Self {
                receiver,
                poller,
                events: Vec::with_capacity(event_capacity),
                timers: BinaryHeap::new(),
                next_timer_seq: 0,
                io: Slab::new(64),
                tokens: HashMap::new(),
            },
            ReactorHandle { sender },
        ))
    }

    /// Handle that interrupts a blocking [`turn`](Self::turn) from any thread.
    pub(crate) fn waker(&self) -> Arc<poller::Waker> {
        self.poller.waker()
    }

    /// Applies queued commands, waits for readiness, then fires due timers.
    ///
    /// `timeout` bounds the wait; `None` means wait until the earliest
    /// timer deadline, or indefinitely if no timer is pending.
    pub(crate) fn turn(&mut self, timeout: Option<Duration>) -> io::Result<()> {
        while let Ok(command) = self.receiver.try_recv() {
            self.apply(command)?;
        }

        let until_timer = self
            .next_deadline()
            .map(|deadline| deadline.saturating_duration_since(Instant::now()));

        let timeout = match (timeout, until_timer) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };

        self.poller.poll(&mut self.events, timeout)?;

        let events: Vec<Event> = self.events.drain(..).collect();
        for event in events {
            self.dispatch(event);
        }

        self.fire_timers();

        Ok(())
    }

    fn apply(&mut self, command: Command) -> io::Result<()> {
        match command {
            Command::Register {
                fd,
                interest,
                waker,
            } => {
                if let Some(&token) = self.tokens.get(&fd) {
                    if let Some(entry) = self.io.get_mut(token) {
                        entry.interest = interest;
                        entry.waker = waker;
                    }
                    self.poller.reregister(fd, token, interest)?;
                } else {
                    let token = self.io.insert(Registration {
                        fd,
                        interest,
                        waker,
                    });
                    self.tokens.insert(fd, token);
                    self.poller.register(fd, token, interest)?;
                }

                trace!(
                    fd,
                    read = interest.read,
                    write = interest.write,
                    pending = self.io.len(),
                    "io registered"
                );
            }
            Command::Deregister { fd } => {
                if let Some(token) = self.tokens.remove(&fd) {
                    self.io.remove(token);
                    self.poller.deregister(fd);
                }
            }
            Command::SetTimer {
                deadline,
                waker,
                cancelled,
            } => {
                let seq = self.next_timer_seq;
                self.next_timer_seq += 1;

                self.timers.push(TimerEntry {
                    deadline,
                    seq,
                    waker,
                    cancelled,
                });
            }
        }

        Ok(())
    }

    fn dispatch(&mut self, event: Event) {
        let Some(entry) = self.io.get_mut(event.token) else {
            return;
        };

        if !entry.matches(event.readable, event.writable) {
            return;
        }

        let entry = self.io.remove(event.token);
        self.tokens.remove(&entry.fd);
        self.poller.deregister(entry.fd);

        trace!(fd = entry.fd, "io ready");
        entry.waker.wake();
    }

    /// Earliest deadline among live timers.
    ///
    /// Cancelled entries at the top of the heap are dropped here so they
    /// never bound the poll timeout.
    fn next_deadline(&mut self) -> Option<Instant> {
        while let Some(timer) = self.timers.peek() {
            if !timer.cancelled.load(Ordering::Acquire) {
                return Some(timer.deadline);
            }

            trace!(seq = timer.seq, "cancelled timer discarded");
            self.timers.pop();
        }

        None
    }

    fn fire_timers(&mut self) {
        let now = Instant::now();

        while let Some(timer) = self.timers.peek() {
            if timer.deadline > now {
                break;
            }

            let Some(timer) = self.timers.pop() else {
                break;
            };

            if timer.cancelled.load(Ordering::Acquire) {
                continue;
            }

            trace!(seq = timer.seq, "timer fired");
            timer.waker.wake();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;
    use std::task::Waker;

    fn set_timer(reactor: &mut Reactor, after: Duration, cancelled: bool) -> Arc<AtomicBool> {
        let flag = Arc::new(AtomicBool::new(cancelled));

        reactor
            .apply(Command::SetTimer {
                deadline: Instant::now() + after,
                waker: Waker::noop().clone(),
                cancelled: flag.clone(),
            })
            .unwrap();

        flag
    }

    #[test]
    fn cancelled_timers_do_not_bound_the_wait() {
        let (mut reactor, _handle) = Reactor::new(8).unwrap();

        set_timer(&mut reactor, Duration::from_secs(10), true);
        let live = Instant::now() + Duration::from_secs(20);
        set_timer(&mut reactor, Duration::from_secs(20), false);

        let next = reactor.next_deadline().unwrap();
        assert!(next >= live);
        assert_eq!(reactor.timers.len(), 1);
    }

    #[test]
    fn timer_cancelled_after_setting_is_discarded() {
        let (mut reactor, _handle) = Reactor::new(8).unwrap();

        let flag = set_timer(&mut reactor, Duration::from_secs(10), false);
        assert!(reactor.next_deadline().is_some());

        flag.store(true, Ordering::Release);
        assert_eq!(reactor.next_deadline(), None);
        assert!(reactor.timers.is_empty());
    }

    #[test]
    fn turn_drops_cancelled_timers_before_waiting() {
        let (mut reactor, handle) = Reactor::new(8).unwrap();

        handle
            .send(Command::SetTimer {
                deadline: Instant::now() + Duration::from_secs(10),
                waker: Waker::noop().clone(),
                cancelled: Arc::new(AtomicBool::new(true)),
            })
            .unwrap();

        let start = Instant::now();
        reactor.turn(Some(Duration::from_millis(10))).unwrap();

        assert!(start.elapsed() < Duration::from_secs(5));
        assert!(reactor.timers.is_empty());
    }
}
