//! Linux `epoll`-based poller.
//!
//! Registrations are level-triggered; the reactor deregisters a descriptor
//! as soon as its registration fires, which makes every registration
//! effectively one-shot.

use super::common::Interest;
use crate::reactor::event::Event;
use crate::reactor::poller::Waker;

use libc::{
    EPOLL_CLOEXEC, EPOLL_CTL_ADD, EPOLL_CTL_DEL, EPOLL_CTL_MOD, EPOLLERR, EPOLLHUP, EPOLLIN,
    EPOLLOUT, EPOLLRDHUP, epoll_create1, epoll_ctl, epoll_event, epoll_wait,
};
use std::io;
use std::os::unix::io::RawFd;
use std::sync::Arc;
use std::time::Duration;

/// Reserved token for the wake-up eventfd; never produced by the slab.
const WAKE_TOKEN: u64 = u64::MAX;

/// Linux `epoll` poller.
///
/// Owns the epoll instance, an eventfd used as the wake-up source, and a
/// reusable buffer for the events returned by `epoll_wait`.
pub(crate) struct EpollPoller {
    epoll: RawFd,

    events: Vec<epoll_event>,

    waker: Arc<Waker>,
}

unsafe impl Send for EpollPoller {}

impl Waker {
    /// Makes a blocked `epoll_wait` return.
    pub(crate) fn wake(&self) {
        let buf: u64 = 1;
        unsafe {
            libc::write(self.0, &buf as *const _ as *const _, 8);
        }
    }

    /// Clears the pending wake-up count.
    fn drain(&self) {
        let mut buf = 0u64;
        unsafe {
            libc::read(self.0, &mut buf as *mut _ as *mut _, 8);
        }
    }
}

impl Drop for Waker {
    fn drop(&mut self) {
        unsafe { libc::close(self.0) };
    }
}

impl EpollPoller {
    /// Creates the epoll instance and registers a non-blocking eventfd as
    /// a persistent wake source.
    pub(crate) fn new(capacity: usize) -> io::Result<Self> {
        let epoll = unsafe { epoll_create1(EPOLL_CLOEXEC) };
        if epoll < 0 {
            return Err(io::Error::last_os_error());
        }

        let eventfd = unsafe { libc::eventfd(0, libc::EFD_NONBLOCK | libc::EFD_CLOEXEC) };
        if eventfd < 0 {
            let err = io::Error::last_os_error();
            unsafe { libc::close(epoll) };
            return Err(err);
        }

        let waker = Arc::new(Waker(eventfd));

        let mut event = epoll_event {
            events: EPOLLIN as u32,
            u64: WAKE_TOKEN,
        };

        let rc = unsafe { epoll_ctl(epoll, EPOLL_CTL_ADD, eventfd, &mut event) };
        if rc < 0 {
            let err = io::Error::last_os_error();
            unsafe { libc::close(epoll) };
            return Err(err);
        }

        Ok(Self {
            epoll,
            events: Vec::with_capacity(capacity),
            waker,
        })
    }

    pub(crate) fn waker(&self) -> Arc<Waker> {
        self.waker.clone()
    }

    /// Adds `fd` to the interest list.
    ///
    /// An fd the kernel still knows about (closed and reused without being
    /// deregistered) is modified instead.
    pub(crate) fn register(&self, fd: RawFd, token: usize, interest: Interest) -> io::Result<()> {
        match self.ctl(EPOLL_CTL_ADD, fd, token, interest) {
            Err(err) if err.raw_os_error() == Some(libc::EEXIST) => {
                self.ctl(EPOLL_CTL_MOD, fd, token, interest)
            }
            other => other,
        }
    }

    /// Updates the interest of a registered `fd`, adding it if the kernel
    /// dropped it when it was closed.
    pub(crate) fn reregister(
        &self,
        fd: RawFd,
        token: usize,
        interest: Interest,
    ) -> io::Result<()> {
        match self.ctl(EPOLL_CTL_MOD, fd, token, interest) {
            Err(err) if err.raw_os_error() == Some(libc::ENOENT) => {
                self.ctl(EPOLL_CTL_ADD, fd, token, interest)
            }
            other => other,
        }
    }

    /// Removes `fd` from the interest list; errors are ignored because the
    /// fd may already be closed.
    pub(crate) fn deregister(&self, fd: RawFd) {
        unsafe {
            epoll_ctl(self.epoll, EPOLL_CTL_DEL, fd, std::ptr::null_mut());
        }
    }

    fn ctl(&self, op: i32, fd: RawFd, token: usize, interest: Interest) -> io::Result<()> {
        let mut flags = EPOLLRDHUP;

        if interest.read {
            flags |= EPOLLIN;
        }
        if interest.write {
            flags |= EPOLLOUT;
        }

        let mut event = epoll_event {
            events: flags as u32,
            u64: token as u64,
        };

        let rc = unsafe { epoll_ctl(self.epoll, op, fd, &mut event) };
        if rc < 0 {
            Err(io::Error::last_os_error())
        } else {
            Ok(())
        }
    }

    /// Waits for readiness events.
    ///
    /// Blocks until a registered fd is ready, the wake eventfd is written,
    /// or `timeout` expires (`None` blocks indefinitely). Sub-millisecond
    /// timeouts are rounded up so a pending timer never causes a busy loop.
    pub(crate) fn poll(
        &mut self,
        events: &mut Vec<Event>,
        timeout: Option<Duration>,
    ) -> io::Result<()> {
        let timeout_ms = timeout
            .map(|t| t.as_nanos().div_ceil(1_000_000).min(i32::MAX as u128) as i32)
            .unwrap_or(-1);

        self.events.clear();

        let n = unsafe {
            epoll_wait(
                self.epoll,
                self.events.as_mut_ptr(),
                self.events.capacity() as i32,
                timeout_ms,
            )
        };

        events.clear();

        if n < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                return Ok(());
            }
            return Err(err);
        }

        // Safety: epoll_wait initialised the first `n` entries.
        unsafe {
            self.events.set_len(n as usize);
        }

        for ev in &self.events {
            if ev.u64 == WAKE_TOKEN {
                self.waker.drain();
                continue;
            }

            let token = ev.u64 as usize;
            let flags = ev.events;

            let readable = flags & ((EPOLLIN | EPOLLERR | EPOLLHUP | EPOLLRDHUP) as u32) != 0;
            let writable = flags & ((EPOLLOUT | EPOLLERR | EPOLLHUP) as u32) != 0;

            if let Some(e) = events.iter_mut().find(|e| e.token == token) {
                e.readable |= readable;
                e.writable |= writable;
            } else {
                events.push(Event {
                    token,
                    readable,
                    writable,
                });
            }
        }

        Ok(())
    }
}

impl Drop for EpollPoller {
    fn drop(&mut self) {
        unsafe { libc::close(self.epoll) };
    }
}
