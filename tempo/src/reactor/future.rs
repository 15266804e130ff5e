use crate::reactor::command::Command;
use crate::reactor::poller::common::Interest;
use crate::reactor::poller::platform::{
    sys_connect, sys_get_socket_error, sys_poll_writable, sys_read, sys_write,
};
use crate::runtime::context::{CURRENT_REACTOR, with_reactor};

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::os::fd::RawFd;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Readiness bookkeeping shared by the I/O futures.
///
/// Registrations are one-shot, so a future that sees `WouldBlock` registers
/// again with its current waker. Dropping the future withdraws whatever is
/// still pending.
struct Interested {
    fd: RawFd,
    interest: Interest,
    registered: bool,
}

impl Interested {
    fn new(fd: RawFd, interest: Interest) -> Self {
        Self {
            fd,
            interest,
            registered: false,
        }
    }

    fn wait(&mut self, cx: &Context<'_>) {
        with_reactor("socket I/O", |reactor| {
            let _ = reactor.send(Command::Register {
                fd: self.fd,
                interest: self.interest,
                waker: cx.waker().clone(),
            });
        });

        self.registered = true;
    }

    fn done(&mut self) {
        if !self.registered {
            return;
        }
        self.registered = false;

        CURRENT_REACTOR.with(|cell| {
            if let Some(reactor) = cell.borrow().as_ref() {
                let _ = reactor.send(Command::Deregister { fd: self.fd });
            }
        });
    }
}

impl Drop for Interested {
    fn drop(&mut self) {
        self.done();
    }
}

/// Reads once from a non-blocking descriptor; resolves with the byte count.
///
/// `Ok(0)` means end of stream.
pub(crate) struct ReadFuture<'a> {
    io: Interested,
    buffer: &'a mut [u8],
}

impl<'a> ReadFuture<'a> {
    pub(crate) fn new(fd: RawFd, buffer: &'a mut [u8]) -> Self {
        Self {
            io: Interested::new(fd, Interest::READ),
            buffer,
        }
    }
}

impl Future for ReadFuture<'_> {
    type Output = io::Result<usize>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();

        loop {
            let n = sys_read(this.io.fd, this.buffer);

            if n >= 0 {
                this.io.done();
                return Poll::Ready(Ok(n as usize));
            }

            let err = io::Error::last_os_error();

            match err.kind() {
                io::ErrorKind::Interrupted => continue,
                io::ErrorKind::WouldBlock => {
                    this.io.wait(cx);
                    return Poll::Pending;
                }
                _ => {
                    this.io.done();
                    return Poll::Ready(Err(err));
                }
            }
        }
    }
}

/// Writes a whole buffer to a non-blocking descriptor, across as many
/// readiness cycles as it takes.
pub(crate) struct WriteFuture<'a> {
    io: Interested,
    buffer: &'a [u8],
    written: usize,
}

impl<'a> WriteFuture<'a> {
    pub(crate) fn new(fd: RawFd, buffer: &'a [u8]) -> Self {
        Self {
            io: Interested::new(fd, Interest::WRITE),
            buffer,
            written: 0,
        }
    }
}

impl Future for WriteFuture<'_> {
    type Output = io::Result<usize>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();

        while this.written < this.buffer.len() {
            let n = sys_write(this.io.fd, &this.buffer[this.written..]);

            if n > 0 {
                this.written += n as usize;
                continue;
            }

            if n == 0 {
                this.io.done();
                return Poll::Ready(Err(io::ErrorKind::WriteZero.into()));
            }

            let err = io::Error::last_os_error();

            match err.kind() {
                io::ErrorKind::Interrupted => continue,
                io::ErrorKind::WouldBlock => {
                    this.io.wait(cx);
                    return Poll::Pending;
                }
                _ => {
                    this.io.done();
                    return Poll::Ready(Err(err));
                }
            }
        }

        this.io.done();
        Poll::Ready(Ok(this.written))
    }
}

/// Drives a non-blocking `connect` to completion.
///
/// The first poll starts the handshake. Later polls check writability
/// without blocking and then read `SO_ERROR` for the outcome.
pub(crate) struct ConnectFuture {
    io: Interested,
    addr: SocketAddr,
    started: bool,
}

impl ConnectFuture {
    pub(crate) fn new(fd: RawFd, addr: SocketAddr) -> Self {
        Self {
            io: Interested::new(fd, Interest::WRITE),
            addr,
            started: false,
        }
    }
}

impl Future for ConnectFuture {
    type Output = io::Result<()>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();

        if !this.started {
            match sys_connect(this.io.fd, &this.addr) {
                Ok(()) => return Poll::Ready(Ok(())),
                Err(err) if err.raw_os_error() == Some(libc::EINPROGRESS) => {
                    this.started = true;
                    this.io.wait(cx);
                    return Poll::Pending;
                }
                Err(err) => return Poll::Ready(Err(err)),
            }
        }

        match sys_poll_writable(this.io.fd) {
            Ok(true) => {
                this.io.done();
                Poll::Ready(sys_get_socket_error(this.io.fd))
            }
            Ok(false) => {
                this.io.wait(cx);
                Poll::Pending
            }
            Err(err) => {
                this.io.done();
                Poll::Ready(Err(err))
            }
        }
    }
}
