use crate::reactor::future::{ConnectFuture, ReadFuture, WriteFuture};
use crate::reactor::poller::platform::{
    sys_close, sys_domain, sys_shutdown, sys_socket, sys_sockname,
};

use std::io;
use std::net::{Shutdown, SocketAddr};
use std::os::fd::RawFd;

/// Size of each read performed by [`TcpStream::read_to_end`].
const READ_CHUNK: usize = 4096;

/// A non-blocking TCP connection.
///
/// The socket is closed when the stream is dropped.
pub struct TcpStream {
    fd: RawFd,
}

impl TcpStream {
    pub(crate) fn from_raw(fd: RawFd) -> Self {
        Self { fd }
    }

    /// Opens a connection to `addr`.
    ///
    /// The socket is closed again if the handshake fails.
    pub async fn connect(addr: SocketAddr) -> io::Result<Self> {
        let fd = sys_socket(sys_domain(&addr))?;
        let stream = Self::from_raw(fd);

        ConnectFuture::new(fd, addr).await?;

        Ok(stream)
    }

    /// Reads up to `buffer.len()` bytes; `Ok(0)` means the peer closed its
    /// side.
    pub async fn read(&self, buffer: &mut [u8]) -> io::Result<usize> {
        ReadFuture::new(self.fd, buffer).await
    }

    /// Writes all of `buffer` and returns its length.
    pub async fn write(&self, buffer: &[u8]) -> io::Result<usize> {
        WriteFuture::new(self.fd, buffer).await
    }

    pub async fn write_all(&self, buffer: &[u8]) -> io::Result<()> {
        let n = self.write(buffer).await?;

        if n < buffer.len() {
            return Err(io::Error::new(
                io::ErrorKind::WriteZero,
                "write returned before the whole buffer was sent",
            ));
        }

        Ok(())
    }

    /// Reads until end of stream, appending to `out`; returns the number of
    /// bytes appended.
    pub async fn read_to_end(&self, out: &mut Vec<u8>) -> io::Result<usize> {
        let mut chunk = [0u8; READ_CHUNK];
        let start = out.len();

        loop {
            let n = self.read(&mut chunk).await?;
            if n == 0 {
                return Ok(out.len() - start);
            }

            out.extend_from_slice(&chunk[..n]);
        }
    }

    /// Shuts down the read, write, or both halves of this connection.
    pub fn shutdown(&self, how: Shutdown) -> io::Result<()> {
        sys_shutdown(self.fd, how)
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        sys_sockname(self.fd)
    }
}

impl Drop for TcpStream {
    fn drop(&mut self) {
        sys_close(self.fd);
    }
}
