use super::Fetch;
use super::response::Response;
use super::target::Target;
use crate::BoxFuture;
use crate::deferred::{self, Rejection};
use crate::error::FetchError;
use crate::net::TcpStream;
use crate::time;

use std::io;
use std::net::SocketAddr;
use std::thread;
use std::time::Duration;

use serde_json::Value;
use tracing::debug;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP/1.1 client over the runtime's TCP streams.
#[derive(Debug, Clone)]
pub struct HttpClient {
    timeout: Duration,
}

impl HttpClient {
    /// A client whose requests fail with [`FetchError::Timeout`] after
    /// `timeout`, counted from name resolution to the last byte received.
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Sends `GET url` and returns the response, whatever its status.
    pub async fn get(&self, url: &str) -> Result<Response, FetchError> {
        let target = Target::parse(url)?;

        match time::timeout(self.timeout, send(&target)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout(self.timeout)),
        }
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl Fetch for HttpClient {
    fn get_json<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Value, FetchError>> {
        Box::pin(async move {
            let response = self.get(url).await?;

            if !response.is_success() {
                return Err(FetchError::Status {
                    status: response.status().as_u16(),
                    reason: response.reason().to_string(),
                });
            }

            response.json()
        })
    }
}

async fn send(target: &Target) -> Result<Response, FetchError> {
    let stream = connect(target).await?;

    let request = format!(
        "GET {} HTTP/1.1\r\nHost: {}\r\nAccept: application/json\r\nUser-Agent: tempo/{}\r\nConnection: close\r\n\r\n",
        target.path(),
        target.authority(),
        env!("CARGO_PKG_VERSION"),
    );
    stream.write_all(request.as_bytes()).await?;

    let mut raw = Vec::new();
    stream.read_to_end(&mut raw).await?;

    let response = Response::parse(&raw)?;
    debug!(%target, status = %response.status(), bytes = raw.len(), "http response");

    Ok(response)
}

/// Tries every resolved address in order and keeps the first that accepts.
async fn connect(target: &Target) -> Result<TcpStream, FetchError> {
    let addrs = resolve(target).await?;
    let mut last_err = None;

    for addr in addrs {
        debug!(%addr, host = target.host(), "connecting");

        match TcpStream::connect(addr).await {
            Ok(stream) => return Ok(stream),
            Err(err) => last_err = Some(err),
        }
    }

    Err(last_err
        .map(FetchError::Io)
        .unwrap_or_else(|| resolve_error(target, no_address())))
}

/// Runs the system resolver on its own thread so the runtime keeps
/// polling other tasks while the lookup is in flight.
///
/// A lookup outliving its request finishes in the background and its
/// result is dropped.
async fn resolve(target: &Target) -> Result<Vec<SocketAddr>, FetchError> {
    let (resolver, lookup) = deferred::channel();
    let owned = target.clone();

    thread::Builder::new()
        .name("tempo-resolver".to_string())
        .spawn(move || resolver.settle(owned.socket_addrs()))?;

    let addrs = lookup.await.map_err(|rejection| {
        let source = match rejection {
            Rejection::Rejected(err) => err,
            Rejection::Abandoned => io::Error::other("resolver thread exited"),
        };
        resolve_error(target, source)
    })?;

    if addrs.is_empty() {
        return Err(resolve_error(target, no_address()));
    }

    Ok(addrs)
}

fn resolve_error(target: &Target, source: io::Error) -> FetchError {
    FetchError::Resolve {
        host: target.host().to_string(),
        source,
    }
}

fn no_address() -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, "no addresses found")
}
