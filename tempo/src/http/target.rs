use crate::error::FetchError;

use std::fmt;
use std::io;
use std::net::SocketAddr;

use url::{Position, Url};

const DEFAULT_PORT: u16 = 80;

/// An `http://` URL checked to be fetchable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    url: Url,
}

impl Target {
    /// Parses an absolute `http` URL with a host. Any fragment is ignored.
    pub fn parse(input: &str) -> Result<Self, FetchError> {
        let url = Url::parse(input.trim())
            .map_err(|err| FetchError::InvalidUrl(format!("{input}: {err}")))?;

        if url.scheme() != "http" {
            return Err(FetchError::UnsupportedScheme(url.scheme().to_string()));
        }

        if url.host_str().is_none_or(str::is_empty) {
            return Err(FetchError::InvalidUrl(format!("{input}: missing host")));
        }

        Ok(Self { url })
    }

    /// Host as written, IPv6 literals keeping their brackets.
    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }

    pub fn port(&self) -> u16 {
        self.url.port_or_known_default().unwrap_or(DEFAULT_PORT)
    }

    /// Request target: path and query.
    pub fn path(&self) -> &str {
        &self.url[Position::BeforePath..Position::AfterQuery]
    }

    /// Value of the `Host` header.
    pub fn authority(&self) -> &str {
        &self.url[Position::BeforeHost..Position::AfterPort]
    }

    /// Looks the host up with the system resolver. Blocks the calling thread.
    pub(crate) fn socket_addrs(&self) -> io::Result<Vec<SocketAddr>> {
        self.url.socket_addrs(|| Some(DEFAULT_PORT))
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url[..Position::AfterQuery])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_host_port_and_path() {
        let target = Target::parse("http://127.0.0.1:8080/posts/1?x=1#top").unwrap();

        assert_eq!(target.host(), "127.0.0.1");
        assert_eq!(target.port(), 8080);
        assert_eq!(target.path(), "/posts/1?x=1");
        assert_eq!(target.authority(), "127.0.0.1:8080");
        assert_eq!(target.to_string(), "http://127.0.0.1:8080/posts/1?x=1");
    }

    #[test]
    fn defaults_port_and_path() {
        let target = Target::parse("http://jsonplaceholder.typicode.com").unwrap();

        assert_eq!(target.port(), 80);
        assert_eq!(target.path(), "/");
        assert_eq!(target.authority(), "jsonplaceholder.typicode.com");
        assert_eq!(target.to_string(), "http://jsonplaceholder.typicode.com/");
    }

    #[test]
    fn keeps_ipv6_brackets_in_the_authority() {
        let target = Target::parse("http://[::1]:3000/users/1").unwrap();

        assert_eq!(target.authority(), "[::1]:3000");
        assert_eq!(target.port(), 3000);
    }

    #[test]
    fn resolves_ip_literals_without_a_lookup() {
        let target = Target::parse("http://[::1]:3000/").unwrap();

        assert_eq!(
            target.socket_addrs().unwrap(),
            ["[::1]:3000".parse::<SocketAddr>().unwrap()]
        );
    }

    #[test]
    fn rejects_https_and_garbage() {
        assert!(matches!(
            Target::parse("https://example.com/"),
            Err(FetchError::UnsupportedScheme(s)) if s == "https"
        ));
        assert!(matches!(
            Target::parse("example.com/posts"),
            Err(FetchError::InvalidUrl(_))
        ));
        assert!(matches!(
            Target::parse("http://host:notaport/"),
            Err(FetchError::InvalidUrl(_))
        ));
        assert!(matches!(Target::parse("http://"), Err(FetchError::InvalidUrl(_))));
    }
}
