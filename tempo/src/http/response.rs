use crate::error::FetchError;

use http::header::{CONTENT_LENGTH, TRANSFER_ENCODING};
use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use httparse::Status;
use serde_json::Value;

const MAX_HEADERS: usize = 64;

/// A fully received HTTP response.
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    reason: String,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl Response {
    /// Parses a raw response read to end of stream.
    ///
    /// A chunked body is decoded, and a body longer than `Content-Length`
    /// is cut to that length.
    pub fn parse(raw: &[u8]) -> Result<Self, FetchError> {
        let mut slots = [httparse::EMPTY_HEADER; MAX_HEADERS];
        let mut head = httparse::Response::new(&mut slots);

        let body_start = match head.parse(raw) {
            Ok(Status::Complete(n)) => n,
            Ok(Status::Partial) => return Err(malformed("missing end of headers")),
            Err(err) => return Err(malformed(err.to_string())),
        };

        let status = head
            .code
            .and_then(|code| StatusCode::from_u16(code).ok())
            .ok_or_else(|| malformed("bad status code"))?;
        let reason = head.reason.unwrap_or_default().to_string();

        let mut headers = HeaderMap::with_capacity(head.headers.len());
        for header in head.headers.iter() {
            let name = HeaderName::from_bytes(header.name.as_bytes())
                .map_err(|_| malformed(format!("bad header name `{}`", header.name)))?;
            let value = HeaderValue::from_bytes(header.value)
                .map_err(|_| malformed(format!("bad value for header `{}`", header.name)))?;
            headers.append(name, value);
        }

        let body = &raw[body_start..];
        let chunked = headers
            .get(TRANSFER_ENCODING)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.to_ascii_lowercase().contains("chunked"));

        let body = if chunked {
            decode_chunked(body)?
        } else if let Some(length) = headers.get(CONTENT_LENGTH) {
            let length: usize = length
                .to_str()
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .ok_or_else(|| malformed(format!("bad content-length {length:?}")))?;

            body.get(..length)
                .ok_or_else(|| malformed("body shorter than content-length"))?
                .to_vec()
        } else {
            body.to_vec()
        };

        Ok(Self {
            status,
            reason,
            headers,
            body,
        })
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Reason phrase as sent by the server, which may be empty.
    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Value of the first header named `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn json(&self) -> Result<Value, FetchError> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

fn malformed(reason: impl Into<String>) -> FetchError {
    FetchError::MalformedResponse(reason.into())
}

fn decode_chunked(mut body: &[u8]) -> Result<Vec<u8>, FetchError> {
    let mut out = Vec::new();

    loop {
        let (consumed, size) = match httparse::parse_chunk_size(body) {
            Ok(Status::Complete(parsed)) => parsed,
            Ok(Status::Partial) => return Err(malformed("truncated chunk size")),
            Err(_) => return Err(malformed("bad chunk size")),
        };
        body = &body[consumed..];

        // Trailers after the last chunk are ignored.
        if size == 0 {
            return Ok(out);
        }

        let end = usize::try_from(size)
            .ok()
            .and_then(|size| size.checked_add(2))
            .ok_or_else(|| malformed("bad chunk size"))?;

        let Some(chunk) = body.get(..end) else {
            return Err(malformed("truncated chunk"));
        };
        let Some(data) = chunk.strip_suffix(b"\r\n") else {
            return Err(malformed("chunk not terminated by CRLF"));
        };

        out.extend_from_slice(data);
        body = &body[end..];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_content_length_body() {
        let raw = b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 9\r\n\r\n{\"id\": 1}trailing";

        let response = Response::parse(raw).unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.reason(), "OK");
        assert_eq!(response.header("content-type"), Some("application/json"));
        assert_eq!(response.json().unwrap(), serde_json::json!({"id": 1}));
    }

    #[test]
    fn decodes_chunked_body() {
        let raw = b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n4\r\n{\"a\"\r\n3;ext=1\r\n: 2\r\n1\r\n}\r\n0\r\n\r\n";

        let response = Response::parse(raw).unwrap();

        assert_eq!(response.body(), b"{\"a\": 2}");
    }

    #[test]
    fn reports_status_without_failing_parse() {
        let raw = b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\n\r\n";

        let response = Response::parse(raw).unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(!response.is_success());
    }

    #[test]
    fn rejects_malformed_responses() {
        for raw in [
            &b"HTTP/1.1 200 OK\r\nContent-Length: 3\r\n"[..],
            &b"SMTP 220 hello\r\n\r\n"[..],
            &b"HTTP/1.1 200 OK\r\nContent-Length: 10\r\n\r\nshort"[..],
            &b"HTTP/1.1 200 OK\r\nContent-Length: lots\r\n\r\nshort"[..],
            &b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\nzz\r\n"[..],
            &b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n5\r\nab"[..],
            &b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\nffffffffffffffff\r\nab\r\n0\r\n\r\n"[..],
            &b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n2\r\nabcd\r\n0\r\n\r\n"[..],
        ] {
            assert!(
                matches!(Response::parse(raw), Err(FetchError::MalformedResponse(_))),
                "{:?}",
                String::from_utf8_lossy(raw)
            );
        }
    }

    #[test]
    fn huge_chunk_sizes_are_malformed_not_a_panic() {
        for size in ["ffffffffffffffff", "fffffffffffffffe", "fffffffffffffff"] {
            let raw = format!(
                "HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n{size}\r\nab\r\n0\r\n\r\n"
            );

            assert!(matches!(
                Response::parse(raw.as_bytes()),
                Err(FetchError::MalformedResponse(_))
            ));
        }
    }
}
