//! A minimal HTTP/1.1 client for JSON `GET` requests.
//!
//! Only plain `http://` URLs are supported. Each request opens a fresh
//! connection, sends `Connection: close` and reads the response to end of
//! stream. The [`Fetch`] trait is the seam lessons depend on, so tests can
//! substitute canned responses.

mod client;
mod response;
mod target;

pub use crate::error::FetchError;
pub use client::HttpClient;
pub use response::Response;
pub use target::Target;

use crate::BoxFuture;

use serde_json::Value;

/// Something that can `GET` a URL and hand back its body as parsed JSON.
pub trait Fetch: Send + Sync {
    /// Fails on any transport error, non-2xx status or non-JSON body.
    fn get_json<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Value, FetchError>>;
}
