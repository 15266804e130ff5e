use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Top-level error of the `tempo` binary and library entry points.
#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("unknown lesson {0} (lessons are numbered 1 to 20)")]
    UnknownLesson(u8),
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Failure of an HTTP JSON request.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL `{0}`")]
    InvalidUrl(String),

    #[error("unsupported URL scheme `{0}` (only http is supported)")]
    UnsupportedScheme(String),

    #[error("failed to resolve `{host}`: {source}")]
    Resolve {
        host: String,
        #[source]
        source: io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("malformed HTTP response: {0}")]
    MalformedResponse(String),

    #[error("HTTP status {status} {reason}")]
    Status { status: u16, reason: String },

    #[error("invalid JSON body: {0}")]
    Json(#[from] serde_json::Error),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),
}
