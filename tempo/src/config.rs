//! Runtime configuration.
//!
//! Loaded from a TOML file; every section and key is optional:
//!
//! ```toml
//! [timing]
//! scale = 0.1            # multiplies every lesson delay
//!
//! [endpoints]
//! post = "http://jsonplaceholder.typicode.com/posts/1"
//! user = "http://jsonplaceholder.typicode.com/users/1"
//! unreachable = "http://invalid-url.example/"
//!
//! [http]
//! timeout_ms = 10000
//!
//! [runtime]
//! event_capacity = 64
//! tasks_per_tick = 64
//! ```

use crate::error::ConfigError;
use crate::runtime::builder::{DEFAULT_EVENT_CAPACITY, DEFAULT_TASKS_PER_TICK};

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// File read when no path is given, if it exists.
pub const DEFAULT_CONFIG_FILE: &str = "tempo.toml";

/// Longest unscaled lesson delay; `validate` checks it survives scaling.
const LONGEST_DELAY_MS: u64 = 2000;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub timing: TimingConfig,
    pub endpoints: EndpointsConfig,
    pub http: HttpConfig,
    pub runtime: RuntimeConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimingConfig {
    /// Factor applied to every lesson delay; `1.0` keeps the real timings.
    pub scale: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self { scale: 1.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EndpointsConfig {
    /// JSON document fetched as "the post".
    pub post: String,
    /// JSON document fetched as "the user".
    pub user: String,
    /// A URL expected to fail.
    pub unreachable: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            post: "http://jsonplaceholder.typicode.com/posts/1".to_string(),
            user: "http://jsonplaceholder.typicode.com/users/1".to_string(),
            unreachable: "http://invalid-url.example/".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpConfig {
    pub timeout_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_ms: 10_000 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeConfig {
    pub event_capacity: usize,
    pub tasks_per_tick: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            event_capacity: DEFAULT_EVENT_CAPACITY,
            tasks_per_tick: DEFAULT_TASKS_PER_TICK,
        }
    }
}

impl Config {
    /// Loads `path`, or [`DEFAULT_CONFIG_FILE`] if it exists, or the
    /// defaults. The result is validated.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => {
                debug!("no configuration file, using defaults");
                Self::default()
            }
        };

        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(path = %path.display(), "loading configuration");
        Self::from_toml_str(&content)
    }

    /// Parses a TOML document; missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let scale = self.timing.scale;
        if !scale.is_finite() || scale <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "timing.scale",
                reason: format!("must be a positive number, got {scale}"),
            });
        }

        let longest = Duration::from_millis(LONGEST_DELAY_MS).as_secs_f64() * scale;
        if Duration::try_from_secs_f64(longest).is_err() {
            return Err(ConfigError::Invalid {
                field: "timing.scale",
                reason: format!("{scale} makes the {LONGEST_DELAY_MS} ms delay overflow"),
            });
        }

        if self.http.timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "http.timeout_ms",
                reason: "must be greater than zero".to_string(),
            });
        }

        if self.runtime.event_capacity == 0 {
            return Err(ConfigError::Invalid {
                field: "runtime.event_capacity",
                reason: "must be greater than zero".to_string(),
            });
        }

        if self.runtime.tasks_per_tick == 0 {
            return Err(ConfigError::Invalid {
                field: "runtime.tasks_per_tick",
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(())
    }

    /// A lesson delay of `ms` milliseconds, scaled by `timing.scale`.
    ///
    /// Saturates at [`Duration::MAX`], and an invalid scale yields zero.
    pub fn delay(&self, ms: u64) -> Duration {
        let secs = Duration::from_millis(ms).as_secs_f64() * self.timing.scale;

        match Duration::try_from_secs_f64(secs) {
            Ok(delay) => delay,
            Err(_) if secs > 0.0 => Duration::MAX,
            Err(_) => Duration::ZERO,
        }
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_millis(self.http.timeout_ms)
    }
}
