//! Configuration handling for the service.
//!
//! Every value has a development default so the binary starts with no
//! environment at all. `Config::from_env` reads the overrides and validates
//! the few values that are not plain strings.

use std::env;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

/// Environment variable names. Public so integration tests can set them.
pub const ENV_BIND_ADDR: &str = "BIND_ADDR";
pub const ENV_BASE_URL: &str = "TFMKT_BASE_URL";
pub const ENV_USER_AGENT: &str = "TFMKT_USER_AGENT";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "TFMKT_REQUEST_TIMEOUT_SECS";
pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_BASE_URL: &str = "https://www.transfermarkt.com";
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Application runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    bind_addr: String,
    base_url: String,
    user_agent: String,
    request_timeout: Duration,
    log_format: LogFormat,
}

impl Config {
    /// Create a new config explicitly.
    pub fn new(bind_addr: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            bind_addr: bind_addr.into(),
            base_url: trim_base_url(base_url.into()),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            log_format: LogFormat::Text,
        }
    }

    /// Load from environment variables, falling back to development defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind_addr = env::var(ENV_BIND_ADDR).unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        let base_url = env::var(ENV_BASE_URL).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let user_agent =
            env::var(ENV_USER_AGENT).unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string());

        if url::Url::parse(&base_url).is_err() {
            return Err(ConfigError::InvalidValue {
                field: ENV_BASE_URL,
                reason: format!("'{}' is not an absolute URL", base_url),
            });
        }

        let request_timeout = match env::var(ENV_REQUEST_TIMEOUT_SECS) {
            Ok(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: ENV_REQUEST_TIMEOUT_SECS,
                        reason: format!("expected a positive number of seconds, got '{}'", raw),
                    });
                }
            },
            Err(_) => Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        };

        let log_format = match env::var(ENV_LOG_FORMAT) {
            Ok(raw) if raw.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Self {
            bind_addr,
            base_url: trim_base_url(base_url),
            user_agent,
            request_timeout,
            log_format,
        })
    }

    /// TCP bind address (host:port) for the HTTP server.
    pub fn bind_addr(&self) -> &str {
        &self.bind_addr
    }
    /// Site root every page URL is built from, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
    pub fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Development defaults (mirrors `from_env` with no env overrides).
    pub fn default() -> Self {
        Self::new(DEFAULT_BIND_ADDR, DEFAULT_BASE_URL)
    }
}

fn trim_base_url(mut base_url: String) -> String {
    while base_url.ends_with('/') {
        base_url.pop();
    }
    base_url
}

/// Errors that can occur while building a configuration.
#[derive(Debug)]
pub enum ConfigError {
    InvalidValue { field: &'static str, reason: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "invalid value for '{}': {}", field, reason)
            }
        }
    }
}

impl Error for ConfigError {}
