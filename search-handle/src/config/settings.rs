//! Settings read from environment variables.

use std::env;
use std::time::Duration;

use search_handle_repository::{ConnectionConfig, DEFAULT_URL};

use crate::SetupError;

/// Default log filter. Informational output is dropped; warnings and errors
/// go to standard error.
const DEFAULT_LOG_FILTER: &str = "warn";

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// `EnvFilter` directives, e.g. `warn,search_handle_repository=debug`.
    pub filter: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_string(),
            format: LogFormat::Text,
        }
    }
}

/// All settings needed to wire the search handle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub connection: ConnectionConfig,
    pub logging: LoggingConfig,
}

impl Settings {
    /// Read settings from the process environment.
    ///
    /// # Environment Variables
    ///
    /// - `SEARCH_URL`: Search service URL (default: http://127.0.0.1:9200)
    /// - `SEARCH_USERNAME` / `SEARCH_PASSWORD`: Basic auth, both or neither
    /// - `SEARCH_REQUEST_TIMEOUT_SECS`: Per-request timeout in seconds
    /// - `SEARCH_AUTO_CREATE_INDEX`: Create bound indices on first use (default: false)
    /// - `SEARCH_LOG_FILTER`: Log filter directives (default: warn)
    /// - `SEARCH_LOG_FORMAT`: `text` or `json` (default: text)
    pub fn from_env() -> Result<Self, SetupError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read settings through a lookup function. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SetupError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let url = var("SEARCH_URL").unwrap_or_else(|| DEFAULT_URL.to_string());
        let mut connection = ConnectionConfig::new(url);

        match (var("SEARCH_USERNAME"), var("SEARCH_PASSWORD")) {
            (Some(username), Some(password)) => {
                connection = connection.with_credentials(username, password);
            }
            (None, None) => {}
            _ => {
                return Err(SetupError::config(
                    "SEARCH_USERNAME and SEARCH_PASSWORD must be set together",
                ))
            }
        }

        if let Some(timeout) = var("SEARCH_REQUEST_TIMEOUT_SECS") {
            let secs: u64 = timeout.trim().parse().map_err(|_| {
                SetupError::config(format!(
                    "SEARCH_REQUEST_TIMEOUT_SECS must be a whole number of seconds, got '{}'",
                    timeout
                ))
            })?;
            connection = connection.with_request_timeout(Duration::from_secs(secs));
        }

        if let Some(flag) = var("SEARCH_AUTO_CREATE_INDEX") {
            connection = connection.with_auto_create_index(parse_bool("SEARCH_AUTO_CREATE_INDEX", &flag)?);
        }

        let logging = LoggingConfig {
            filter: var("SEARCH_LOG_FILTER").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
            format: match var("SEARCH_LOG_FORMAT") {
                Some(format) => parse_log_format(&format)?,
                None => LogFormat::Text,
            },
        };

        Ok(Self { connection, logging })
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, SetupError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(SetupError::config(format!(
            "{} must be true or false, got '{}'",
            key, value
        ))),
    }
}

fn parse_log_format(value: &str) -> Result<LogFormat, SetupError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "text" => Ok(LogFormat::Text),
        "json" => Ok(LogFormat::Json),
        _ => Err(SetupError::config(format!(
            "SEARCH_LOG_FORMAT must be text or json, got '{}'",
            value
        ))),
    }
}
