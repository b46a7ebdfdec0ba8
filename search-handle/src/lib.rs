//! # Search Handle
//!
//! Entry point for applications using the search handle. Reads settings from
//! the environment, installs logging and wires a shared connection manager
//! from which index handles are created.

pub mod config;
pub mod telemetry;

pub use config::{Dependencies, LogFormat, LoggingConfig, Settings};
pub use search_handle_repository::{
    BulkSummary, ConnectionConfig, ConnectionManager, IndexHandle, IndexOutcome, SearchError,
};
pub use search_handle_shared::{GetResponse, SearchResponse};

use thiserror::Error;

/// Errors that can occur while setting up the search handle.
#[derive(Error, Debug)]
pub enum SetupError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Search error.
    #[error("Search error: {0}")]
    SearchError(#[from] SearchError),

    /// Logging could not be installed.
    #[error("Telemetry error: {0}")]
    TelemetryError(String),
}

impl SetupError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Create a telemetry error.
    pub fn telemetry(msg: impl Into<String>) -> Self {
        Self::TelemetryError(msg.into())
    }
}
