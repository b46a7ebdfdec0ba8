//! Log subscriber setup.

use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, LoggingConfig};
use crate::SetupError;

/// Install the global `tracing` subscriber.
///
/// Events are written to standard error. `RUST_LOG` takes precedence over the
/// configured filter when set.
///
/// # Returns
///
/// * `Ok(())` - The subscriber was installed
/// * `Err(SetupError)` - If the filter is invalid or a subscriber is already installed
pub fn init_tracing(config: &LoggingConfig) -> Result<(), SetupError> {
    let filter = build_filter(config)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let result = match config.format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    result.map_err(|e| SetupError::telemetry(e.to_string()))
}

fn build_filter(config: &LoggingConfig) -> Result<EnvFilter, SetupError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.filter).map_err(|e| {
            SetupError::config(format!("Invalid log filter '{}': {}", config.filter, e))
        }),
    }
}
