//! Configuration for the search handle.

mod dependencies;
mod settings;

pub use dependencies::Dependencies;
pub use settings::{LogFormat, LoggingConfig, Settings};
