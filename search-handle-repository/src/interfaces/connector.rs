//! Connector trait definition.

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::ConnectionConfig;
use crate::errors::SearchError;
use crate::interfaces::SearchBackend;

/// Builds a backend for a connection config.
///
/// The connection manager calls this lazily, at most once per successful
/// connection. A failed attempt is not cached and will be retried.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Open a connection to the configured endpoint.
    async fn connect(&self, config: &ConnectionConfig)
        -> Result<Arc<dyn SearchBackend>, SearchError>;
}
