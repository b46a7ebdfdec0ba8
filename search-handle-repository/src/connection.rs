//! Shared connection manager.
//!
//! One `ConnectionManager` owns the backend every index handle talks through.
//! The backend is created lazily on first use and reused afterwards.

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{error, info};

use crate::config::ConnectionConfig;
use crate::errors::SearchError;
use crate::interfaces::{Connector, SearchBackend};
use crate::opensearch::OpenSearchConnector;

/// Lazily opens and caches the shared search backend.
///
/// Wrap it in an `Arc` and pass it to every [`IndexHandle`](crate::IndexHandle)
/// that should share the connection.
///
/// Concurrent first calls to [`ensure_connection`](Self::ensure_connection) are
/// serialized: only one connection attempt runs at a time and the first
/// success is kept. A failed attempt caches nothing, so the next call retries.
pub struct ConnectionManager {
    config: ConnectionConfig,
    connector: Box<dyn Connector>,
    backend: OnceCell<Arc<dyn SearchBackend>>,
}

impl ConnectionManager {
    /// Create a manager that connects to OpenSearch.
    pub fn new(config: ConnectionConfig) -> Self {
        Self::with_connector(config, Box::new(OpenSearchConnector))
    }

    /// Create a manager with a custom connector.
    pub fn with_connector(config: ConnectionConfig, connector: Box<dyn Connector>) -> Self {
        Self {
            config,
            connector,
            backend: OnceCell::new(),
        }
    }

    /// Return the shared backend, connecting first if needed.
    ///
    /// # Returns
    ///
    /// * `Ok(backend)` - The shared backend
    /// * `Err(SearchError)` - If connecting failed; the next call tries again
    pub async fn ensure_connection(&self) -> Result<Arc<dyn SearchBackend>, SearchError> {
        let backend = self
            .backend
            .get_or_try_init(|| async {
                match self.connector.connect(&self.config).await {
                    Ok(backend) => {
                        info!(url = %self.config.url, "Search connection established");
                        Ok(backend)
                    }
                    Err(e) => {
                        error!(url = %self.config.url, error = %e, "Failed to open search connection");
                        Err(e)
                    }
                }
            })
            .await?;

        Ok(Arc::clone(backend))
    }

    /// Whether the shared backend has been created.
    pub fn is_connected(&self) -> bool {
        self.backend.initialized()
    }

    /// The connection configuration.
    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }
}

impl std::fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("url", &self.config.url)
            .field("connected", &self.is_connected())
            .finish()
    }
}
