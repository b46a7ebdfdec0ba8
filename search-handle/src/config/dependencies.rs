//! Dependency initialization and wiring for the search handle.

use std::sync::Arc;

use dotenv::dotenv;
use tracing::info;

use super::Settings;
use crate::SetupError;
use search_handle_repository::{ConnectionManager, IndexHandle};

/// Container for the shared connection and the settings it was built from.
pub struct Dependencies {
    /// Settings read at startup.
    pub settings: Settings,
    /// Connection shared by every handle created from these dependencies.
    pub connection: Arc<ConnectionManager>,
}

impl Dependencies {
    /// Initialize dependencies from environment variables, loading `.env`
    /// first if present.
    ///
    /// See [`Settings::from_env`] for the variables read.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(SetupError)` - If the settings are invalid or the service is unreachable
    pub async fn new() -> Result<Self, SetupError> {
        dotenv().ok();
        let settings = Settings::from_env()?;
        Self::from_settings(settings).await
    }

    /// Initialize dependencies from explicit settings and verify the
    /// connection.
    pub async fn from_settings(settings: Settings) -> Result<Self, SetupError> {
        info!(
            search_url = %settings.connection.url,
            authenticated = settings.connection.credentials.is_some(),
            auto_create_index = settings.connection.auto_create_index,
            "Initializing dependencies"
        );

        let connection = Arc::new(ConnectionManager::new(settings.connection.clone()));
        connection.ensure_connection().await?;

        info!("Search connection verified");

        Ok(Self {
            settings,
            connection,
        })
    }

    /// Create an index handle sharing this connection.
    pub fn handle(
        &self,
        index: impl Into<String>,
        doc_type: impl Into<String>,
        mapping: Option<String>,
    ) -> IndexHandle {
        IndexHandle::new(Arc::clone(&self.connection), index, doc_type, mapping)
    }
}
