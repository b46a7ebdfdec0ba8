//! Connector that opens OpenSearch backends.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::config::ConnectionConfig;
use crate::errors::SearchError;
use crate::interfaces::{Connector, SearchBackend};
use crate::opensearch::OpenSearchBackend;

/// Opens an [`OpenSearchBackend`] and pings the service before handing it out,
/// so an unreachable service counts as a failed connection.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenSearchConnector;

#[async_trait]
impl Connector for OpenSearchConnector {
    async fn connect(
        &self,
        config: &ConnectionConfig,
    ) -> Result<Arc<dyn SearchBackend>, SearchError> {
        info!(url = %config.url, "Opening new search connection");

        let backend = OpenSearchBackend::new(config)?;
        backend.ping().await?;

        Ok(Arc::new(backend))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_connect_sends_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/"))
            .and(header_exists("authorization"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let config = ConnectionConfig::new(server.uri()).with_credentials("elastic", "changeme");

        assert!(OpenSearchConnector.connect(&config).await.is_ok());
    }

    #[tokio::test]
    async fn test_connect_unreachable() {
        let config = ConnectionConfig::new("http://127.0.0.1:1");

        let result = OpenSearchConnector.connect(&config).await;
        assert!(matches!(result, Err(SearchError::ConnectionError(_))));
    }
}
