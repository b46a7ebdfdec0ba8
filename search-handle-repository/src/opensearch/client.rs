//! OpenSearch backend implementation.
//!
//! This module provides the concrete implementation of `SearchBackend`
//! using the OpenSearch Rust client.

use async_trait::async_trait;
use opensearch::{
    http::{
        request::JsonBody,
        response::Response,
        transport::{SingleNodeConnectionPool, TransportBuilder},
        StatusCode,
    },
    indices::{
        IndicesCreateParts, IndicesDeleteParts, IndicesDeleteTemplateParts, IndicesExistsParts,
        IndicesPutTemplateParts, IndicesRefreshParts,
    },
    BulkParts, DeleteParts, GetParts, IndexParts, OpenSearch, SearchParts,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, error, info, instrument};
use url::Url;

use crate::config::ConnectionConfig;
use crate::errors::SearchError;
use crate::interfaces::SearchBackend;
use crate::opensearch::responses::{
    error_reason, Acknowledged, BulkResponseBody, DeletedDocument, IndexedDocument,
};
use crate::types::{BulkOperation, BulkSummary};
use search_handle_shared::{GetResponse, SearchResponse};

/// OpenSearch backend.
///
/// Wraps a single-node OpenSearch client. One instance is shared by every
/// index handle of a connection manager.
///
/// # Example
///
/// ```ignore
/// let config = ConnectionConfig::new("http://localhost:9200")
///     .with_credentials("elastic", "changeme");
/// let backend = OpenSearchBackend::new(&config)?;
/// backend.ping().await?;
///
/// let id = backend
///     .index_document("unit_test", Some("1"), &json!({ "test": "bla" }))
///     .await?;
/// ```
pub struct OpenSearchBackend {
    client: OpenSearch,
}

impl OpenSearchBackend {
    /// Create a backend for the configured endpoint.
    ///
    /// This builds the transport but sends no request.
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchBackend)` - A new backend instance
    /// * `Err(SearchError::ConnectionError)` - If the URL is invalid or the transport cannot be built
    pub fn new(config: &ConnectionConfig) -> Result<Self, SearchError> {
        let parsed_url = Url::parse(&config.url)
            .map_err(|e| SearchError::connection(format!("Invalid URL {}: {}", config.url, e)))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let mut builder = TransportBuilder::new(conn_pool).disable_proxy();

        if let Some(credentials) = &config.credentials {
            builder = builder.auth(opensearch::auth::Credentials::Basic(
                credentials.username.clone(),
                credentials.password.clone(),
            ));
        }
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        let transport = builder
            .build()
            .map_err(|e| SearchError::connection(e.to_string()))?;

        info!(
            url = %config.url,
            authenticated = config.credentials.is_some(),
            "Created OpenSearch client"
        );

        Ok(Self {
            client: OpenSearch::new(transport),
        })
    }

    /// Check that the service is reachable and accepts our credentials.
    pub async fn ping(&self) -> Result<(), SearchError> {
        let response = self
            .client
            .ping()
            .send()
            .await
            .map_err(|e| SearchError::connection(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            return Err(SearchError::connection(format!(
                "Ping failed with status {}",
                status
            )));
        }
        Ok(())
    }
}

/// Pass successful responses through, turn the others into `ResponseError`.
async fn ensure_success(response: Response) -> Result<Response, SearchError> {
    let status = response.status_code();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    error!(status = %status, body = %body, "Search request failed");
    Err(SearchError::response(status.as_u16(), error_reason(&body)))
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, SearchError> {
    response
        .json::<T>()
        .await
        .map_err(|e| SearchError::transport(format!("Failed to parse response: {}", e)))
}

async fn read_acknowledged(response: Response) -> Result<bool, SearchError> {
    let response = ensure_success(response).await?;
    let body: Acknowledged = read_json(response).await?;
    Ok(body.acknowledged)
}

#[async_trait]
impl SearchBackend for OpenSearchBackend {
    async fn index_document(
        &self,
        index: &str,
        id: Option<&str>,
        document: &Value,
    ) -> Result<String, SearchError> {
        let response = match id {
            Some(id) => {
                self.client
                    .index(IndexParts::IndexId(index, id))
                    .body(document)
                    .send()
                    .await
            }
            None => {
                self.client
                    .index(IndexParts::Index(index))
                    .body(document)
                    .send()
                    .await
            }
        }
        .map_err(|e| SearchError::transport(e.to_string()))?;

        let response = ensure_success(response).await?;
        let indexed: IndexedDocument = read_json(response).await?;

        debug!(index = %index, id = %indexed.id, "Document indexed");
        Ok(indexed.id)
    }

    async fn get_document(&self, index: &str, id: &str) -> Result<GetResponse, SearchError> {
        let response = self
            .client
            .get(GetParts::IndexId(index, id))
            .send()
            .await
            .map_err(|e| SearchError::transport(e.to_string()))?;

        if response.status_code() == StatusCode::NOT_FOUND {
            return Err(SearchError::document_not_found(index, id));
        }

        let response = ensure_success(response).await?;
        let document: GetResponse = read_json(response).await?;
        if !document.found {
            return Err(SearchError::document_not_found(index, id));
        }
        Ok(document)
    }

    async fn delete_document(&self, index: &str, id: &str) -> Result<bool, SearchError> {
        let response = self
            .client
            .delete(DeleteParts::IndexId(index, id))
            .send()
            .await
            .map_err(|e| SearchError::transport(e.to_string()))?;

        // 404 means there was nothing to delete
        if response.status_code() == StatusCode::NOT_FOUND {
            debug!(index = %index, id = %id, "Document to delete not found");
            return Ok(false);
        }

        let response = ensure_success(response).await?;
        let deleted: DeletedDocument = read_json(response).await?;

        debug!(index = %index, id = %id, found = deleted.found(), "Document deleted");
        Ok(deleted.found())
    }

    async fn search(&self, index: &str, query: &Value) -> Result<SearchResponse, SearchError> {
        let response = self
            .client
            .search(SearchParts::Index(&[index]))
            .body(query)
            .send()
            .await
            .map_err(|e| SearchError::transport(e.to_string()))?;

        let response = ensure_success(response).await?;
        read_json(response).await
    }

    #[instrument(skip(self, operations), fields(operation_count = operations.len()))]
    async fn bulk(&self, operations: &[BulkOperation]) -> Result<BulkSummary, SearchError> {
        if operations.is_empty() {
            return Ok(BulkSummary::default());
        }

        let mut body: Vec<JsonBody<Value>> = Vec::with_capacity(operations.len() * 2);
        for operation in operations {
            let [action, source] = operation.to_bulk_lines();
            body.push(action.into());
            body.push(source.into());
        }

        let response = self
            .client
            .bulk(BulkParts::None)
            .body(body)
            .send()
            .await
            .map_err(|e| SearchError::transport(e.to_string()))?;

        let response = ensure_success(response).await?;
        let result: BulkResponseBody = read_json(response).await?;
        let summary = result.summarize(operations.len());

        if summary.has_failures() {
            error!(
                total = summary.total,
                failed = summary.failed,
                "Bulk request had item failures"
            );
        } else {
            debug!(total = summary.total, "Bulk request succeeded");
        }
        Ok(summary)
    }

    async fn refresh(&self, index: &str) -> Result<(), SearchError> {
        let response = self
            .client
            .indices()
            .refresh(IndicesRefreshParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| SearchError::transport(e.to_string()))?;

        ensure_success(response).await?;
        debug!(index = %index, "Index refreshed");
        Ok(())
    }

    async fn index_exists(&self, index: &str) -> Result<bool, SearchError> {
        let response = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| SearchError::transport(e.to_string()))?;

        let status = response.status_code();
        if status == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        ensure_success(response).await?;
        Ok(true)
    }

    async fn create_index(&self, index: &str, body: Option<&Value>) -> Result<bool, SearchError> {
        let empty = json!({});
        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(index))
            .body(body.unwrap_or(&empty))
            .send()
            .await
            .map_err(|e| SearchError::transport(e.to_string()))?;

        let acknowledged = read_acknowledged(response).await?;
        info!(index = %index, acknowledged = acknowledged, "Create index");
        Ok(acknowledged)
    }

    async fn delete_index(&self, index: &str) -> Result<bool, SearchError> {
        let response = self
            .client
            .indices()
            .delete(IndicesDeleteParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| SearchError::transport(e.to_string()))?;

        if response.status_code() == StatusCode::NOT_FOUND {
            return Ok(false);
        }

        let acknowledged = read_acknowledged(response).await?;
        info!(index = %index, acknowledged = acknowledged, "Delete index");
        Ok(acknowledged)
    }

    async fn put_index_template(&self, name: &str, body: &Value) -> Result<bool, SearchError> {
        let response = self
            .client
            .indices()
            .put_template(IndicesPutTemplateParts::Name(name))
            .body(body)
            .send()
            .await
            .map_err(|e| SearchError::transport(e.to_string()))?;

        let acknowledged = read_acknowledged(response).await?;
        info!(template = %name, acknowledged = acknowledged, "Put index template");
        Ok(acknowledged)
    }

    async fn delete_index_template(&self, name: &str) -> Result<bool, SearchError> {
        let response = self
            .client
            .indices()
            .delete_template(IndicesDeleteTemplateParts::Name(name))
            .send()
            .await
            .map_err(|e| SearchError::transport(e.to_string()))?;

        if response.status_code() == StatusCode::NOT_FOUND {
            return Ok(false);
        }

        let acknowledged = read_acknowledged(response).await?;
        info!(template = %name, acknowledged = acknowledged, "Delete index template");
        Ok(acknowledged)
    }
}
