//! Search backend trait definition.
//!
//! This module defines the abstract interface for the requests an index handle
//! sends to the search service, allowing different backend implementations
//! (OpenSearch, in-memory mocks for tests).

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::SearchError;
use crate::types::{BulkOperation, BulkSummary};
use search_handle_shared::{GetResponse, SearchResponse};

/// Abstract interface for search service requests.
///
/// Implementations are created once per connection manager and shared by
/// every index handle using it.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` to allow use across async tasks.
///
/// # Acknowledgment
///
/// Administrative methods return `Ok(acknowledged)`. Turning `false` into an
/// error is left to the caller.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Index a document, returning the identifier the service used.
    ///
    /// `id` of `None` asks the service to generate one.
    async fn index_document(
        &self,
        index: &str,
        id: Option<&str>,
        document: &Value,
    ) -> Result<String, SearchError>;

    /// Fetch a document by identifier.
    ///
    /// * `Err(SearchError::DocumentNotFound)` - If no such document exists
    async fn get_document(&self, index: &str, id: &str) -> Result<GetResponse, SearchError>;

    /// Delete a document by identifier, returning whether it existed.
    async fn delete_document(&self, index: &str, id: &str) -> Result<bool, SearchError>;

    /// Execute an opaque query payload against an index.
    async fn search(&self, index: &str, query: &Value) -> Result<SearchResponse, SearchError>;

    /// Submit a batch of operations as one bulk request.
    ///
    /// Per-item failures are reported in the summary, not as an error.
    async fn bulk(&self, operations: &[BulkOperation]) -> Result<BulkSummary, SearchError>;

    /// Make recent writes to an index visible to search.
    async fn refresh(&self, index: &str) -> Result<(), SearchError>;

    /// Check whether an index exists.
    async fn index_exists(&self, index: &str) -> Result<bool, SearchError>;

    /// Create an index with an optional settings/mappings body.
    async fn create_index(&self, index: &str, body: Option<&Value>) -> Result<bool, SearchError>;

    /// Delete an index.
    async fn delete_index(&self, index: &str) -> Result<bool, SearchError>;

    /// Create or replace an index template.
    async fn put_index_template(&self, name: &str, body: &Value) -> Result<bool, SearchError>;

    /// Delete an index template.
    async fn delete_index_template(&self, name: &str) -> Result<bool, SearchError>;
}
