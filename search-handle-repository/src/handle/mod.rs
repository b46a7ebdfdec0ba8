//! Index handle implementation.
//!
//! An `IndexHandle` is bound to one index and document type and issues every
//! request through the shared connection manager. It can switch into bulk
//! mode, where `index` calls are queued and sent in batches.

mod bulk_buffer;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::OnceCell;
use tracing::{debug, error, info, instrument, warn};

use crate::connection::ConnectionManager;
use crate::errors::SearchError;
use crate::interfaces::SearchBackend;
use crate::types::{BulkOperation, BulkSummary, IndexOutcome};
use bulk_buffer::{BulkBuffer, WriteMode};
use search_handle_shared::{GetResponse, SearchResponse};

/// Handle bound to an index, document type and optional mapping.
///
/// # Example
///
/// ```ignore
/// let connection = Arc::new(ConnectionManager::new(ConnectionConfig::default()));
/// let mut handle = IndexHandle::open(connection, "unit_test", "test", None).await?;
///
/// let outcome = handle.index(&json!({ "test": "bla" }), Some("1")).await?;
/// assert_eq!(outcome.id(), Some("1"));
///
/// handle.start_bulk(500);
/// for doc in docs {
///     handle.index(&doc, None).await?;
/// }
/// handle.stop_bulk().await?;
/// ```
#[derive(Debug)]
pub struct IndexHandle {
    connection: Arc<ConnectionManager>,
    index: String,
    doc_type: String,
    mapping: Option<String>,
    auto_create: bool,
    index_checked: OnceCell<()>,
    mode: WriteMode,
}

impl IndexHandle {
    /// Create a handle. No request is sent until the first operation.
    ///
    /// An empty mapping counts as no mapping. Index auto-creation follows the
    /// connection config unless overridden with [`with_auto_create`](Self::with_auto_create).
    pub fn new(
        connection: Arc<ConnectionManager>,
        index: impl Into<String>,
        doc_type: impl Into<String>,
        mapping: Option<String>,
    ) -> Self {
        let auto_create = connection.config().auto_create_index;
        Self {
            connection,
            index: index.into(),
            doc_type: doc_type.into(),
            mapping: mapping.filter(|mapping| !mapping.is_empty()),
            auto_create,
            index_checked: OnceCell::new(),
            mode: WriteMode::Direct,
        }
    }

    /// Create a handle and make sure the shared connection is open.
    ///
    /// # Returns
    ///
    /// * `Ok(IndexHandle)` - The connected handle
    /// * `Err(SearchError)` - If the connection could not be opened
    pub async fn open(
        connection: Arc<ConnectionManager>,
        index: impl Into<String>,
        doc_type: impl Into<String>,
        mapping: Option<String>,
    ) -> Result<Self, SearchError> {
        let handle = Self::new(connection, index, doc_type, mapping);
        handle.backend().await?;
        Ok(handle)
    }

    /// Create the bound index on first use when it does not exist.
    pub fn with_auto_create(mut self, enabled: bool) -> Self {
        self.auto_create = enabled;
        self
    }

    /// Rebind the handle to another index.
    pub fn set_index(&mut self, index: impl Into<String>) {
        self.index = index.into();
        self.index_checked = OnceCell::new();
    }

    /// The bound index.
    pub fn index_name(&self) -> &str {
        &self.index
    }

    /// The bound document type.
    pub fn doc_type(&self) -> &str {
        &self.doc_type
    }

    /// The mapping used when this handle creates an index.
    pub fn mapping(&self) -> Option<&str> {
        self.mapping.as_deref()
    }

    /// The shared connection manager.
    pub fn connection(&self) -> &Arc<ConnectionManager> {
        &self.connection
    }

    /// Shared backend, after the one-time index self-check if enabled.
    async fn backend(&self) -> Result<Arc<dyn SearchBackend>, SearchError> {
        let backend = self.connection.ensure_connection().await?;
        if self.auto_create {
            self.index_checked
                .get_or_init(|| self.check_own_index(backend.as_ref()))
                .await;
        }
        Ok(backend)
    }

    /// Create the bound index if it is missing. Failures are only logged.
    async fn check_own_index(&self, backend: &dyn SearchBackend) {
        let result = match backend.index_exists(&self.index).await {
            Ok(true) => Ok(()),
            Ok(false) => {
                info!(index = %self.index, "Bound index missing, creating it");
                self.create_index_with(backend, &self.index).await
            }
            Err(e) => Err(e),
        };

        if let Err(e) = result {
            error!(index = %self.index, error = %e, "Index self-check failed");
        }
    }

    async fn create_index_with(
        &self,
        backend: &dyn SearchBackend,
        name: &str,
    ) -> Result<(), SearchError> {
        let body = self
            .mapping
            .as_deref()
            .map(serde_json::from_str::<Value>)
            .transpose()?;

        if !backend.create_index(name, body.as_ref()).await? {
            return Err(SearchError::not_acknowledged(format!(
                "search service did not acknowledge creation of index {}",
                name
            )));
        }
        Ok(())
    }

    // =========================================================================
    // Document Operations
    // =========================================================================

    /// Index a document.
    ///
    /// An `id` of `None` or `""` lets the service assign one. In bulk mode the
    /// document is queued and [`IndexOutcome::Buffered`] is returned; if the
    /// queue reaches its threshold it is flushed first, and a failed flush is
    /// returned as this call's error.
    pub async fn index<T: Serialize + ?Sized>(
        &mut self,
        document: &T,
        id: Option<&str>,
    ) -> Result<IndexOutcome, SearchError> {
        require_name("index", &self.index)?;
        let document = serde_json::to_value(document)?;
        let id = id.filter(|id| !id.is_empty());

        if let WriteMode::Buffered(buffer) = &mut self.mode {
            let flush_due = buffer.push(BulkOperation::index(&self.index, id, document));
            if flush_due {
                self.flush().await?;
            }
            return Ok(IndexOutcome::Buffered);
        }

        let backend = self.backend().await?;
        let id = backend.index_document(&self.index, id, &document).await?;

        debug!(index = %self.index, doc_type = %self.doc_type, id = %id, "Indexed document");
        Ok(IndexOutcome::Indexed { id })
    }

    /// Fetch a document by identifier.
    ///
    /// * `Err(SearchError::DocumentNotFound)` - If no such document exists
    pub async fn get(&self, id: &str) -> Result<GetResponse, SearchError> {
        require_name("index", &self.index)?;
        let backend = self.backend().await?;
        backend.get_document(&self.index, id).await
    }

    /// Fetch a document and deserialize its source.
    pub async fn get_as<T: DeserializeOwned>(&self, id: &str) -> Result<T, SearchError> {
        let document = self.get(id).await?;
        Ok(document.source_as()?)
    }

    /// Delete a document, returning whether it existed.
    pub async fn delete(&self, id: &str) -> Result<bool, SearchError> {
        require_name("index", &self.index)?;
        let backend = self.backend().await?;
        backend.delete_document(&self.index, id).await
    }

    /// Run a query against the bound index.
    ///
    /// The payload is passed through as is, in the service's query language.
    pub async fn search<Q: Serialize + ?Sized>(
        &self,
        query: &Q,
    ) -> Result<SearchResponse, SearchError> {
        require_name("index", &self.index)?;
        let query = serde_json::to_value(query)?;
        let backend = self.backend().await?;
        backend.search(&self.index, &query).await
    }

    /// Run a query given as JSON text.
    pub async fn search_raw(&self, query: &str) -> Result<SearchResponse, SearchError> {
        let query: Value = serde_json::from_str(query)?;
        self.search(&query).await
    }

    /// Make recent writes to the bound index visible to search.
    pub async fn refresh(&self) -> Result<(), SearchError> {
        require_name("index", &self.index)?;
        let backend = self.backend().await?;
        backend.refresh(&self.index).await
    }

    // =========================================================================
    // Index and Template Administration
    // =========================================================================

    /// Check whether an index exists.
    pub async fn index_exists(&self, name: &str) -> Result<bool, SearchError> {
        require_name("index", name)?;
        let backend = self.backend().await?;
        backend.index_exists(name).await
    }

    /// Create an index, using this handle's mapping as its body.
    ///
    /// * `Err(SearchError::NotAcknowledged)` - If the service did not confirm the creation
    pub async fn create_index(&self, name: &str) -> Result<(), SearchError> {
        require_name("index", name)?;
        let backend = self.backend().await?;
        self.create_index_with(backend.as_ref(), name).await
    }

    /// Delete an index.
    ///
    /// * `Err(SearchError::NotAcknowledged)` - If the service did not confirm the deletion
    pub async fn delete_index(&self, name: &str) -> Result<(), SearchError> {
        require_name("index", name)?;
        let backend = self.backend().await?;
        if !backend.delete_index(name).await? {
            return Err(SearchError::not_acknowledged(format!(
                "search service did not acknowledge deletion of index {}",
                name
            )));
        }
        Ok(())
    }

    /// Create or replace an index template from its JSON body.
    ///
    /// * `Err(SearchError::NotAcknowledged)` - If the service did not confirm the change
    pub async fn put_index_template(&self, name: &str, body: &str) -> Result<(), SearchError> {
        require_name("template", name)?;
        let body: Value = serde_json::from_str(body)?;
        let backend = self.backend().await?;
        if !backend.put_index_template(name, &body).await? {
            return Err(SearchError::not_acknowledged(format!(
                "search service did not acknowledge creation of template {}",
                name
            )));
        }
        Ok(())
    }

    /// Delete an index template.
    ///
    /// * `Err(SearchError::NotAcknowledged)` - If the service did not confirm the deletion,
    ///   including when the template does not exist
    pub async fn delete_index_template(&self, name: &str) -> Result<(), SearchError> {
        require_name("template", name)?;
        let backend = self.backend().await?;
        if !backend.delete_index_template(name).await? {
            return Err(SearchError::not_acknowledged(format!(
                "search service did not acknowledge deletion of template {}",
                name
            )));
        }
        Ok(())
    }

    // =========================================================================
    // Bulk Mode
    // =========================================================================

    /// Switch to bulk mode. The buffer is flushed whenever it holds
    /// `flush_threshold` operations.
    ///
    /// Operations still queued from an earlier bulk session are discarded.
    pub fn start_bulk(&mut self, flush_threshold: usize) {
        if let WriteMode::Buffered(buffer) = &self.mode {
            if !buffer.is_empty() {
                warn!(
                    index = %self.index,
                    discarded = buffer.len(),
                    "Restarting bulk mode, discarding queued operations"
                );
            }
        }
        debug!(index = %self.index, flush_threshold = flush_threshold, "Starting bulk mode");
        self.mode = WriteMode::Buffered(BulkBuffer::new(flush_threshold));
    }

    /// Flush the buffer and return to direct mode.
    ///
    /// The handle is back in direct mode even if the flush fails. Calling
    /// this outside bulk mode does nothing.
    pub async fn stop_bulk(&mut self) -> Result<BulkSummary, SearchError> {
        if matches!(self.mode, WriteMode::Direct) {
            debug!(index = %self.index, "stop_bulk called outside bulk mode");
            return Ok(BulkSummary::default());
        }

        let result = self.flush().await;
        self.mode = WriteMode::Direct;
        result
    }

    /// Send every queued operation as one bulk request.
    ///
    /// The queue is emptied before connecting, so a failed batch is dropped,
    /// not retried. Per-item failures are returned as
    /// [`SearchError::BulkOperationError`].
    #[instrument(skip(self), fields(index = %self.index))]
    pub async fn flush(&mut self) -> Result<BulkSummary, SearchError> {
        match &self.mode {
            WriteMode::Buffered(buffer) if !buffer.is_empty() => {}
            _ => return Ok(BulkSummary::default()),
        }

        let operations = match &mut self.mode {
            WriteMode::Buffered(buffer) => buffer.take(),
            WriteMode::Direct => Vec::new(),
        };
        let backend = self.backend().await?;

        info!(count = operations.len(), "Flushing bulk buffer");
        let summary = backend.bulk(&operations).await?;

        if summary.has_failures() {
            return Err(SearchError::BulkOperationError {
                total: summary.total,
                failed: summary.failed,
                failures: summary.failures,
            });
        }
        Ok(summary)
    }

    /// Whether the handle is in bulk mode.
    pub fn is_buffering(&self) -> bool {
        matches!(self.mode, WriteMode::Buffered(_))
    }

    /// Number of queued operations; zero outside bulk mode.
    pub fn pending_operations(&self) -> usize {
        match &self.mode {
            WriteMode::Buffered(buffer) => buffer.len(),
            WriteMode::Direct => 0,
        }
    }

    /// The flush threshold, if in bulk mode.
    pub fn flush_threshold(&self) -> Option<usize> {
        match &self.mode {
            WriteMode::Buffered(buffer) => Some(buffer.flush_threshold()),
            WriteMode::Direct => None,
        }
    }
}

fn require_name(kind: &str, name: &str) -> Result<(), SearchError> {
    if name.trim().is_empty() {
        return Err(SearchError::validation(format!("{} name must not be empty", kind)));
    }
    Ok(())
}
