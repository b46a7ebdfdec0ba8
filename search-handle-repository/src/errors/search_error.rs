//! Search error types.
//!
//! This module defines the errors that can occur while talking to the search
//! service through an index handle.

use thiserror::Error;

use crate::types::BulkItemFailure;

/// Errors that can occur during search service operations.
#[derive(Debug, Clone, Error)]
pub enum SearchError {
    /// Failed to establish the shared connection.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The request could not be sent or its response could not be read.
    #[error("Transport error: {0}")]
    TransportError(String),

    /// The service answered with a non-success status.
    #[error("Request failed with status {status}: {reason}")]
    ResponseError { status: u16, reason: String },

    /// Document not found.
    #[error("Document not found: index={index}, id={id}")]
    DocumentNotFound { index: String, id: String },

    /// The service responded without confirming an administrative change.
    #[error("Not acknowledged: {0}")]
    NotAcknowledged(String),

    /// A bulk request reported per-item failures.
    #[error("Bulk operation error: {failed} of {total} operations failed")]
    BulkOperationError {
        total: usize,
        failed: usize,
        failures: Vec<BulkItemFailure>,
    },

    /// A document, query or body could not be converted to or from JSON.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Invalid configuration or input.
    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl SearchError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a transport error.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::TransportError(msg.into())
    }

    /// Create a response error from a status code and reason.
    pub fn response(status: u16, reason: impl Into<String>) -> Self {
        Self::ResponseError {
            status,
            reason: reason.into(),
        }
    }

    /// Create a document not found error.
    pub fn document_not_found(index: &str, id: &str) -> Self {
        Self::DocumentNotFound {
            index: index.to_string(),
            id: id.to_string(),
        }
    }

    /// Create a not acknowledged error.
    pub fn not_acknowledged(msg: impl Into<String>) -> Self {
        Self::NotAcknowledged(msg.into())
    }

    /// Create a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::SerializationError(msg.into())
    }

    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Whether this error means the requested document does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::DocumentNotFound { .. })
    }
}

impl From<serde_json::Error> for SearchError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}
