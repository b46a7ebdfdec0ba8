//! # Search Handle Repository
//!
//! Connection management and index handles for an Elasticsearch-compatible
//! search service. A single [`ConnectionManager`] is shared by every
//! [`IndexHandle`]; each handle works against one index and can buffer its
//! writes into bulk requests.

pub mod config;
pub mod connection;
pub mod errors;
pub mod handle;
pub mod interfaces;
pub mod opensearch;
pub mod types;

#[cfg(test)]
mod testing;

pub use config::{ConnectionConfig, Credentials, DEFAULT_URL};
pub use connection::ConnectionManager;
pub use errors::SearchError;
pub use handle::IndexHandle;
pub use interfaces::{Connector, SearchBackend};
pub use opensearch::{OpenSearchBackend, OpenSearchConnector};
pub use types::{BulkItemFailure, BulkOperation, BulkSummary, IndexOutcome};

pub use search_handle_shared::{GetResponse, SearchHit, SearchHits, SearchResponse, TotalHits};
