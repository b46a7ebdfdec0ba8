//! OpenSearch implementation of the search backend.
//!
//! This module provides the concrete implementation of `SearchBackend`
//! and the `Connector` that opens it.

mod client;
mod connector;
mod responses;

pub use client::OpenSearchBackend;
pub use connector::OpenSearchConnector;
