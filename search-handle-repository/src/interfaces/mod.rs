//! Interface definitions for the search backend.
//!
//! This module defines the abstract traits that allow for dependency injection
//! and swappable search backend implementations.

mod connector;
mod search_backend;

pub use connector::Connector;
pub use search_backend::SearchBackend;
