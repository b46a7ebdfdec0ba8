//! Error types for the search handle repository.

mod search_error;

pub use search_error::SearchError;
