//! # Search Handle Shared
//!
//! Response types returned by the search handle. They mirror the JSON shapes
//! the search service sends back for document lookups and searches, so every
//! layer of the workspace can deserialize and inspect results the same way.

mod get;
mod search;

pub use get::GetResponse;
pub use search::{SearchHit, SearchHits, SearchResponse, TotalHits};
