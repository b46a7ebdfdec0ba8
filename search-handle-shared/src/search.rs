//! Search response types.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Parsed response of a search request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Time the service spent on the query, in milliseconds.
    #[serde(default)]
    pub took: u64,
    /// Whether the query timed out on the service side.
    #[serde(default)]
    pub timed_out: bool,
    /// The matching hits.
    pub hits: SearchHits,
}

impl SearchResponse {
    /// Total number of documents matching the query.
    ///
    /// This may be larger than the number of returned hits.
    pub fn total_hits(&self) -> u64 {
        self.hits.total.value()
    }

    /// Deserialize the source of every returned hit into `T`.
    pub fn documents<T: DeserializeOwned>(&self) -> Result<Vec<T>, serde_json::Error> {
        self.hits
            .hits
            .iter()
            .map(|hit| T::deserialize(&hit.source))
            .collect()
    }
}

/// The `hits` section of a search response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHits {
    /// Total matching documents.
    pub total: TotalHits,
    /// Highest score among the hits.
    #[serde(default)]
    pub max_score: Option<f64>,
    /// The returned page of hits.
    #[serde(default)]
    pub hits: Vec<SearchHit>,
}

/// Total hit count.
///
/// Older protocol versions send a bare integer, newer ones an object with a
/// relation (`eq` or `gte`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TotalHits {
    /// Legacy integer form.
    Count(u64),
    /// Object form.
    Relation {
        /// Number of hits.
        value: u64,
        /// `eq` when exact, `gte` when the count is a lower bound.
        relation: String,
    },
}

impl TotalHits {
    /// The hit count regardless of representation.
    pub fn value(&self) -> u64 {
        match self {
            TotalHits::Count(count) => *count,
            TotalHits::Relation { value, .. } => *value,
        }
    }
}

/// A single search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Index the hit came from.
    #[serde(rename = "_index")]
    pub index: String,
    /// Document identifier.
    #[serde(rename = "_id")]
    pub id: String,
    /// Relevance score.
    #[serde(rename = "_score", default)]
    pub score: Option<f64>,
    /// The stored document body.
    #[serde(rename = "_source", default)]
    pub source: Value,
}
