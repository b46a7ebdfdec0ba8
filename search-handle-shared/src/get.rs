//! Single-document lookup response.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result of fetching one document by identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetResponse {
    /// Index the document was read from.
    #[serde(rename = "_index")]
    pub index: String,
    /// Document identifier.
    #[serde(rename = "_id")]
    pub id: String,
    /// Document version, when the service reports one.
    #[serde(rename = "_version", default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    /// Whether the document exists.
    #[serde(default)]
    pub found: bool,
    /// The stored document body.
    #[serde(rename = "_source", default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Value>,
}

impl GetResponse {
    /// Deserialize the stored document into `T`.
    ///
    /// A response without a source deserializes from `null`.
    pub fn source_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        match &self.source {
            Some(source) => T::deserialize(source),
            None => T::deserialize(&Value::Null),
        }
    }
}
