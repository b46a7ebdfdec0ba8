//! Response bodies returned by the OpenSearch API.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

use crate::types::{BulkItemFailure, BulkSummary};

/// Body of an index document response.
#[derive(Debug, Deserialize)]
pub(crate) struct IndexedDocument {
    #[serde(rename = "_id")]
    pub id: String,
}

/// Body of a delete document response.
#[derive(Debug, Deserialize)]
pub(crate) struct DeletedDocument {
    #[serde(default)]
    pub result: String,
}

impl DeletedDocument {
    pub fn found(&self) -> bool {
        self.result == "deleted"
    }
}

/// Body of an administrative response.
#[derive(Debug, Deserialize)]
pub(crate) struct Acknowledged {
    #[serde(default)]
    pub acknowledged: bool,
}

/// Body of a bulk response.
#[derive(Debug, Deserialize)]
pub(crate) struct BulkResponseBody {
    #[serde(default)]
    pub errors: bool,
    #[serde(default)]
    pub items: Vec<HashMap<String, BulkItemStatus>>,
}

/// Per-item status inside a bulk response, keyed by action name.
#[derive(Debug, Deserialize)]
pub(crate) struct BulkItemStatus {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub status: u16,
    #[serde(default)]
    pub error: Option<BulkItemError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BulkItemError {
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

impl BulkResponseBody {
    /// Summarize the response of a batch of `total` operations.
    pub fn summarize(self, total: usize) -> BulkSummary {
        if !self.errors {
            return BulkSummary::all_succeeded(total);
        }

        let failures: Vec<BulkItemFailure> = self
            .items
            .into_iter()
            .flat_map(|item| item.into_values())
            .filter_map(|status| {
                let error = status.error?;
                let reason = error
                    .reason
                    .or(error.error_type)
                    .unwrap_or_else(|| "Unknown error".to_string());
                Some(BulkItemFailure {
                    id: status.id,
                    status: status.status,
                    reason,
                })
            })
            .collect();

        let failed = failures.len();
        BulkSummary {
            total,
            succeeded: total.saturating_sub(failed),
            failed,
            failures,
        }
    }
}

/// Extract a readable reason from an error response body.
pub(crate) fn error_reason(body: &str) -> String {
    let reason = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| match value.get("error") {
            Some(Value::Object(error)) => error
                .get("reason")
                .and_then(Value::as_str)
                .map(str::to_string),
            Some(Value::String(error)) => Some(error.clone()),
            _ => None,
        });

    match reason {
        Some(reason) => reason,
        None if body.is_empty() => "empty response body".to_string(),
        None => body.to_string(),
    }
}
