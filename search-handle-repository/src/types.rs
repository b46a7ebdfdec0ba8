//! Request and result types for index handle operations.

use serde_json::{json, Value};

/// Outcome of an `index` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexOutcome {
    /// The document was written; `id` is the identifier the service used.
    Indexed { id: String },
    /// The handle is in bulk mode and the write was queued. Its result is
    /// only observable when the buffer is flushed.
    Buffered,
}

impl IndexOutcome {
    /// The assigned identifier, if the document was written immediately.
    pub fn id(&self) -> Option<&str> {
        match self {
            IndexOutcome::Indexed { id } => Some(id),
            IndexOutcome::Buffered => None,
        }
    }
}

/// A single index operation waiting in a bulk buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkOperation {
    /// Target index.
    pub index: String,
    /// Requested identifier; `None` lets the service assign one.
    pub id: Option<String>,
    /// Document body.
    pub document: Value,
}

impl BulkOperation {
    /// Create an index operation. An empty identifier counts as absent.
    pub fn index(index: impl Into<String>, id: Option<&str>, document: Value) -> Self {
        Self {
            index: index.into(),
            id: id.filter(|id| !id.is_empty()).map(str::to_string),
            document,
        }
    }

    /// Convert to the action and source lines of a bulk request body.
    pub fn to_bulk_lines(&self) -> [Value; 2] {
        let action = match &self.id {
            Some(id) => json!({ "index": { "_index": self.index, "_id": id } }),
            None => json!({ "index": { "_index": self.index } }),
        };
        [action, self.document.clone()]
    }
}

/// A bulk item the service rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkItemFailure {
    /// Identifier of the failed document, when known.
    pub id: Option<String>,
    /// HTTP status reported for the item.
    pub status: u16,
    /// Failure reason.
    pub reason: String,
}

/// Summary of a submitted bulk request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkSummary {
    /// Number of operations in the batch.
    pub total: usize,
    /// Number of operations the service applied.
    pub succeeded: usize,
    /// Number of operations the service rejected.
    pub failed: usize,
    /// Details for each rejected operation.
    pub failures: Vec<BulkItemFailure>,
}

impl BulkSummary {
    /// Summary for a batch where every operation succeeded.
    pub fn all_succeeded(total: usize) -> Self {
        Self {
            total,
            succeeded: total,
            failed: 0,
            failures: Vec::new(),
        }
    }

    /// Whether any operation in the batch failed.
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}
