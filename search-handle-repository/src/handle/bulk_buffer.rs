//! Write modes and the bulk buffer.

use crate::types::BulkOperation;

/// How an index handle writes documents.
#[derive(Debug, Default)]
pub(crate) enum WriteMode {
    /// Every `index` call is sent immediately.
    #[default]
    Direct,
    /// `index` calls are queued and sent in batches.
    Buffered(BulkBuffer),
}

/// Pending index operations and the size at which they are flushed.
#[derive(Debug)]
pub(crate) struct BulkBuffer {
    pending: Vec<BulkOperation>,
    flush_threshold: usize,
}

impl BulkBuffer {
    pub fn new(flush_threshold: usize) -> Self {
        Self {
            pending: Vec::new(),
            flush_threshold,
        }
    }

    /// Queue an operation. Returns `true` once the queue has reached the
    /// flush threshold.
    pub fn push(&mut self, operation: BulkOperation) -> bool {
        self.pending.push(operation);
        self.is_full()
    }

    pub fn is_full(&self) -> bool {
        self.pending.len() >= self.flush_threshold
    }

    /// Remove and return every pending operation.
    pub fn take(&mut self) -> Vec<BulkOperation> {
        std::mem::take(&mut self.pending)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn flush_threshold(&self) -> usize {
        self.flush_threshold
    }
}
