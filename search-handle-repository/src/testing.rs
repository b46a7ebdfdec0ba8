//! In-memory backend and connector used by the unit tests.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::config::ConnectionConfig;
use crate::errors::SearchError;
use crate::interfaces::{Connector, SearchBackend};
use crate::types::{BulkItemFailure, BulkOperation, BulkSummary};
use search_handle_shared::{GetResponse, SearchHit, SearchHits, SearchResponse, TotalHits};

#[derive(Default)]
struct MockState {
    indices: HashMap<String, BTreeMap<String, Value>>,
    index_bodies: HashMap<String, Option<Value>>,
    templates: HashMap<String, Value>,
    bulk_batches: Vec<Vec<BulkOperation>>,
    rejected_ids: HashSet<String>,
    next_id: u64,
}

/// Mock backend storing documents in memory.
///
/// Clones share state, so a test can keep one clone for inspection while
/// the connection manager owns another.
#[derive(Clone, Default)]
pub(crate) struct MockBackend {
    state: Arc<Mutex<MockState>>,
    not_acknowledging: Arc<AtomicBool>,
    failing_bulk: Arc<AtomicBool>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every administrative request with `acknowledged: false`.
    pub fn set_acknowledging(&self, acknowledging: bool) {
        self.not_acknowledging
            .store(!acknowledging, Ordering::SeqCst);
    }

    /// Fail bulk submissions at the transport level.
    pub fn set_failing_bulk(&self, failing: bool) {
        self.failing_bulk.store(failing, Ordering::SeqCst);
    }

    /// Report a per-item failure for bulk operations with this id.
    pub async fn reject_id(&self, id: &str) {
        self.state.lock().await.rejected_ids.insert(id.to_string());
    }

    /// Sizes of the bulk requests received so far.
    pub async fn bulk_batch_sizes(&self) -> Vec<usize> {
        self.state
            .lock()
            .await
            .bulk_batches
            .iter()
            .map(Vec::len)
            .collect()
    }

    /// The bulk requests received so far.
    pub async fn bulk_batches(&self) -> Vec<Vec<BulkOperation>> {
        self.state.lock().await.bulk_batches.clone()
    }

    pub async fn document(&self, index: &str, id: &str) -> Option<Value> {
        self.state
            .lock()
            .await
            .indices
            .get(index)
            .and_then(|docs| docs.get(id))
            .cloned()
    }

    pub async fn document_count(&self, index: &str) -> usize {
        self.state
            .lock()
            .await
            .indices
            .get(index)
            .map_or(0, BTreeMap::len)
    }

    /// Body an index was created with, `None` if it was never created explicitly.
    pub async fn index_body(&self, index: &str) -> Option<Option<Value>> {
        self.state.lock().await.index_bodies.get(index).cloned()
    }

    fn acknowledged(&self) -> bool {
        !self.not_acknowledging.load(Ordering::SeqCst)
    }
}

impl MockState {
    fn store(&mut self, index: &str, id: Option<&str>, document: &Value) -> String {
        let id = match id {
            Some(id) => id.to_string(),
            None => {
                self.next_id += 1;
                format!("generated-{}", self.next_id)
            }
        };
        self.indices
            .entry(index.to_string())
            .or_default()
            .insert(id.clone(), document.clone());
        id
    }
}

/// Extract `{field: value}` from `query.match` or `query.bool.must.match`.
fn match_clause(query: &Value) -> Option<(&str, &Value)> {
    let query = query.get("query")?;
    let clause = query
        .get("match")
        .or_else(|| query.get("bool")?.get("must")?.get("match"))?;
    clause.as_object()?.iter().next().map(|(k, v)| (k.as_str(), v))
}

#[async_trait]
impl SearchBackend for MockBackend {
    async fn index_document(
        &self,
        index: &str,
        id: Option<&str>,
        document: &Value,
    ) -> Result<String, SearchError> {
        Ok(self.state.lock().await.store(index, id, document))
    }

    async fn get_document(&self, index: &str, id: &str) -> Result<GetResponse, SearchError> {
        let state = self.state.lock().await;
        let source = state
            .indices
            .get(index)
            .and_then(|docs| docs.get(id))
            .cloned()
            .ok_or_else(|| SearchError::document_not_found(index, id))?;

        Ok(GetResponse {
            index: index.to_string(),
            id: id.to_string(),
            version: Some(1),
            found: true,
            source: Some(source),
        })
    }

    async fn delete_document(&self, index: &str, id: &str) -> Result<bool, SearchError> {
        let mut state = self.state.lock().await;
        Ok(state
            .indices
            .get_mut(index)
            .and_then(|docs| docs.remove(id))
            .is_some())
    }

    async fn search(&self, index: &str, query: &Value) -> Result<SearchResponse, SearchError> {
        let state = self.state.lock().await;
        let Some(docs) = state.indices.get(index) else {
            return Err(SearchError::response(404, format!("no such index [{}]", index)));
        };

        let clause = match_clause(query);
        let hits: Vec<SearchHit> = docs
            .iter()
            .filter(|(_, doc)| match clause {
                Some((field, value)) => doc.get(field) == Some(value),
                None => true,
            })
            .map(|(id, doc)| SearchHit {
                index: index.to_string(),
                id: id.clone(),
                score: Some(1.0),
                source: doc.clone(),
            })
            .collect();

        Ok(SearchResponse {
            took: 1,
            timed_out: false,
            hits: SearchHits {
                total: TotalHits::Relation {
                    value: hits.len() as u64,
                    relation: "eq".to_string(),
                },
                max_score: hits.first().and(Some(1.0)),
                hits,
            },
        })
    }

    async fn bulk(&self, operations: &[BulkOperation]) -> Result<BulkSummary, SearchError> {
        if self.failing_bulk.load(Ordering::SeqCst) {
            return Err(SearchError::transport("Mock bulk failure"));
        }

        let mut state = self.state.lock().await;
        state.bulk_batches.push(operations.to_vec());

        let mut failures = Vec::new();
        for op in operations {
            match op.id.as_deref() {
                Some(id) if state.rejected_ids.contains(id) => failures.push(BulkItemFailure {
                    id: Some(id.to_string()),
                    status: 400,
                    reason: "Mock rejection".to_string(),
                }),
                id => {
                    state.store(&op.index, id, &op.document);
                }
            }
        }

        let failed = failures.len();
        Ok(BulkSummary {
            total: operations.len(),
            succeeded: operations.len() - failed,
            failed,
            failures,
        })
    }

    async fn refresh(&self, _index: &str) -> Result<(), SearchError> {
        Ok(())
    }

    async fn index_exists(&self, index: &str) -> Result<bool, SearchError> {
        Ok(self.state.lock().await.indices.contains_key(index))
    }

    async fn create_index(&self, index: &str, body: Option<&Value>) -> Result<bool, SearchError> {
        let mut state = self.state.lock().await;
        if state.indices.contains_key(index) {
            return Err(SearchError::response(
                400,
                format!("index [{}] already exists", index),
            ));
        }
        state.indices.insert(index.to_string(), BTreeMap::new());
        state.index_bodies.insert(index.to_string(), body.cloned());
        Ok(self.acknowledged())
    }

    async fn delete_index(&self, index: &str) -> Result<bool, SearchError> {
        let removed = self.state.lock().await.indices.remove(index).is_some();
        Ok(removed && self.acknowledged())
    }

    async fn put_index_template(&self, name: &str, body: &Value) -> Result<bool, SearchError> {
        self.state
            .lock()
            .await
            .templates
            .insert(name.to_string(), body.clone());
        Ok(self.acknowledged())
    }

    async fn delete_index_template(&self, name: &str) -> Result<bool, SearchError> {
        let removed = self.state.lock().await.templates.remove(name).is_some();
        Ok(removed && self.acknowledged())
    }
}

/// Connector handing out a shared [`MockBackend`] and counting attempts.
pub(crate) struct CountingConnector {
    backend: MockBackend,
    attempts: Arc<AtomicUsize>,
    failures_left: AtomicUsize,
}

impl CountingConnector {
    pub fn new(backend: MockBackend) -> Self {
        Self {
            backend,
            attempts: Arc::new(AtomicUsize::new(0)),
            failures_left: AtomicUsize::new(0),
        }
    }

    /// Fail the first `failures` connection attempts.
    pub fn failing_first(self, failures: usize) -> Self {
        self.failures_left.store(failures, Ordering::SeqCst);
        self
    }

    pub fn attempts(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.attempts)
    }
}

#[async_trait]
impl Connector for CountingConnector {
    async fn connect(
        &self,
        _config: &ConnectionConfig,
    ) -> Result<Arc<dyn SearchBackend>, SearchError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);

        let failing = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if failing {
            return Err(SearchError::connection("Mock service unreachable"));
        }

        Ok(Arc::new(self.backend.clone()))
    }
}
