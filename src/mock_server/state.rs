//! Mock server state management.
//!
//! Provides the in-memory data store for the mock Zammad API server.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::{Map, Value};
use tokio::sync::RwLock;

/// A request as the mock server saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub on_behalf_of: Option<String>,
}

impl RecordedRequest {
    /// First value of query parameter `key`.
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Shared state for the mock server.
///
/// Records are kept per collection (`users`, `tickets`, ...) in insertion
/// order, which is also the listing order.
#[derive(Debug, Default)]
pub struct MockState {
    /// Records indexed by collection path.
    pub collections: BTreeMap<String, Vec<Value>>,

    /// Record returned by `GET /users/me`.
    pub me: Option<Value>,

    /// Every request received, oldest first.
    pub requests: Vec<RecordedRequest>,

    /// Optional authentication token. If set, requests must include this token.
    pub required_token: Option<String>,

    next_id: u64,
}

impl MockState {
    /// Create a new empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create state wrapped in Arc<RwLock> for sharing.
    pub fn shared(self) -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(self))
    }

    /// Add records to a collection. Records keep their `id`.
    pub fn with_records(mut self, collection: &str, records: Vec<Value>) -> Self {
        for record in records {
            if let Some(id) = record.get("id").and_then(Value::as_u64) {
                self.next_id = self.next_id.max(id);
            }
            self.collections
                .entry(collection.to_string())
                .or_default()
                .push(record);
        }
        self
    }

    /// Set the record served as the current user.
    pub fn with_me(mut self, me: Value) -> Self {
        self.me = Some(me);
        self
    }

    /// Set the required authentication token.
    pub fn with_required_token(mut self, token: &str) -> Self {
        self.required_token = Some(token.to_string());
        self
    }

    /// All records of a collection.
    pub fn records(&self, collection: &str) -> &[Value] {
        self.collections
            .get(collection)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Find a record by id.
    pub fn get(&self, collection: &str, id: &str) -> Option<&Value> {
        self.records(collection)
            .iter()
            .find(|r| id_matches(r, id))
    }

    /// Records containing `query` (case-insensitive) in any string attribute.
    pub fn search(&self, collection: &str, query: &str) -> Vec<Value> {
        let needle = query.to_lowercase();
        self.records(collection)
            .iter()
            .filter(|r| {
                r.as_object().is_some_and(|map| {
                    map.values()
                        .filter_map(Value::as_str)
                        .any(|s| s.to_lowercase().contains(&needle))
                })
            })
            .cloned()
            .collect()
    }

    /// Insert a record, assigning the next id.
    pub fn create(&mut self, collection: &str, mut attributes: Map<String, Value>) -> Value {
        self.next_id += 1;
        attributes.insert("id".to_string(), Value::from(self.next_id));
        let record = Value::Object(attributes);
        self.collections
            .entry(collection.to_string())
            .or_default()
            .push(record.clone());
        record
    }

    /// Merge `changes` into a record and return the result.
    pub fn update(
        &mut self,
        collection: &str,
        id: &str,
        changes: Map<String, Value>,
    ) -> Option<Value> {
        let record = self
            .collections
            .get_mut(collection)?
            .iter_mut()
            .find(|r| id_matches(r, id))?;
        if let Some(map) = record.as_object_mut() {
            for (key, value) in changes {
                if key != "id" {
                    map.insert(key, value);
                }
            }
        }
        Some(record.clone())
    }

    /// Remove a record, returning it.
    pub fn remove(&mut self, collection: &str, id: &str) -> Option<Value> {
        let records = self.collections.get_mut(collection)?;
        let index = records.iter().position(|r| id_matches(r, id))?;
        Some(records.remove(index))
    }

    /// Requests that hit `path`, oldest first.
    pub fn requests_to(&self, path: &str) -> Vec<&RecordedRequest> {
        self.requests.iter().filter(|r| r.path == path).collect()
    }
}

fn id_matches(record: &Value, id: &str) -> bool {
    match record.get("id") {
        Some(Value::Number(n)) => n.to_string() == id,
        Some(Value::String(s)) => s == id,
        _ => false,
    }
}

/// Slice one page out of `records`; pages start at 1.
pub fn paginate(records: &[Value], page: i64, per_page: usize) -> Vec<Value> {
    if page < 1 || per_page == 0 {
        return Vec::new();
    }
    let start = usize::try_from(page - 1)
        .ok()
        .and_then(|p| p.checked_mul(per_page))
        .unwrap_or(usize::MAX);
    if start >= records.len() {
        return Vec::new();
    }
    let end = (start + per_page).min(records.len());
    records[start..end].to_vec()
}
