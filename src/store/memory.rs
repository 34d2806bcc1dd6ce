//!
//! # In-Memory Store Engine
//!
//! Collections are vectors of JSON documents guarded by one async `RwLock`;
//! insertion order is the collection's natural order. This is the engine a
//! single-process deployment runs on and the one every test uses, which keeps
//! the suite hermetic. A networked engine would implement `DocumentStore`
//! beside this one without touching the components built on the contract.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{Clause, DocumentStore, Filter, StoreError};

pub struct MemoryStore {
    database: String,
    collections: RwLock<HashMap<String, Vec<Value>>>,
}

impl MemoryStore {
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            collections: RwLock::new(HashMap::new()),
        }
    }

    /// Logical database name this engine was opened with.
    pub fn database(&self) -> &str {
        &self.database
    }
}

fn matches(doc: &Value, filter: &Filter) -> bool {
    filter.clauses().iter().all(|clause| match clause {
        Clause::Eq(field, expected) => doc.get(field) == Some(expected),
        Clause::DateWithin { field, from, to } => doc
            .get(field)
            .and_then(Value::as_str)
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|t| {
                let t = t.with_timezone(&Utc);
                *from <= t && t <= *to
            })
            .unwrap_or(false),
    })
}

/// Total order over JSON values for sorting: null < bool < number < string.
/// Strings that both parse as RFC 3339 dates compare as instants, so date
/// fields order chronologically regardless of subsecond precision. Values of
/// other or mismatched kinds compare equal, which keeps the sort stable and
/// the natural order intact for them.
fn compare(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(v: Option<&Value>) -> u8 {
        match v {
            None | Some(Value::Null) => 0,
            Some(Value::Bool(_)) => 1,
            Some(Value::Number(_)) => 2,
            Some(Value::String(_)) => 3,
            Some(Value::Array(_)) => 4,
            Some(Value::Object(_)) => 5,
        }
    }
    match (a, b) {
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => {
            match (
                DateTime::parse_from_rfc3339(x),
                DateTime::parse_from_rfc3339(y),
            ) {
                (Ok(tx), Ok(ty)) => tx.cmp(&ty),
                _ => x.cmp(y),
            }
        }
        _ => rank(a).cmp(&rank(b)),
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert_one(&self, collection: &str, doc: Value) -> Result<(), StoreError> {
        let mut map = self.collections.write().await;
        map.entry(collection.to_owned()).or_default().push(doc);
        Ok(())
    }

    async fn find_one(&self, collection: &str, filter: &Filter) -> Result<Option<Value>, StoreError> {
        let map = self.collections.read().await;
        Ok(map
            .get(collection)
            .and_then(|docs| docs.iter().find(|doc| matches(doc, filter)).cloned()))
    }

    async fn find_many(
        &self,
        collection: &str,
        filter: &Filter,
        sort: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<Value>, StoreError> {
        let map = self.collections.read().await;
        let mut docs: Vec<Value> = map
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| matches(doc, filter))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        drop(map);

        if let Some(field) = sort {
            // Vec::sort_by is stable: ties keep insertion order.
            docs.sort_by(|a, b| compare(a.get(field), b.get(field)));
        }
        if let Some(limit) = limit {
            docs.truncate(limit);
        }
        Ok(docs)
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        set: Value,
    ) -> Result<bool, StoreError> {
        let mut map = self.collections.write().await;
        let docs = match map.get_mut(collection) {
            Some(docs) => docs,
            None => return Ok(false),
        };
        match docs.iter_mut().find(|doc| matches(doc, filter)) {
            Some(doc) => {
                if let (Some(target), Some(fields)) = (doc.as_object_mut(), set.as_object()) {
                    for (key, value) in fields {
                        target.insert(key.clone(), value.clone());
                    }
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_one(&self, collection: &str, filter: &Filter) -> Result<bool, StoreError> {
        let mut map = self.collections.write().await;
        let docs = match map.get_mut(collection) {
            Some(docs) => docs,
            None => return Ok(false),
        };
        match docs.iter().position(|doc| matches(doc, filter)) {
            Some(idx) => {
                docs.remove(idx);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn count(&self, collection: &str, filter: &Filter) -> Result<u64, StoreError> {
        let map = self.collections.read().await;
        Ok(map
            .get(collection)
            .map(|docs| docs.iter().filter(|doc| matches(doc, filter)).count() as u64)
            .unwrap_or(0))
    }
}
