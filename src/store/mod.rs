//!
//! # Document Store Contract
//!
//! The persistence layer is a generic document store: schema-flexible JSON
//! documents grouped into named collections, addressed by field predicates.
//! Components receive a shared `Arc<dyn DocumentStore>` at construction and
//! never reach for a process-wide handle, so each of them can be exercised in
//! isolation against a fresh engine.
//!
//! The bundled engine is [`memory::MemoryStore`]; `connect` picks an engine
//! from the configured store URL scheme. Single-document writes are atomic;
//! nothing in this application spans documents transactionally.

pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use memory::MemoryStore;

/// A single predicate inside a [`Filter`].
#[derive(Debug, Clone)]
pub enum Clause {
    /// Exact match on a field.
    Eq(String, Value),
    /// Inclusive range on a date field stored as RFC 3339 text.
    /// Documents whose field is missing, null or unparseable do not match.
    DateWithin {
        field: String,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    },
}

/// A conjunction of predicates: a document matches when every clause holds.
/// The empty filter matches everything.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    clauses: Vec<Clause>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an exact-match clause.
    pub fn eq(mut self, field: &str, value: Value) -> Self {
        self.clauses.push(Clause::Eq(field.to_owned(), value));
        self
    }

    /// Adds an inclusive date-range clause.
    pub fn date_within(mut self, field: &str, from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        self.clauses.push(Clause::DateWithin {
            field: field.to_owned(),
            from,
            to,
        });
        self
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }
}

/// Errors surfaced by a store engine. Mapped to HTTP 500 by `AppError`.
#[derive(Debug)]
pub enum StoreError {
    /// The configured store URL names an engine this build does not provide.
    UnsupportedScheme(String),
    /// A backend-level failure reported by the engine.
    Backend(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StoreError::UnsupportedScheme(url) => {
                write!(f, "unsupported store url: {}", url)
            }
            StoreError::Backend(msg) => write!(f, "store backend error: {}", msg),
        }
    }
}

/// The abstract persistence contract.
///
/// Documents are JSON objects. Filters are conjunctions of exact-match and
/// date-range predicates. `find_many` sorts ascending by the named field and
/// is stable with respect to the collection's natural (insertion) order.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Appends a document to a collection.
    async fn insert_one(&self, collection: &str, doc: Value) -> Result<(), StoreError>;

    /// Returns the first document matching the filter, in natural order.
    async fn find_one(&self, collection: &str, filter: &Filter) -> Result<Option<Value>, StoreError>;

    /// Returns all documents matching the filter, sorted ascending by `sort`
    /// when given, truncated to `limit` when given.
    async fn find_many(
        &self,
        collection: &str,
        filter: &Filter,
        sort: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<Value>, StoreError>;

    /// Merges `set` (a partial document) into the first match. Returns
    /// whether a document matched; an unmatched update mutates nothing.
    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        set: Value,
    ) -> Result<bool, StoreError>;

    /// Removes the first match. Returns whether a document matched.
    async fn delete_one(&self, collection: &str, filter: &Filter) -> Result<bool, StoreError>;

    /// Counts matching documents.
    async fn count(&self, collection: &str, filter: &Filter) -> Result<u64, StoreError>;
}

/// Opens the document store named by `url`.
///
/// `memory://` is the only scheme this build ships; anything else fails at
/// startup with `UnsupportedScheme` rather than at first use.
pub fn connect(url: &str, database: &str) -> Result<Arc<dyn DocumentStore>, StoreError> {
    match url.split("://").next() {
        Some("memory") => Ok(Arc::new(MemoryStore::new(database))),
        _ => Err(StoreError::UnsupportedScheme(url.to_owned())),
    }
}
