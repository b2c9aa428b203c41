//! Record store interfaces.
//!
//! The persistent store is an external collaborator. The engine talks to it
//! through two async traits: [`EntityStore`] for tenant-scoped business
//! record collections, and [`ReportStore`] for report definitions and
//! execution audit rows. [`MemoryStore`] implements both in memory and
//! backs the test suite.

pub mod memory;
pub mod query;

pub use memory::MemoryStore;
pub use query::{Predicate, RecordQuery, SortSpec};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use thiserror::Error;

use crate::model::{ReportDefinition, ReportExecution};

/// A business record: a JSON object keyed by field name.
pub type Record = serde_json::Map<String, Value>;

/// Build a [`Record`] from a `json!` object literal.
pub fn record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        other => panic!("record literal must be a JSON object, got {other}"),
    }
}

/// A field's string value, if present and a string.
pub fn str_field<'a>(record: &'a Record, field: &str) -> Option<&'a str> {
    record.get(field).and_then(Value::as_str)
}

/// A field's numeric value, if present and a number.
pub fn num_field(record: &Record, field: &str) -> Option<f64> {
    record.get(field).and_then(Value::as_f64)
}

/// Rows plus the exact pre-limit match count.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchResult {
    pub rows: Vec<Record>,
    pub total_count: u64,
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from the backing record store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The named collection does not exist.
    #[error("unknown collection: {0}")]
    UnknownCollection(String),

    /// A query failed (network, permission, malformed predicate).
    #[error("query failed: {0}")]
    QueryFailed(String),

    /// A write failed.
    #[error("write failed: {0}")]
    WriteFailed(String),

    /// A record could not be encoded or decoded.
    #[error("malformed record: {0}")]
    MalformedRecord(#[from] serde_json::Error),
}

/// Tenant-scoped access to business record collections.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Execute a query against one collection, returning matching rows and
    /// an exact match count.
    async fn fetch(&self, collection: &str, query: &RecordQuery) -> StoreResult<FetchResult>;
}

/// Persistence for report definitions and execution audit rows.
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Fetch a definition by id, scoped to the tenant. `None` when absent
    /// or owned by another tenant.
    async fn definition(
        &self,
        tenant_id: &str,
        report_id: &str,
    ) -> StoreResult<Option<ReportDefinition>>;

    /// Append one execution audit row.
    async fn record_execution(&self, execution: &ReportExecution) -> StoreResult<()>;

    /// Update a definition's `last_run_at`.
    async fn touch_last_run(
        &self,
        tenant_id: &str,
        report_id: &str,
        at: DateTime<Utc>,
    ) -> StoreResult<()>;
}
