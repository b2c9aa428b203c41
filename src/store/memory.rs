//! In-memory store.
//!
//! Backs the test suite and embedders that need a self-contained store.
//! Collections are plain vectors of records; predicate evaluation uses the
//! reference semantics on [`Predicate`](super::Predicate).

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::RwLock;

use super::query::{value_cmp, RecordQuery};
use super::{EntityStore, FetchResult, Record, ReportStore, StoreError, StoreResult};
use crate::model::{ReportDefinition, ReportExecution, SortDirection};

/// In-memory implementation of [`EntityStore`] and [`ReportStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Record>>>,
    definitions: RwLock<HashMap<(String, String), ReportDefinition>>,
    executions: RwLock<Vec<ReportExecution>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append rows to a collection, creating it if needed.
    pub async fn seed(&self, collection: &str, rows: Vec<Record>) {
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .extend(rows);
    }

    /// Save a report definition under its tenant.
    pub async fn put_definition(&self, definition: ReportDefinition) {
        let key = (definition.tenant_id.clone(), definition.id.clone());
        self.definitions.write().await.insert(key, definition);
    }

    /// Snapshot of all recorded executions, oldest first.
    pub async fn executions(&self) -> Vec<ReportExecution> {
        self.executions.read().await.clone()
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn fetch(&self, collection: &str, query: &RecordQuery) -> StoreResult<FetchResult> {
        let collections = self.collections.read().await;
        let rows = collections
            .get(collection)
            .ok_or_else(|| StoreError::UnknownCollection(collection.to_string()))?;

        let mut matched: Vec<Record> = rows
            .iter()
            .filter(|record| {
                record.get("tenant_id").and_then(Value::as_str) == Some(query.tenant_id.as_str())
                    && query.predicates.iter().all(|p| p.matches(record))
            })
            .cloned()
            .collect();

        if let Some(sort) = &query.sort {
            matched.sort_by(|a, b| {
                match (a.get(&sort.field), b.get(&sort.field)) {
                    (Some(x), Some(y)) => {
                        let ordering = value_cmp(x, y).unwrap_or(Ordering::Equal);
                        match sort.direction {
                            SortDirection::Asc => ordering,
                            SortDirection::Desc => ordering.reverse(),
                        }
                    }
                    // Rows missing the sort field order last either way.
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                }
            });
        }

        let total_count = matched.len() as u64;
        if let Some(limit) = query.limit {
            matched.truncate(limit as usize);
        }

        if !query.fields.is_empty() {
            matched = matched
                .into_iter()
                .map(|record| {
                    query
                        .fields
                        .iter()
                        .filter_map(|f| record.get(f).map(|v| (f.clone(), v.clone())))
                        .collect()
                })
                .collect();
        }

        Ok(FetchResult {
            rows: matched,
            total_count,
        })
    }
}

#[async_trait]
impl ReportStore for MemoryStore {
    async fn definition(
        &self,
        tenant_id: &str,
        report_id: &str,
    ) -> StoreResult<Option<ReportDefinition>> {
        let definitions = self.definitions.read().await;
        Ok(definitions
            .get(&(tenant_id.to_string(), report_id.to_string()))
            .cloned())
    }

    async fn record_execution(&self, execution: &ReportExecution) -> StoreResult<()> {
        self.executions.write().await.push(execution.clone());
        Ok(())
    }

    async fn touch_last_run(
        &self,
        tenant_id: &str,
        report_id: &str,
        at: DateTime<Utc>,
    ) -> StoreResult<()> {
        let mut definitions = self.definitions.write().await;
        if let Some(definition) =
            definitions.get_mut(&(tenant_id.to_string(), report_id.to_string()))
        {
            definition.last_run_at = Some(at);
        }
        Ok(())
    }
}
