//! Report execution.
//!
//! One run is a single pass with no retries:
//!
//! 1. resolve the definition (tenant-scoped, `NotFound` on miss)
//! 2. merge persisted filters with caller-supplied ad-hoc filters
//! 3. build and execute the query with an exact row count
//! 4. group rows if the definition asks for it
//! 5. write the audit row and touch `last_run_at`
//! 6. return the shaped result
//!
//! Any store error aborts the run before step 5, so a failed run leaves no
//! persistent side effect. The audit insert and the timestamp touch are
//! two separate writes with no transaction between them; a crash between
//! the two leaves a benign inconsistency.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::config::Settings;
use crate::error::{EngineError, EngineResult};
use crate::filter;
use crate::model::{
    ExecutionType, GroupRow, ReportExecution, ReportFilter, ReportResult, ReportRows,
    RequestContext,
};
use crate::registry::Registry;
use crate::store::{EntityStore, Record, RecordQuery, ReportStore};

/// Executes saved report definitions against the record store.
pub struct ReportExecutor {
    entities: Arc<dyn EntityStore>,
    reports: Arc<dyn ReportStore>,
    registry: Arc<Registry>,
    settings: Settings,
}

impl ReportExecutor {
    pub fn new(
        entities: Arc<dyn EntityStore>,
        reports: Arc<dyn ReportStore>,
        registry: Arc<Registry>,
    ) -> Self {
        Self {
            entities,
            reports,
            registry,
            settings: Settings::default(),
        }
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Execute a saved report as a manual run.
    ///
    /// Ad-hoc filters are ANDed after the definition's persisted filters
    /// and are not persisted.
    pub async fn run(
        &self,
        ctx: &RequestContext,
        report_id: &str,
        ad_hoc_filters: &[ReportFilter],
    ) -> EngineResult<ReportResult> {
        self.run_typed(ctx, report_id, ad_hoc_filters, ExecutionType::Manual)
            .await
    }

    /// Execute a saved report, recording the given trigger in the audit row.
    pub async fn run_typed(
        &self,
        ctx: &RequestContext,
        report_id: &str,
        ad_hoc_filters: &[ReportFilter],
        execution_type: ExecutionType,
    ) -> EngineResult<ReportResult> {
        let started = Instant::now();

        let definition = self
            .reports
            .definition(&ctx.tenant_id, report_id)
            .await?
            .ok_or_else(|| EngineError::NotFound(report_id.to_string()))?;

        let mut filters = definition.filters.clone();
        filters.extend_from_slice(ad_hoc_filters);

        let collection = self.registry.collections.collection(definition.object_type);
        let mut query = RecordQuery::for_tenant(&ctx.tenant_id).with_fields(&definition.fields);
        query = filter::apply_filters(query, &filters);
        if let Some(field) = &definition.sort_field {
            query = query.sort_by(field, definition.sort_direction);
        }
        if let Some(cap) = self.settings.query.fetch_limit {
            query = query.with_limit(cap);
        }

        let fetched = self.entities.fetch(collection, &query).await?;
        let total_count = fetched.total_count;

        let rows = match &definition.grouping {
            Some(group_field) => group_rows(group_field, fetched.rows),
            None => ReportRows::Detail { rows: fetched.rows },
        };

        let execution_time_ms = started.elapsed().as_millis() as u64;

        if self.settings.audit.enabled {
            let execution = ReportExecution {
                id: Uuid::new_v4().to_string(),
                report_id: report_id.to_string(),
                tenant_id: ctx.tenant_id.clone(),
                user_id: ctx.user_id.clone(),
                execution_type,
                row_count: total_count,
                execution_time_ms,
                filters_applied: filters.len(),
                timestamp: Utc::now(),
            };
            self.reports.record_execution(&execution).await?;
            self.reports
                .touch_last_run(&ctx.tenant_id, report_id, execution.timestamp)
                .await?;
        }

        debug!(
            report_id,
            rows = total_count,
            elapsed_ms = execution_time_ms,
            "report executed"
        );

        Ok(ReportResult {
            rows,
            total_count,
            execution_time_ms,
        })
    }
}

/// Partition rows by the grouping field's stringified value, preserving
/// first-seen group order. Rows with a missing or null value land in the
/// `"Unknown"` group.
fn group_rows(group_field: &str, rows: Vec<Record>) -> ReportRows {
    let mut order: Vec<String> = Vec::new();
    let mut buckets: HashMap<String, Vec<Record>> = HashMap::new();

    for row in rows {
        let key = group_key(row.get(group_field));
        if !buckets.contains_key(&key) {
            order.push(key.clone());
        }
        buckets.entry(key).or_default().push(row);
    }

    let mut summary = BTreeMap::new();
    let groups = order
        .into_iter()
        .map(|key| {
            let items = buckets.remove(&key).unwrap_or_default();
            let count = items.len() as u64;
            summary.insert(key.clone(), count);
            GroupRow { key, count, items }
        })
        .collect();

    ReportRows::Grouped {
        group_field: group_field.to_string(),
        groups,
        summary,
    }
}

fn group_key(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "Unknown".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
