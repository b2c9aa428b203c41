//! Report results.
//!
//! Grouped and ungrouped runs produce structurally different rows, so the
//! result carries an explicit tagged union ([`ReportRows`]) that callers
//! pattern-match on. The wire encoding flattens both variants back into the
//! `{ data, totalCount, summary?, executionTimeMs }` exchange shape.

use std::collections::BTreeMap;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

use crate::store::Record;

/// Transient result of one report run. Not persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportResult {
    pub rows: ReportRows,
    /// Exact row count before grouping.
    pub total_count: u64,
    pub execution_time_ms: u64,
}

/// Result rows: raw detail records, or per-group summary rows.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportRows {
    Detail {
        rows: Vec<Record>,
    },
    Grouped {
        /// The field the rows were partitioned by.
        group_field: String,
        /// Groups in first-seen order.
        groups: Vec<GroupRow>,
        /// Group key -> row count.
        summary: BTreeMap<String, u64>,
    },
}

/// One synthetic group row.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupRow {
    pub key: String,
    pub count: u64,
    /// The detail rows belonging to this group.
    pub items: Vec<Record>,
}

impl GroupRow {
    /// Flatten into the wire row `{ <group_field>: key, count, items }`.
    pub fn to_record(&self, group_field: &str) -> Record {
        let mut record = Record::new();
        record.insert(group_field.into(), Value::String(self.key.clone()));
        record.insert("count".into(), Value::from(self.count));
        record.insert(
            "items".into(),
            Value::Array(self.items.iter().cloned().map(Value::Object).collect()),
        );
        record
    }
}

impl ReportRows {
    /// Number of top-level rows (detail rows, or groups when grouped).
    pub fn len(&self) -> usize {
        match self {
            ReportRows::Detail { rows } => rows.len(),
            ReportRows::Grouped { groups, .. } => groups.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_grouped(&self) -> bool {
        matches!(self, ReportRows::Grouped { .. })
    }

    /// Top-level rows in wire form, e.g. for CSV export.
    pub fn to_records(&self) -> Vec<Record> {
        match self {
            ReportRows::Detail { rows } => rows.clone(),
            ReportRows::Grouped {
                group_field,
                groups,
                ..
            } => groups.iter().map(|g| g.to_record(group_field)).collect(),
        }
    }
}

impl Serialize for ReportResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("data", &self.rows.to_records())?;
        map.serialize_entry("totalCount", &self.total_count)?;
        if let ReportRows::Grouped { summary, .. } = &self.rows {
            map.serialize_entry("summary", summary)?;
        }
        map.serialize_entry("executionTimeMs", &self.execution_time_ms)?;
        map.end()
    }
}
