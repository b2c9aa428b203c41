//! Execution audit records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a run was triggered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionType {
    #[default]
    Manual,
    Scheduled,
    Export,
}

/// Immutable audit record, written once per successful run.
///
/// Purely observational: the engine never reads these back, mutates them,
/// or deletes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportExecution {
    pub id: String,
    pub report_id: String,
    pub tenant_id: String,
    pub user_id: String,
    pub execution_type: ExecutionType,
    pub row_count: u64,
    pub execution_time_ms: u64,
    /// Number of filters applied (persisted + ad-hoc).
    pub filters_applied: usize,
    pub timestamp: DateTime<Utc>,
}
