//! Record query builder.
//!
//! [`RecordQuery`] is the composable query the engine hands to an
//! [`EntityStore`](super::EntityStore): tenant scope, projection,
//! predicates, sort, and an optional row limit. Store adapters translate
//! it into their native query language; the in-memory store evaluates
//! predicates directly via [`Predicate::matches`].

use std::cmp::Ordering;

use chrono::DateTime;
use serde_json::Value;

use super::Record;
use crate::model::SortDirection;

// =============================================================================
// Query
// =============================================================================

/// A query against one record collection.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "builders have no effect until executed"]
pub struct RecordQuery {
    /// Tenant scope; every fetch is bounded to one tenant.
    pub tenant_id: String,
    /// Projection list; empty means all fields.
    pub fields: Vec<String>,
    /// Predicates, combined with AND.
    pub predicates: Vec<Predicate>,
    pub sort: Option<SortSpec>,
    pub limit: Option<u64>,
}

/// Sort clause.
#[derive(Debug, Clone, PartialEq)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl RecordQuery {
    /// An unfiltered query over one tenant's records.
    pub fn for_tenant(tenant_id: &str) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            fields: Vec::new(),
            predicates: Vec::new(),
            sort: None,
            limit: None,
        }
    }

    pub fn with_fields(mut self, fields: &[String]) -> Self {
        self.fields = fields.to_vec();
        self
    }

    /// AND one predicate onto the query.
    pub fn and(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn sort_by(mut self, field: &str, direction: SortDirection) -> Self {
        self.sort = Some(SortSpec {
            field: field.into(),
            direction,
        });
        self
    }

    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }
}

// =============================================================================
// Predicates
// =============================================================================

/// One predicate against a record field.
///
/// Every variant must be handled by store adapters - the compiler enforces
/// this.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Exact match.
    Eq { field: String, value: Value },
    /// Exclusion; absent values are excluded too, matching store semantics.
    Ne { field: String, value: Value },
    /// Case-insensitive substring match on string fields.
    ContainsCi { field: String, needle: String },
    /// Negation of the same pattern; non-string values never match.
    NotContainsCi { field: String, needle: String },
    /// Strict ordering, exclusive bound.
    Gt { field: String, value: Value },
    /// Strict ordering, exclusive bound.
    Lt { field: String, value: Value },
    /// Inclusive range.
    Between { field: String, low: Value, high: Value },
    /// Set membership.
    In { field: String, values: Vec<Value> },
    /// Set exclusion; absent values are excluded.
    NotIn { field: String, values: Vec<Value> },
    /// Field absent or null.
    IsNull { field: String },
    /// Field present and non-null.
    IsNotNull { field: String },
}

impl Predicate {
    /// Reference evaluation semantics over an in-memory record.
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Predicate::Eq { field, value } => record
                .get(field)
                .is_some_and(|v| value_eq(v, value)),
            Predicate::Ne { field, value } => record
                .get(field)
                .is_some_and(|v| !v.is_null() && !value_eq(v, value)),
            Predicate::ContainsCi { field, needle } => contains_ci(record, field, needle),
            Predicate::NotContainsCi { field, needle } => record
                .get(field)
                .and_then(Value::as_str)
                .is_some_and(|s| !s.to_lowercase().contains(&needle.to_lowercase())),
            Predicate::Gt { field, value } => {
                cmp_to(record, field, value) == Some(Ordering::Greater)
            }
            Predicate::Lt { field, value } => cmp_to(record, field, value) == Some(Ordering::Less),
            Predicate::Between { field, low, high } => {
                matches!(cmp_to(record, field, low), Some(Ordering::Greater | Ordering::Equal))
                    && matches!(cmp_to(record, field, high), Some(Ordering::Less | Ordering::Equal))
            }
            Predicate::In { field, values } => record
                .get(field)
                .is_some_and(|v| values.iter().any(|candidate| value_eq(v, candidate))),
            Predicate::NotIn { field, values } => record.get(field).is_some_and(|v| {
                !v.is_null() && !values.iter().any(|candidate| value_eq(v, candidate))
            }),
            Predicate::IsNull { field } => record.get(field).map_or(true, Value::is_null),
            Predicate::IsNotNull { field } => record.get(field).is_some_and(|v| !v.is_null()),
        }
    }
}

fn contains_ci(record: &Record, field: &str, needle: &str) -> bool {
    record
        .get(field)
        .and_then(Value::as_str)
        .is_some_and(|s| s.to_lowercase().contains(&needle.to_lowercase()))
}

fn cmp_to(record: &Record, field: &str, bound: &Value) -> Option<Ordering> {
    record.get(field).and_then(|v| value_cmp(v, bound))
}

/// Equality with numeric coercion, so `100` and `100.0` compare equal.
pub fn value_eq(a: &Value, b: &Value) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

/// Ordering over record values.
///
/// Numbers compare numerically. Two strings that both parse as RFC 3339
/// compare as instants, so inclusive timestamp bounds hold regardless of
/// `Z` vs `+00:00` offset spelling; other strings compare lexically (which
/// also covers plain `YYYY-MM-DD` dates). Everything else is unordered.
pub fn value_cmp(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64().partial_cmp(&y.as_f64()),
        (Value::String(x), Value::String(y)) => {
            match (
                DateTime::parse_from_rfc3339(x),
                DateTime::parse_from_rfc3339(y),
            ) {
                (Ok(ix), Ok(iy)) => Some(ix.cmp(&iy)),
                _ => Some(x.cmp(y)),
            }
        }
        _ => None,
    }
}
