//! Filter evaluation.
//!
//! Translates declarative [`ReportFilter`]s into store predicates by
//! folding them onto a [`RecordQuery`]. Dispatch goes through a strategy
//! table ([`builder_for`]); an operator with no registered builder folds to
//! a no-op, so unrecognized operators drop out of the query instead of
//! failing the run. All filters combine with implicit AND; there is no OR
//! and no nested predicate grouping.

use serde_json::Value;

use crate::model::{FilterOperator, ReportFilter};
use crate::store::{Predicate, RecordQuery};

/// Builds one predicate from one filter.
pub type PredicateBuilder = fn(&ReportFilter) -> Predicate;

/// Strategy table: operator -> predicate builder.
///
/// [`FilterOperator::Unknown`] is the explicit default case and has no
/// builder.
pub fn builder_for(operator: FilterOperator) -> Option<PredicateBuilder> {
    match operator {
        FilterOperator::Equals => Some(equals),
        FilterOperator::NotEquals => Some(not_equals),
        FilterOperator::Contains => Some(contains),
        FilterOperator::NotContains => Some(not_contains),
        FilterOperator::GreaterThan => Some(greater_than),
        FilterOperator::LessThan => Some(less_than),
        FilterOperator::Between => Some(between),
        FilterOperator::In => Some(in_set),
        FilterOperator::NotIn => Some(not_in_set),
        FilterOperator::IsNull => Some(is_null),
        FilterOperator::IsNotNull => Some(is_not_null),
        FilterOperator::Unknown => None,
    }
}

/// Fold one filter into the query. Unrecognized operators leave the query
/// unchanged.
pub fn apply_filter(query: RecordQuery, filter: &ReportFilter) -> RecordQuery {
    match builder_for(filter.operator) {
        Some(build) => query.and(build(filter)),
        None => query,
    }
}

/// Fold a filter set into the query, left to right.
pub fn apply_filters(query: RecordQuery, filters: &[ReportFilter]) -> RecordQuery {
    filters.iter().fold(query, apply_filter)
}

fn equals(filter: &ReportFilter) -> Predicate {
    Predicate::Eq {
        field: filter.field.clone(),
        value: filter.value.clone(),
    }
}

fn not_equals(filter: &ReportFilter) -> Predicate {
    Predicate::Ne {
        field: filter.field.clone(),
        value: filter.value.clone(),
    }
}

fn contains(filter: &ReportFilter) -> Predicate {
    Predicate::ContainsCi {
        field: filter.field.clone(),
        needle: needle_of(&filter.value),
    }
}

fn not_contains(filter: &ReportFilter) -> Predicate {
    Predicate::NotContainsCi {
        field: filter.field.clone(),
        needle: needle_of(&filter.value),
    }
}

fn greater_than(filter: &ReportFilter) -> Predicate {
    Predicate::Gt {
        field: filter.field.clone(),
        value: filter.value.clone(),
    }
}

fn less_than(filter: &ReportFilter) -> Predicate {
    Predicate::Lt {
        field: filter.field.clone(),
        value: filter.value.clone(),
    }
}

fn between(filter: &ReportFilter) -> Predicate {
    Predicate::Between {
        field: filter.field.clone(),
        low: filter.value.clone(),
        // A missing upper bound compares as null and matches nothing.
        high: filter.value2.clone().unwrap_or(Value::Null),
    }
}

fn in_set(filter: &ReportFilter) -> Predicate {
    Predicate::In {
        field: filter.field.clone(),
        values: set_of(&filter.value),
    }
}

fn not_in_set(filter: &ReportFilter) -> Predicate {
    Predicate::NotIn {
        field: filter.field.clone(),
        values: set_of(&filter.value),
    }
}

fn is_null(filter: &ReportFilter) -> Predicate {
    Predicate::IsNull {
        field: filter.field.clone(),
    }
}

fn is_not_null(filter: &ReportFilter) -> Predicate {
    Predicate::IsNotNull {
        field: filter.field.clone(),
    }
}

fn needle_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn set_of(value: &Value) -> Vec<Value> {
    match value {
        Value::Array(values) => values.clone(),
        other => vec![other.clone()],
    }
}
