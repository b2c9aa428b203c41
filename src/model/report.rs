//! Saved report definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::registry::ObjectType;

/// A saved, reusable report configuration.
///
/// Owned exclusively by the creating tenant and user; never shared across
/// tenants. `last_run_at` is the only field mutated by execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDefinition {
    pub id: String,
    pub tenant_id: String,
    pub owner_id: String,
    /// The one record collection this report targets.
    pub object_type: ObjectType,
    /// Projection list; empty means all fields.
    #[serde(default)]
    pub fields: Vec<String>,
    /// Persisted predicate set, ANDed at execution time.
    #[serde(default)]
    pub filters: Vec<ReportFilter>,
    /// Optional field to group detail rows by.
    #[serde(default)]
    pub grouping: Option<String>,
    #[serde(default)]
    pub sort_field: Option<String>,
    #[serde(default)]
    pub sort_direction: SortDirection,
    /// Touched by every successful execution.
    #[serde(default)]
    pub last_run_at: Option<DateTime<Utc>>,
}

/// One declarative filter predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportFilter {
    pub field: String,
    pub operator: FilterOperator,
    #[serde(default)]
    pub value: Value,
    /// Upper bound, used only by `between`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value2: Option<Value>,
}

impl ReportFilter {
    pub fn new(field: &str, operator: FilterOperator, value: Value) -> Self {
        Self {
            field: field.into(),
            operator,
            value,
            value2: None,
        }
    }

    /// A `between` filter over an inclusive range.
    pub fn between(field: &str, low: Value, high: Value) -> Self {
        Self {
            field: field.into(),
            operator: FilterOperator::Between,
            value: low,
            value2: Some(high),
        }
    }
}

/// Filter operators.
///
/// Operators travel as snake_case strings. Unrecognized strings decode to
/// [`FilterOperator::Unknown`], which the evaluator treats as a no-op
/// rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    GreaterThan,
    LessThan,
    Between,
    In,
    NotIn,
    IsNull,
    IsNotNull,
    Unknown,
}

impl FilterOperator {
    /// Decode a wire string. Anything unrecognized is `Unknown`.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "equals" => Self::Equals,
            "not_equals" => Self::NotEquals,
            "contains" => Self::Contains,
            "not_contains" => Self::NotContains,
            "greater_than" => Self::GreaterThan,
            "less_than" => Self::LessThan,
            "between" => Self::Between,
            "in" => Self::In,
            "not_in" => Self::NotIn,
            "is_null" => Self::IsNull,
            "is_not_null" => Self::IsNotNull,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equals => "equals",
            Self::NotEquals => "not_equals",
            Self::Contains => "contains",
            Self::NotContains => "not_contains",
            Self::GreaterThan => "greater_than",
            Self::LessThan => "less_than",
            Self::Between => "between",
            Self::In => "in",
            Self::NotIn => "not_in",
            Self::IsNull => "is_null",
            Self::IsNotNull => "is_not_null",
            Self::Unknown => "unknown",
        }
    }
}

impl Serialize for FilterOperator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FilterOperator {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

/// Sort order for a report's result rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}
