//! Object-type and field registries.
//!
//! Reports target exactly one object type out of a closed enum. Two lookup
//! tables are built once at engine construction and injected wherever the
//! engine needs them:
//!
//! - [`FieldRegistry`]: per-object-type catalog of field name, display
//!   label, and semantic type. Pure lookup, no failure modes.
//! - [`CollectionRegistry`]: object type -> store collection name, plus the
//!   auxiliary collections the standard reports join against. Adding an
//!   object type is a data change, not a code change.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// =============================================================================
// Object types
// =============================================================================

/// The closed set of business-record kinds a report can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectType {
    Leads,
    Contacts,
    Accounts,
    Deals,
    Activities,
    Campaigns,
    Users,
}

impl ObjectType {
    /// All object types, in display order.
    pub const ALL: [ObjectType; 7] = [
        ObjectType::Leads,
        ObjectType::Contacts,
        ObjectType::Accounts,
        ObjectType::Deals,
        ObjectType::Activities,
        ObjectType::Campaigns,
        ObjectType::Users,
    ];

    /// Canonical snake_case name, matching the wire encoding.
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Leads => "leads",
            ObjectType::Contacts => "contacts",
            ObjectType::Accounts => "accounts",
            ObjectType::Deals => "deals",
            ObjectType::Activities => "activities",
            ObjectType::Campaigns => "campaigns",
            ObjectType::Users => "users",
        }
    }
}

impl std::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Field catalog
// =============================================================================

/// Semantic type of a catalogued field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    String,
    Number,
    Date,
    DateTime,
    Boolean,
}

/// One entry in the field catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

impl FieldDef {
    pub fn new(name: &str, label: &str, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            field_type,
        }
    }
}

/// Per-object-type field catalog.
///
/// Lookups are total: an object type with no registered catalog yields an
/// empty slice rather than an error.
#[derive(Debug, Clone, Default)]
pub struct FieldRegistry {
    fields: HashMap<ObjectType, Vec<FieldDef>>,
}

impl FieldRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in catalog covering every object type.
    pub fn standard() -> Self {
        use FieldType::*;

        let mut registry = Self::new();
        registry.register(
            ObjectType::Leads,
            vec![
                FieldDef::new("first_name", "First Name", String),
                FieldDef::new("last_name", "Last Name", String),
                FieldDef::new("email", "Email", String),
                FieldDef::new("phone", "Phone", String),
                FieldDef::new("company", "Company", String),
                FieldDef::new("status", "Status", String),
                FieldDef::new("source", "Source", String),
                FieldDef::new("owner_id", "Owner", String),
                FieldDef::new("created_at", "Created", DateTime),
            ],
        );
        registry.register(
            ObjectType::Contacts,
            vec![
                FieldDef::new("first_name", "First Name", String),
                FieldDef::new("last_name", "Last Name", String),
                FieldDef::new("email", "Email", String),
                FieldDef::new("phone", "Phone", String),
                FieldDef::new("title", "Job Title", String),
                FieldDef::new("account_id", "Account", String),
                FieldDef::new("owner_id", "Owner", String),
                FieldDef::new("created_at", "Created", DateTime),
            ],
        );
        registry.register(
            ObjectType::Accounts,
            vec![
                FieldDef::new("name", "Account Name", String),
                FieldDef::new("industry", "Industry", String),
                FieldDef::new("website", "Website", String),
                FieldDef::new("annual_revenue", "Annual Revenue", Number),
                FieldDef::new("employee_count", "Employees", Number),
                FieldDef::new("owner_id", "Owner", String),
                FieldDef::new("created_at", "Created", DateTime),
            ],
        );
        registry.register(
            ObjectType::Deals,
            vec![
                FieldDef::new("name", "Deal Name", String),
                FieldDef::new("value", "Value", Number),
                FieldDef::new("stage_id", "Stage", String),
                FieldDef::new("owner_id", "Owner", String),
                FieldDef::new("won", "Won", Boolean),
                FieldDef::new("expected_close_date", "Expected Close", Date),
                FieldDef::new("closed_at", "Closed", DateTime),
                FieldDef::new("created_at", "Created", DateTime),
            ],
        );
        registry.register(
            ObjectType::Activities,
            vec![
                FieldDef::new("subject", "Subject", String),
                FieldDef::new("activity_type", "Type", String),
                FieldDef::new("user_id", "Assigned To", String),
                FieldDef::new("due_date", "Due", Date),
                FieldDef::new("completed", "Completed", Boolean),
                FieldDef::new("created_at", "Created", DateTime),
            ],
        );
        registry.register(
            ObjectType::Campaigns,
            vec![
                FieldDef::new("name", "Campaign Name", String),
                FieldDef::new("campaign_type", "Type", String),
                FieldDef::new("status", "Status", String),
                FieldDef::new("budget", "Budget", Number),
                FieldDef::new("start_date", "Start", Date),
                FieldDef::new("end_date", "End", Date),
            ],
        );
        registry.register(
            ObjectType::Users,
            vec![
                FieldDef::new("first_name", "First Name", String),
                FieldDef::new("last_name", "Last Name", String),
                FieldDef::new("email", "Email", String),
                FieldDef::new("role", "Role", String),
                FieldDef::new("team_id", "Team", String),
                FieldDef::new("is_active", "Active", Boolean),
            ],
        );
        registry
    }

    /// Replace the catalog for one object type.
    pub fn register(&mut self, object_type: ObjectType, fields: Vec<FieldDef>) {
        self.fields.insert(object_type, fields);
    }

    /// Fields for an object type. Empty for unregistered types.
    pub fn fields(&self, object_type: ObjectType) -> &[FieldDef] {
        self.fields
            .get(&object_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Look up one field by name.
    pub fn field(&self, object_type: ObjectType, name: &str) -> Option<&FieldDef> {
        self.fields(object_type).iter().find(|f| f.name == name)
    }

    /// Check that a filter references a catalogued field.
    ///
    /// Callers may use this before saving a definition; the executor does
    /// not enforce it.
    pub fn validate_filter(
        &self,
        object_type: ObjectType,
        filter: &crate::model::ReportFilter,
    ) -> Result<(), crate::error::EngineError> {
        if self.field(object_type, &filter.field).is_none() {
            return Err(crate::error::EngineError::validation(format!(
                "unknown field '{}' on object type '{}'",
                filter.field, object_type
            )));
        }
        Ok(())
    }
}

// =============================================================================
// Collection mapping
// =============================================================================

/// Object type -> store collection name, plus auxiliary collections.
///
/// The standard reports join against a small fixed set of collections that
/// are not report targets themselves (deal stages, teams, forecast entries).
#[derive(Debug, Clone)]
pub struct CollectionRegistry {
    objects: HashMap<ObjectType, String>,
    /// Ordered deal stage definitions.
    pub stages: String,
    /// Sales teams.
    pub teams: String,
    /// Forecast entries (amount + period bounds).
    pub forecasts: String,
}

impl CollectionRegistry {
    /// Default mapping: each object type maps to its canonical name.
    pub fn standard() -> Self {
        let objects = ObjectType::ALL
            .iter()
            .map(|t| (*t, t.as_str().to_string()))
            .collect();
        Self {
            objects,
            stages: "deal_stages".into(),
            teams: "teams".into(),
            forecasts: "forecasts".into(),
        }
    }

    /// Override the collection name for one object type.
    pub fn with_collection(mut self, object_type: ObjectType, name: &str) -> Self {
        self.objects.insert(object_type, name.into());
        self
    }

    /// Collection name for an object type.
    ///
    /// Falls back to the canonical enum name for unmapped types, so the
    /// lookup is total.
    pub fn collection(&self, object_type: ObjectType) -> &str {
        self.objects
            .get(&object_type)
            .map(String::as_str)
            .unwrap_or_else(|| object_type.as_str())
    }
}

impl Default for CollectionRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

/// The two registries the engine consumes, built once and injected.
#[derive(Debug, Clone)]
pub struct Registry {
    pub fields: FieldRegistry,
    pub collections: CollectionRegistry,
}

impl Registry {
    pub fn standard() -> Self {
        Self {
            fields: FieldRegistry::standard(),
            collections: CollectionRegistry::standard(),
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::standard()
    }
}
