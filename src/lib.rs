//! # Vantage
//!
//! A multi-tenant report definition and execution engine for sales data.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │   ReportDefinition / StandardReportKey + DateRange       │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [executor / standard]
//! ┌─────────────────────────────────────────────────────────┐
//! │        RecordQuery (predicates, sort, projection)        │
//! │              via the filter strategy table               │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [store]
//! ┌─────────────────────────────────────────────────────────┐
//! │     EntityStore / ReportStore (external collaborator)    │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [grouping / aggregation]
//! ┌─────────────────────────────────────────────────────────┐
//! │        ReportResult / standard report row shapes         │
//! │                 (optionally CSV-exported)                │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! Every entry point takes an explicit [`model::RequestContext`]; the
//! tenant is the isolation boundary for definitions, records, and audit
//! rows. Execution never caches: each run is a fresh, full recomputation.

pub mod config;
pub mod error;
pub mod executor;
pub mod export;
pub mod filter;
pub mod model;
pub mod period;
pub mod registry;
pub mod standard;
pub mod store;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::config::Settings;
    pub use crate::error::{EngineError, EngineResult};
    pub use crate::executor::ReportExecutor;
    pub use crate::export::to_csv;
    pub use crate::model::{
        FilterOperator, ReportDefinition, ReportFilter, ReportResult, ReportRows, RequestContext,
        SortDirection,
    };
    pub use crate::period::{resolve, resolve_now, DatePreset, DateRange};
    pub use crate::registry::{FieldRegistry, ObjectType, Registry};
    pub use crate::standard::{StandardReport, StandardReportKey};
    pub use crate::store::{
        EntityStore, MemoryStore, Predicate, Record, RecordQuery, ReportStore,
    };
}

// Also export at crate root for convenience
pub use error::{EngineError, EngineResult};
pub use executor::ReportExecutor;
pub use model::{ReportDefinition, ReportFilter, ReportResult, RequestContext};
pub use registry::{ObjectType, Registry};
