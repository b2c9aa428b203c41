//! Report engine data model.

pub mod context;
pub mod execution;
pub mod report;
pub mod result;

pub use context::RequestContext;
pub use execution::{ExecutionType, ReportExecution};
pub use report::{FilterOperator, ReportDefinition, ReportFilter, SortDirection};
pub use result::{GroupRow, ReportResult, ReportRows};
