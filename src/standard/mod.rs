//! Standard reports.
//!
//! Nine fixed, non-configurable aggregation pipelines, each identified by a
//! [`StandardReportKey`]. No persisted definition backs these: the key and
//! a date range are the only inputs, and every run recomputes from fresh
//! fetches. Within one pipeline, mutually independent fetches run
//! concurrently and join before aggregation; a failed fetch fails the whole
//! pipeline with no partial output.

pub mod activities;
pub mod deals;
pub mod forecast;
pub mod leads;

pub use activities::{activity_by_rep, activity_by_type, ActivityCount};
pub use deals::{
    deals_closed_lost, deals_closed_won, pipeline_by_stage, sales_by_rep, sales_by_team,
    OwnerSales, StageSlice,
};
pub use forecast::{forecast_vs_actual, ForecastSummary};
pub use leads::{lead_conversion_rate, ConversionSummary};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::EngineResult;
use crate::model::RequestContext;
use crate::period::DateRange;
use crate::registry::Registry;
use crate::store::{EntityStore, Predicate, Record};

/// Identifier of one fixed analytical report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StandardReportKey {
    PipelineByStage,
    DealsClosedWon,
    DealsClosedLost,
    LeadConversionRate,
    SalesByRep,
    SalesByTeam,
    ActivityByType,
    ActivityByRep,
    ForecastVsActual,
}

/// Output of one standard report run.
///
/// Each variant carries the fixed shape its pipeline produces; the wire
/// encoding is untagged, so callers see the plain rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StandardReport {
    Stages(Vec<StageSlice>),
    Deals(Vec<Record>),
    Conversion(ConversionSummary),
    Sales(Vec<OwnerSales>),
    Activity(Vec<ActivityCount>),
    Forecast(ForecastSummary),
}

/// Run one standard report over the given date range.
pub async fn run(
    entities: &dyn EntityStore,
    registry: &Registry,
    ctx: &RequestContext,
    key: StandardReportKey,
    range: &DateRange,
) -> EngineResult<StandardReport> {
    debug!(?key, tenant = %ctx.tenant_id, "running standard report");
    match key {
        StandardReportKey::PipelineByStage => Ok(StandardReport::Stages(
            pipeline_by_stage(entities, registry, ctx, range).await?,
        )),
        StandardReportKey::DealsClosedWon => Ok(StandardReport::Deals(
            deals_closed_won(entities, registry, ctx, range).await?,
        )),
        StandardReportKey::DealsClosedLost => Ok(StandardReport::Deals(
            deals_closed_lost(entities, registry, ctx, range).await?,
        )),
        StandardReportKey::LeadConversionRate => Ok(StandardReport::Conversion(
            lead_conversion_rate(entities, registry, ctx, range).await?,
        )),
        StandardReportKey::SalesByRep => Ok(StandardReport::Sales(
            sales_by_rep(entities, registry, ctx, range).await?,
        )),
        StandardReportKey::SalesByTeam => Ok(StandardReport::Sales(
            sales_by_team(entities, registry, ctx, range).await?,
        )),
        StandardReportKey::ActivityByType => Ok(StandardReport::Activity(
            activity_by_type(entities, registry, ctx, range).await?,
        )),
        StandardReportKey::ActivityByRep => Ok(StandardReport::Activity(
            activity_by_rep(entities, registry, ctx, range).await?,
        )),
        StandardReportKey::ForecastVsActual => Ok(StandardReport::Forecast(
            forecast_vs_actual(entities, registry, ctx, range).await?,
        )),
    }
}

/// Inclusive date-bound predicate on a timestamp column.
pub(crate) fn in_range(field: &str, range: &DateRange) -> Predicate {
    Predicate::Between {
        field: field.into(),
        low: range.start_value(),
        high: range.end_value(),
    }
}

/// Round to two decimals.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// A user's display name: `first_name last_name`.
pub(crate) fn full_name(user: &Record) -> Option<String> {
    let first = crate::store::str_field(user, "first_name")?;
    let last = crate::store::str_field(user, "last_name")?;
    Some(format!("{first} {last}"))
}
