//! Forecast vs. actual report.

use serde::Serialize;
use serde_json::Value;

use super::{in_range, round2};
use crate::error::EngineResult;
use crate::model::RequestContext;
use crate::period::{parse_instant, DateRange};
use crate::registry::{ObjectType, Registry};
use crate::store::{num_field, EntityStore, Predicate, Record, RecordQuery};

/// Single-row forecast comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastSummary {
    pub forecast: f64,
    pub actual: f64,
    /// `actual - forecast`.
    pub variance: f64,
    /// Percentage of forecast, rounded to two decimals. Zero when the
    /// forecast is zero.
    pub variance_percentage: f64,
}

/// Forecast amounts for periods overlapping the range, against actual won
/// deal value closed in the range.
pub async fn forecast_vs_actual(
    entities: &dyn EntityStore,
    registry: &Registry,
    ctx: &RequestContext,
    range: &DateRange,
) -> EngineResult<ForecastSummary> {
    let deals_query = RecordQuery::for_tenant(&ctx.tenant_id)
        .and(Predicate::Eq {
            field: "won".into(),
            value: Value::Bool(true),
        })
        .and(in_range("closed_at", range));

    // Interval overlap is not expressible with the store's predicate set;
    // fetch the tenant's entries and filter here.
    let forecasts_query = RecordQuery::for_tenant(&ctx.tenant_id);
    let (forecasts, deals) = futures::try_join!(
        entities.fetch(
            &registry.collections.forecasts,
            &forecasts_query
        ),
        entities.fetch(
            registry.collections.collection(ObjectType::Deals),
            &deals_query
        ),
    )?;

    let forecast: f64 = forecasts
        .rows
        .iter()
        .filter(|entry| overlaps(entry, range))
        .filter_map(|entry| num_field(entry, "amount"))
        .sum();
    let actual: f64 = deals
        .rows
        .iter()
        .filter_map(|deal| num_field(deal, "value"))
        .sum();

    let variance = actual - forecast;
    let variance_percentage = if forecast == 0.0 {
        0.0
    } else {
        round2(variance / forecast * 100.0)
    };

    Ok(ForecastSummary {
        forecast,
        actual,
        variance,
        variance_percentage,
    })
}

fn overlaps(entry: &Record, range: &DateRange) -> bool {
    let start = entry.get("period_start").and_then(parse_instant);
    let end = entry.get("period_end").and_then(parse_instant);
    match (start, end) {
        (Some(start), Some(end)) => start <= range.end && end >= range.start,
        _ => false,
    }
}
