//! Lead conversion report.

use serde::Serialize;
use serde_json::json;

use super::{in_range, round2};
use crate::error::EngineResult;
use crate::model::RequestContext;
use crate::period::DateRange;
use crate::registry::{ObjectType, Registry};
use crate::store::{EntityStore, Predicate, RecordQuery};

/// Single-row conversion summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionSummary {
    pub total_leads: u64,
    pub converted_leads: u64,
    /// Percentage, rounded to two decimals. Zero when no leads exist.
    pub conversion_rate: f64,
}

/// Share of leads created in the range that reached converted status.
pub async fn lead_conversion_rate(
    entities: &dyn EntityStore,
    registry: &Registry,
    ctx: &RequestContext,
    range: &DateRange,
) -> EngineResult<ConversionSummary> {
    let collection = registry.collections.collection(ObjectType::Leads);

    // Count-only fetches: a zero limit still returns the exact match count.
    let total_query = RecordQuery::for_tenant(&ctx.tenant_id)
        .and(in_range("created_at", range))
        .with_limit(0);
    let converted_query = total_query.clone().and(Predicate::Eq {
        field: "status".into(),
        value: json!("converted"),
    });

    let (total, converted) = futures::try_join!(
        entities.fetch(collection, &total_query),
        entities.fetch(collection, &converted_query),
    )?;

    let total_leads = total.total_count;
    let converted_leads = converted.total_count;
    let conversion_rate = if total_leads == 0 {
        0.0
    } else {
        round2(converted_leads as f64 / total_leads as f64 * 100.0)
    };

    Ok(ConversionSummary {
        total_leads,
        converted_leads,
        conversion_rate,
    })
}
