//! Deal-centric standard reports.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

use super::{full_name, in_range};
use crate::error::EngineResult;
use crate::model::{RequestContext, SortDirection};
use crate::period::DateRange;
use crate::registry::{ObjectType, Registry};
use crate::store::{num_field, str_field, EntityStore, Predicate, Record, RecordQuery};

/// One pipeline bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageSlice {
    pub stage: String,
    pub count: u64,
    pub value: f64,
}

/// Per-rep or per-team won-deal totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OwnerSales {
    pub name: String,
    pub value: f64,
    pub count: u64,
}

/// Open pipeline value and deal count per stage, in stage order.
///
/// Stages with no open deals still appear with zero count and value.
pub async fn pipeline_by_stage(
    entities: &dyn EntityStore,
    registry: &Registry,
    ctx: &RequestContext,
    range: &DateRange,
) -> EngineResult<Vec<StageSlice>> {
    let stages_query =
        RecordQuery::for_tenant(&ctx.tenant_id).sort_by("position", SortDirection::Asc);
    let deals_query = RecordQuery::for_tenant(&ctx.tenant_id)
        .and(Predicate::IsNull {
            field: "closed_at".into(),
        })
        .and(in_range("created_at", range));

    let (stages, deals) = futures::try_join!(
        entities.fetch(&registry.collections.stages, &stages_query),
        entities.fetch(
            registry.collections.collection(ObjectType::Deals),
            &deals_query
        ),
    )?;

    let mut by_stage: HashMap<String, (u64, f64)> = HashMap::new();
    for deal in &deals.rows {
        let Some(stage_id) = str_field(deal, "stage_id") else {
            continue;
        };
        let bucket = by_stage.entry(stage_id.to_string()).or_default();
        bucket.0 += 1;
        bucket.1 += num_field(deal, "value").unwrap_or(0.0);
    }

    Ok(stages
        .rows
        .iter()
        .map(|stage| {
            let id = str_field(stage, "id").unwrap_or_default();
            let (count, value) = by_stage.get(id).copied().unwrap_or((0, 0.0));
            StageSlice {
                stage: str_field(stage, "name").unwrap_or(id).to_string(),
                count,
                value,
            }
        })
        .collect())
}

/// Won deals closed in the range, newest close first.
pub async fn deals_closed_won(
    entities: &dyn EntityStore,
    registry: &Registry,
    ctx: &RequestContext,
    range: &DateRange,
) -> EngineResult<Vec<Record>> {
    closed_deals(entities, registry, ctx, range, true).await
}

/// Lost deals closed in the range, newest close first.
pub async fn deals_closed_lost(
    entities: &dyn EntityStore,
    registry: &Registry,
    ctx: &RequestContext,
    range: &DateRange,
) -> EngineResult<Vec<Record>> {
    closed_deals(entities, registry, ctx, range, false).await
}

async fn closed_deals(
    entities: &dyn EntityStore,
    registry: &Registry,
    ctx: &RequestContext,
    range: &DateRange,
    won: bool,
) -> EngineResult<Vec<Record>> {
    let mut query = RecordQuery::for_tenant(&ctx.tenant_id)
        .and(Predicate::Eq {
            field: "won".into(),
            value: Value::Bool(won),
        })
        .and(in_range("closed_at", range))
        .sort_by("closed_at", SortDirection::Desc);
    if !won {
        // Lost means explicitly closed, not merely unwon.
        query = query.and(Predicate::IsNotNull {
            field: "closed_at".into(),
        });
    }

    let fetched = entities
        .fetch(registry.collections.collection(ObjectType::Deals), &query)
        .await?;
    Ok(fetched.rows)
}

/// Won-deal value per owning rep, descending by summed value.
///
/// Deals without an owner, and deals whose owner has no user record, are
/// silently excluded.
pub async fn sales_by_rep(
    entities: &dyn EntityStore,
    registry: &Registry,
    ctx: &RequestContext,
    range: &DateRange,
) -> EngineResult<Vec<OwnerSales>> {
    let deals_query = won_deals(ctx, range);
    let users_query = RecordQuery::for_tenant(&ctx.tenant_id);
    let (deals, users) = futures::try_join!(
        entities.fetch(
            registry.collections.collection(ObjectType::Deals),
            &deals_query
        ),
        entities.fetch(
            registry.collections.collection(ObjectType::Users),
            &users_query
        ),
    )?;

    let names: HashMap<&str, String> = users
        .rows
        .iter()
        .filter_map(|user| Some((str_field(user, "id")?, full_name(user)?)))
        .collect();

    let mut totals = accumulate(&deals.rows, |deal| {
        let owner_id = str_field(deal, "owner_id")?;
        names.get(owner_id).map(|name| (owner_id, name.clone()))
    });
    sort_by_value_desc(&mut totals);
    Ok(totals)
}

/// Won-deal value per team, descending by summed value.
///
/// Owners without a team are silently excluded.
pub async fn sales_by_team(
    entities: &dyn EntityStore,
    registry: &Registry,
    ctx: &RequestContext,
    range: &DateRange,
) -> EngineResult<Vec<OwnerSales>> {
    let tenant_query = RecordQuery::for_tenant(&ctx.tenant_id);
    let deals_query = won_deals(ctx, range);
    let (deals, users, teams) = futures::try_join!(
        entities.fetch(
            registry.collections.collection(ObjectType::Deals),
            &deals_query
        ),
        entities.fetch(
            registry.collections.collection(ObjectType::Users),
            &tenant_query
        ),
        entities.fetch(&registry.collections.teams, &tenant_query),
    )?;

    let user_teams: HashMap<&str, &str> = users
        .rows
        .iter()
        .filter_map(|user| Some((str_field(user, "id")?, str_field(user, "team_id")?)))
        .collect();
    let team_names: HashMap<&str, &str> = teams
        .rows
        .iter()
        .filter_map(|team| Some((str_field(team, "id")?, str_field(team, "name")?)))
        .collect();

    let mut totals = accumulate(&deals.rows, |deal| {
        let owner_id = str_field(deal, "owner_id")?;
        let team_id = user_teams.get(owner_id)?;
        team_names
            .get(team_id)
            .map(|name| (*team_id, name.to_string()))
    });
    sort_by_value_desc(&mut totals);
    Ok(totals)
}

fn won_deals(ctx: &RequestContext, range: &DateRange) -> RecordQuery {
    RecordQuery::for_tenant(&ctx.tenant_id)
        .and(Predicate::Eq {
            field: "won".into(),
            value: Value::Bool(true),
        })
        .and(in_range("closed_at", range))
}

/// Sum value and count per key, preserving first-seen order. Deals the
/// keying closure rejects are skipped.
fn accumulate<'a>(
    deals: &'a [Record],
    key_of: impl Fn(&'a Record) -> Option<(&'a str, String)>,
) -> Vec<OwnerSales> {
    let mut totals: Vec<OwnerSales> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for deal in deals {
        let Some((key, name)) = key_of(deal) else {
            continue;
        };
        let slot = *index.entry(key.to_string()).or_insert_with(|| {
            totals.push(OwnerSales {
                name,
                value: 0.0,
                count: 0,
            });
            totals.len() - 1
        });
        totals[slot].value += num_field(deal, "value").unwrap_or(0.0);
        totals[slot].count += 1;
    }

    totals
}

fn sort_by_value_desc(totals: &mut [OwnerSales]) {
    totals.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(Ordering::Equal));
}
