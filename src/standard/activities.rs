//! Activity volume reports.

use std::collections::HashMap;

use serde::Serialize;

use super::{full_name, in_range};
use crate::error::EngineResult;
use crate::model::RequestContext;
use crate::period::DateRange;
use crate::registry::{ObjectType, Registry};
use crate::store::{str_field, EntityStore, RecordQuery};

/// One count bucket, keyed by activity type or rep name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityCount {
    pub name: String,
    pub count: u64,
}

/// Activity volume per activity type, descending by count.
pub async fn activity_by_type(
    entities: &dyn EntityStore,
    registry: &Registry,
    ctx: &RequestContext,
    range: &DateRange,
) -> EngineResult<Vec<ActivityCount>> {
    let query = RecordQuery::for_tenant(&ctx.tenant_id).and(in_range("created_at", range));
    let activities = entities
        .fetch(registry.collections.collection(ObjectType::Activities), &query)
        .await?;

    Ok(count_desc(
        activities
            .rows
            .iter()
            .filter_map(|activity| str_field(activity, "activity_type").map(str::to_string)),
    ))
}

/// Activity volume per assigned rep, descending by count.
///
/// Activities whose user has no record are silently excluded.
pub async fn activity_by_rep(
    entities: &dyn EntityStore,
    registry: &Registry,
    ctx: &RequestContext,
    range: &DateRange,
) -> EngineResult<Vec<ActivityCount>> {
    let activities_query =
        RecordQuery::for_tenant(&ctx.tenant_id).and(in_range("created_at", range));
    let users_query = RecordQuery::for_tenant(&ctx.tenant_id);
    let (activities, users) = futures::try_join!(
        entities.fetch(
            registry.collections.collection(ObjectType::Activities),
            &activities_query
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

    Ok(count_desc(activities.rows.iter().filter_map(|activity| {
        let user_id = str_field(activity, "user_id")?;
        names.get(user_id).cloned()
    })))
}

/// Count occurrences per key, descending by count; ties keep first-seen
/// order.
fn count_desc(keys: impl Iterator<Item = String>) -> Vec<ActivityCount> {
    let mut counts: Vec<ActivityCount> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for key in keys {
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            counts.push(ActivityCount {
                name: key,
                count: 0,
            });
            counts.len() - 1
        });
        counts[slot].count += 1;
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}
