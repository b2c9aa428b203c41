#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::json;
    use vantage::model::RequestContext;
    use vantage::period::{resolve, DatePreset, DateRange};
    use vantage::registry::Registry;
    use vantage::standard::{
        self, activity_by_rep, activity_by_type, deals_closed_lost, deals_closed_won,
        forecast_vs_actual, lead_conversion_rate, pipeline_by_stage, sales_by_rep, sales_by_team,
        StandardReport, StandardReportKey,
    };
    use vantage::store::{record, str_field, MemoryStore};

    fn ctx() -> RequestContext {
        RequestContext::new("t1", "u1")
    }

    /// Q1 2024, resolved the way callers do it.
    fn q1() -> DateRange {
        resolve(
            DatePreset::LastQuarter,
            NaiveDate::from_ymd_opt(2024, 5, 15).expect("valid date"),
        )
    }

    async fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        store
            .seed(
                "deal_stages",
                vec![
                    record(json!({"id": "sA", "tenant_id": "t1", "name": "A", "position": 1})),
                    record(json!({"id": "sB", "tenant_id": "t1", "name": "B", "position": 2})),
                    record(json!({"id": "sC", "tenant_id": "t1", "name": "C", "position": 3})),
                ],
            )
            .await;
        store
            .seed(
                "deals",
                vec![
                    // Open pipeline, created in Q1.
                    record(json!({"id": "d1", "tenant_id": "t1", "stage_id": "sA", "value": 100,
                                  "won": false, "closed_at": null, "created_at": "2024-01-10T09:00:00Z"})),
                    record(json!({"id": "d2", "tenant_id": "t1", "stage_id": "sA", "value": 200,
                                  "won": false, "closed_at": null, "created_at": "2024-02-05T09:00:00Z"})),
                    record(json!({"id": "d3", "tenant_id": "t1", "stage_id": "sB", "value": 50,
                                  "won": false, "closed_at": null, "created_at": "2024-03-01T09:00:00Z"})),
                    // Won in Q1: two for rep X, one for rep Y.
                    record(json!({"id": "d4", "tenant_id": "t1", "owner_id": "ux", "value": 1000,
                                  "won": true, "closed_at": "2024-01-20T10:00:00Z"})),
                    record(json!({"id": "d5", "tenant_id": "t1", "owner_id": "ux", "value": 500,
                                  "won": true, "closed_at": "2024-02-15T10:00:00Z"})),
                    record(json!({"id": "d6", "tenant_id": "t1", "owner_id": "uy", "value": 2000,
                                  "won": true, "closed_at": "2024-03-31T23:59:59Z"})),
                    // Won, but outside the range.
                    record(json!({"id": "d7", "tenant_id": "t1", "owner_id": "uy", "value": 7777,
                                  "won": true, "closed_at": "2024-04-02T10:00:00Z"})),
                    // Won, ownerless: excluded from per-rep totals.
                    record(json!({"id": "d8", "tenant_id": "t1", "owner_id": null, "value": 300,
                                  "won": true, "closed_at": "2024-02-01T10:00:00Z"})),
                    // Lost in Q1.
                    record(json!({"id": "d9", "tenant_id": "t1", "owner_id": "uz", "value": 400,
                                  "won": false, "closed_at": "2024-02-20T10:00:00Z"})),
                ],
            )
            .await;
        store
            .seed(
                "users",
                vec![
                    record(json!({"id": "ux", "tenant_id": "t1", "first_name": "Xavier",
                                  "last_name": "Reed", "team_id": "team1"})),
                    record(json!({"id": "uy", "tenant_id": "t1", "first_name": "Yara",
                                  "last_name": "Bloom", "team_id": "team2"})),
                    // No team: excluded from per-team totals.
                    record(json!({"id": "uz", "tenant_id": "t1", "first_name": "Zed",
                                  "last_name": "Solo"})),
                ],
            )
            .await;
        store
            .seed(
                "teams",
                vec![
                    record(json!({"id": "team1", "tenant_id": "t1", "name": "East"})),
                    record(json!({"id": "team2", "tenant_id": "t1", "name": "West"})),
                ],
            )
            .await;
        store
            .seed(
                "leads",
                vec![
                    record(json!({"id": "l1", "tenant_id": "t1", "status": "new",
                                  "created_at": "2024-01-05T00:00:00Z"})),
                    record(json!({"id": "l2", "tenant_id": "t1", "status": "converted",
                                  "created_at": "2024-02-05T00:00:00Z"})),
                    record(json!({"id": "l3", "tenant_id": "t1", "status": "contacted",
                                  "created_at": "2024-03-05T00:00:00Z"})),
                    // Outside the range, never counted.
                    record(json!({"id": "l4", "tenant_id": "t1", "status": "converted",
                                  "created_at": "2024-06-05T00:00:00Z"})),
                ],
            )
            .await;
        store
            .seed(
                "activities",
                vec![
                    record(json!({"id": "a1", "tenant_id": "t1", "activity_type": "call",
                                  "user_id": "ux", "created_at": "2024-01-08T00:00:00Z"})),
                    record(json!({"id": "a2", "tenant_id": "t1", "activity_type": "call",
                                  "user_id": "ux", "created_at": "2024-01-09T00:00:00Z"})),
                    record(json!({"id": "a3", "tenant_id": "t1", "activity_type": "email",
                                  "user_id": "uy", "created_at": "2024-02-09T00:00:00Z"})),
                    record(json!({"id": "a4", "tenant_id": "t1", "activity_type": "call",
                                  "user_id": "uy", "created_at": "2024-02-10T00:00:00Z"})),
                ],
            )
            .await;
        store
            .seed(
                "forecasts",
                vec![
                    record(json!({"id": "f1", "tenant_id": "t1", "amount": 3000,
                                  "period_start": "2024-01-01", "period_end": "2024-03-31"})),
                    // Overlaps the tail of Q1.
                    record(json!({"id": "f2", "tenant_id": "t1", "amount": 1000,
                                  "period_start": "2024-03-15", "period_end": "2024-06-15"})),
                    // Entirely outside.
                    record(json!({"id": "f3", "tenant_id": "t1", "amount": 9999,
                                  "period_start": "2024-07-01", "period_end": "2024-09-30"})),
                ],
            )
            .await;
        store
    }

    #[tokio::test]
    async fn test_pipeline_by_stage_keeps_empty_stages() {
        let store = seeded().await;
        let slices = pipeline_by_stage(&store, &Registry::standard(), &ctx(), &q1())
            .await
            .expect("pipeline");

        assert_eq!(slices.len(), 3);
        assert_eq!(slices[0].stage, "A");
        assert_eq!((slices[0].count, slices[0].value), (2, 300.0));
        assert_eq!(slices[1].stage, "B");
        assert_eq!((slices[1].count, slices[1].value), (1, 50.0));
        assert_eq!(slices[2].stage, "C");
        assert_eq!((slices[2].count, slices[2].value), (0, 0.0));
    }

    #[tokio::test]
    async fn test_closed_won_is_date_bounded_and_newest_first() {
        let store = seeded().await;
        let deals = deals_closed_won(&store, &Registry::standard(), &ctx(), &q1())
            .await
            .expect("won deals");

        let ids: Vec<&str> = deals.iter().map(|d| str_field(d, "id").expect("id")).collect();
        // d7 closed in April is outside the range; the range end is inclusive,
        // so d6 at the last second of Q1 is in.
        assert_eq!(ids, vec!["d6", "d5", "d8", "d4"]);
    }

    #[tokio::test]
    async fn test_closed_lost_requires_an_actual_close() {
        let store = seeded().await;
        let deals = deals_closed_lost(&store, &Registry::standard(), &ctx(), &q1())
            .await
            .expect("lost deals");

        let ids: Vec<&str> = deals.iter().map(|d| str_field(d, "id").expect("id")).collect();
        assert_eq!(ids, vec!["d9"]);
    }

    #[tokio::test]
    async fn test_lead_conversion_rate_rounds_to_two_decimals() {
        let store = seeded().await;
        let summary = lead_conversion_rate(&store, &Registry::standard(), &ctx(), &q1())
            .await
            .expect("conversion");

        assert_eq!(summary.total_leads, 3);
        assert_eq!(summary.converted_leads, 1);
        assert_eq!(summary.conversion_rate, 33.33);
    }

    #[tokio::test]
    async fn test_lead_conversion_rate_with_no_leads_is_zero() {
        let store = MemoryStore::new();
        store.seed("leads", vec![]).await;
        let summary = lead_conversion_rate(&store, &Registry::standard(), &ctx(), &q1())
            .await
            .expect("conversion");

        assert_eq!(summary.total_leads, 0);
        assert_eq!(summary.conversion_rate, 0.0);
    }

    #[tokio::test]
    async fn test_sales_by_rep_sorts_descending_by_value() {
        let store = seeded().await;
        let totals = sales_by_rep(&store, &Registry::standard(), &ctx(), &q1())
            .await
            .expect("sales by rep");

        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].name, "Yara Bloom");
        assert_eq!((totals[0].value, totals[0].count), (2000.0, 1));
        assert_eq!(totals[1].name, "Xavier Reed");
        assert_eq!((totals[1].value, totals[1].count), (1500.0, 2));
    }

    #[tokio::test]
    async fn test_sales_by_team_excludes_teamless_owners() {
        let store = seeded().await;
        let totals = sales_by_team(&store, &Registry::standard(), &ctx(), &q1())
            .await
            .expect("sales by team");

        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].name, "West");
        assert_eq!(totals[0].value, 2000.0);
        assert_eq!(totals[1].name, "East");
        assert_eq!(totals[1].value, 1500.0);
    }

    #[tokio::test]
    async fn test_activity_by_type_counts_descending() {
        let store = seeded().await;
        let counts = activity_by_type(&store, &Registry::standard(), &ctx(), &q1())
            .await
            .expect("by type");

        assert_eq!(counts.len(), 2);
        assert_eq!((counts[0].name.as_str(), counts[0].count), ("call", 3));
        assert_eq!((counts[1].name.as_str(), counts[1].count), ("email", 1));
    }

    #[tokio::test]
    async fn test_activity_by_rep_uses_full_names() {
        let store = seeded().await;
        let counts = activity_by_rep(&store, &Registry::standard(), &ctx(), &q1())
            .await
            .expect("by rep");

        assert_eq!(counts.len(), 2);
        assert_eq!((counts[0].name.as_str(), counts[0].count), ("Xavier Reed", 2));
        assert_eq!((counts[1].name.as_str(), counts[1].count), ("Yara Bloom", 2));
    }

    #[tokio::test]
    async fn test_forecast_vs_actual_counts_overlapping_periods() {
        let store = seeded().await;
        let summary = forecast_vs_actual(&store, &Registry::standard(), &ctx(), &q1())
            .await
            .expect("forecast");

        // f1 + f2 overlap Q1; f3 does not. Actual = won deal value in Q1.
        assert_eq!(summary.forecast, 4000.0);
        assert_eq!(summary.actual, 3800.0);
        assert_eq!(summary.variance, -200.0);
        assert_eq!(summary.variance_percentage, -5.0);
    }

    #[tokio::test]
    async fn test_forecast_variance_percentage_is_zero_without_forecast() {
        let store = MemoryStore::new();
        store.seed("forecasts", vec![]).await;
        store
            .seed(
                "deals",
                vec![record(json!({"id": "d1", "tenant_id": "t1", "value": 500,
                                   "won": true, "closed_at": "2024-02-01T00:00:00Z"}))],
            )
            .await;

        let summary = forecast_vs_actual(&store, &Registry::standard(), &ctx(), &q1())
            .await
            .expect("forecast");
        assert_eq!(summary.forecast, 0.0);
        assert_eq!(summary.actual, 500.0);
        assert_eq!(summary.variance, 500.0);
        assert_eq!(summary.variance_percentage, 0.0);
    }

    #[tokio::test]
    async fn test_dispatch_returns_the_pipeline_shape() {
        let store = seeded().await;
        let report = standard::run(
            &store,
            &Registry::standard(),
            &ctx(),
            StandardReportKey::PipelineByStage,
            &q1(),
        )
        .await
        .expect("dispatch");

        match report {
            StandardReport::Stages(slices) => assert_eq!(slices.len(), 3),
            other => panic!("unexpected shape: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_failed_fetch_propagates_with_no_partial_output() {
        // No "users" collection seeded: the join fetch fails the pipeline.
        let store = MemoryStore::new();
        store.seed("deals", vec![]).await;

        let err = sales_by_rep(&store, &Registry::standard(), &ctx(), &q1())
            .await
            .expect_err("missing collection");
        assert!(matches!(err, vantage::error::EngineError::Store(_)));
    }
}
