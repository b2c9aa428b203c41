#[cfg(test)]
mod tests {
    use serde_json::json;
    use vantage::model::{
        FilterOperator, ReportDefinition, ReportResult, ReportRows, SortDirection,
    };
    use vantage::registry::ObjectType;

    #[test]
    fn test_definition_deserializes_with_defaults() {
        let definition: ReportDefinition = serde_json::from_value(json!({
            "id": "r1",
            "tenant_id": "t1",
            "owner_id": "u1",
            "object_type": "deals"
        }))
        .expect("minimal definition");

        assert_eq!(definition.object_type, ObjectType::Deals);
        assert!(definition.fields.is_empty());
        assert!(definition.filters.is_empty());
        assert_eq!(definition.grouping, None);
        assert_eq!(definition.sort_direction, SortDirection::Asc);
        assert_eq!(definition.last_run_at, None);
    }

    #[test]
    fn test_unrecognized_operator_deserializes_to_unknown() {
        let operator: FilterOperator =
            serde_json::from_value(json!("starts_with")).expect("any string");
        assert_eq!(operator, FilterOperator::Unknown);

        let operator: FilterOperator = serde_json::from_value(json!("not_in")).expect("known");
        assert_eq!(operator, FilterOperator::NotIn);
    }

    #[test]
    fn test_detail_result_wire_shape() {
        let result = ReportResult {
            rows: ReportRows::Detail {
                rows: vec![vantage::store::record(json!({"name": "Acme", "value": 10}))],
            },
            total_count: 1,
            execution_time_ms: 7,
        };

        let wire = serde_json::to_value(&result).expect("serializable");
        assert_eq!(
            wire,
            json!({
                "data": [{"name": "Acme", "value": 10}],
                "totalCount": 1,
                "executionTimeMs": 7
            })
        );
    }

    #[test]
    fn test_grouped_result_wire_shape() {
        let rows = vec![
            vantage::store::record(json!({"status": "open", "name": "a"})),
            vantage::store::record(json!({"status": "open", "name": "b"})),
        ];
        let result = ReportResult {
            rows: ReportRows::Grouped {
                group_field: "status".into(),
                groups: vec![vantage::model::GroupRow {
                    key: "open".into(),
                    count: 2,
                    items: rows,
                }],
                summary: [("open".to_string(), 2u64)].into_iter().collect(),
            },
            total_count: 2,
            execution_time_ms: 3,
        };

        let wire = serde_json::to_value(&result).expect("serializable");
        assert_eq!(wire["data"][0]["status"], json!("open"));
        assert_eq!(wire["data"][0]["count"], json!(2));
        assert_eq!(wire["data"][0]["items"].as_array().map(Vec::len), Some(2));
        assert_eq!(wire["summary"], json!({"open": 2}));
        assert_eq!(wire["totalCount"], json!(2));
    }
}
