#[cfg(test)]
mod tests {
    use serde_json::json;
    use vantage::export::to_csv;
    use vantage::store::record;

    #[test]
    fn test_empty_input_produces_empty_output() {
        assert_eq!(to_csv(&[]), "");
    }

    #[test]
    fn test_plain_table() {
        let rows = vec![
            record(json!({"name": "Acme", "value": 300, "won": true})),
            record(json!({"name": "Borealis", "value": 125.5, "won": false})),
        ];
        insta::assert_snapshot!(to_csv(&rows), @r"
        name,value,won
        Acme,300,true
        Borealis,125.5,false
        ");
    }

    #[test]
    fn test_quoting_only_when_needed() {
        let rows = vec![record(json!({
            "plain": "no quoting",
            "comma": "a, b",
            "quote": "say \"hi\"",
            "newline": "line one\nline two"
        }))];
        let text = to_csv(&rows);
        let mut lines = text.splitn(2, '\n');
        assert_eq!(lines.next(), Some("plain,comma,quote,newline"));
        assert_eq!(
            lines.next(),
            Some("no quoting,\"a, b\",\"say \"\"hi\"\"\",\"line one\nline two\"")
        );
    }

    #[test]
    fn test_nulls_and_missing_keys_become_empty_cells() {
        let rows = vec![
            record(json!({"a": "x", "b": null, "c": 1})),
            record(json!({"a": "y", "c": 2})),
        ];
        assert_eq!(to_csv(&rows), "a,b,c\nx,,1\ny,,2");
    }

    #[test]
    fn test_headers_come_from_the_first_row_only() {
        let rows = vec![
            record(json!({"a": 1, "b": 2})),
            record(json!({"b": 20, "z": 99})),
        ];
        // "z" is not in the first row's keys and is dropped.
        assert_eq!(to_csv(&rows), "a,b\n1,2\n,20");
    }

    #[test]
    fn test_round_trip_preserves_awkward_values() {
        let rows = vec![
            record(json!({"name": "comma, inc", "note": "multi\nline", "motto": "\"onward\""})),
            record(json!({"name": "plain", "note": "", "motto": "none"})),
        ];
        let text = to_csv(&rows);

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(text.as_bytes());
        let headers: Vec<String> = reader
            .headers()
            .expect("headers")
            .iter()
            .map(str::to_string)
            .collect();
        assert_eq!(headers, vec!["name", "note", "motto"]);

        let parsed: Vec<Vec<String>> = reader
            .records()
            .map(|r| r.expect("record").iter().map(str::to_string).collect())
            .collect();
        assert_eq!(
            parsed,
            vec![
                vec!["comma, inc", "multi\nline", "\"onward\""],
                vec!["plain", "", "none"],
            ]
        );
    }
}
