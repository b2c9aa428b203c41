//! CSV export.
//!
//! Serializes an arbitrary record set to UTF-8, comma-delimited text. The
//! header row is inferred from the first record's keys; later rows are
//! serialized positionally by that same key order, with keys missing from
//! a row emitted as empty cells. Cells are quoted only when they contain a
//! comma, a double quote, or a newline. Rows are joined by `\n`; empty
//! input yields an empty string with no header.

use serde_json::Value;

use crate::store::Record;

/// Encode rows as CSV text.
pub fn to_csv(rows: &[Record]) -> String {
    if rows.is_empty() {
        return String::new();
    }

    let headers: Vec<&str> = rows[0].keys().map(String::as_str).collect();

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer
        .write_record(&headers)
        .expect("write to memory cannot fail");
    for row in rows {
        let cells: Vec<String> = headers.iter().map(|h| cell(row.get(*h))).collect();
        writer
            .write_record(&cells)
            .expect("write to memory cannot fail");
    }

    let bytes = writer
        .into_inner()
        .expect("flush to memory cannot fail");
    let mut text = String::from_utf8(bytes).expect("csv output is utf-8");
    // Rows are joined by the terminator, not trailed by it.
    if text.ends_with('\n') {
        text.pop();
    }
    text
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
