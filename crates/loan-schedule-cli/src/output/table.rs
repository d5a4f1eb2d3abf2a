use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::{flatten_scalars, payload, row_headers, row_sets, scalar_text};

/// Summary fields as a Field/Value table, followed by one table per row set
/// (installments, allocations, failures) and the envelope's warnings.
pub fn print_table(value: &Value) {
    let body = payload(value);
    let Value::Object(map) = body else {
        println!("{}", scalar_text(body));
        return;
    };

    let summary = flatten_scalars(map);
    if !summary.is_empty() {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in &summary {
            builder.push_record([key.as_str(), val.as_str()]);
        }
        println!("{}", Table::from(builder));
    }

    for (name, rows) in row_sets(map) {
        println!("\n{}:", name);
        print_rows(rows);
    }

    if let Some(Value::Array(warnings)) = value.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = value.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_rows(rows: &[Value]) {
    let headers = row_headers(rows);
    let mut builder = Builder::default();
    builder.push_record(&headers);

    for row in rows {
        let cells: Vec<String> = headers
            .iter()
            .map(|h| row.get(h.as_str()).map(scalar_text).unwrap_or_default())
            .collect();
        builder.push_record(cells);
    }

    println!("{}", Table::from(builder));
}
