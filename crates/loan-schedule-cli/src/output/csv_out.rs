use serde_json::Value;
use std::io;

use super::{flatten_scalars, payload, row_headers, row_sets, scalar_text};

/// Write output as CSV to stdout.
///
/// The first row set (the installments for schedules and sweeps) becomes
/// one CSV record per row; results without one fall back to field/value
/// pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let body = payload(value);
    match body {
        Value::Object(map) => match row_sets(map).first() {
            Some((_, rows)) => write_rows(&mut wtr, rows),
            None => {
                let _ = wtr.write_record(["field", "value"]);
                for (key, val) in flatten_scalars(map) {
                    let _ = wtr.write_record([key.as_str(), val.as_str()]);
                }
            }
        },
        Value::Array(rows) => write_rows(&mut wtr, rows),
        other => {
            let _ = wtr.write_record([scalar_text(other)]);
        }
    }

    let _ = wtr.flush();
}

fn write_rows(wtr: &mut csv::Writer<io::StdoutLock<'_>>, rows: &[Value]) {
    if rows.is_empty() {
        return;
    }

    let headers = row_headers(rows);
    let _ = wtr.write_record(&headers);
    for row in rows {
        let cells: Vec<String> = headers
            .iter()
            .map(|h| row.get(h.as_str()).map(scalar_text).unwrap_or_default())
            .collect();
        let _ = wtr.write_record(&cells);
    }
}
