use serde_json::Value;
use std::io::{self, Write};

use club_finance_core::report::SeasonReport;
use club_finance_core::rollup::GroupLevel;

use super::{format_value, result_of};

/// Write output as CSV to stdout.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());
    write_csv(&mut wtr, value);
    let _ = wtr.flush();
}

fn write_csv<W: Write>(wtr: &mut csv::Writer<W>, value: &Value) {
    let result = result_of(value);

    // Statement views carry their rows; a full report is flattened to item level.
    if let Some(Value::Array(rows)) = result.get("rows") {
        write_array_csv(wtr, rows);
        return;
    }
    if let Ok(report) = serde_json::from_value::<SeasonReport>(result.clone()) {
        let rows = report.statement_rows(GroupLevel::Item);
        if let Ok(Value::Array(rows)) = serde_json::to_value(rows) {
            write_array_csv(wtr, &rows);
        }
        return;
    }

    match result {
        Value::Object(map) => {
            let _ = wtr.write_record(["field", "value"]);
            for (key, val) in map {
                let _ = wtr.write_record([key.as_str(), &format_value(val)]);
            }
        }
        Value::Array(arr) => write_array_csv(wtr, arr),
        _ => {
            let _ = wtr.write_record([&format_value(result)]);
        }
    }
}

fn write_array_csv<W: Write>(wtr: &mut csv::Writer<W>, arr: &[Value]) {
    if arr.is_empty() {
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
        let _ = wtr.write_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(format_value).unwrap_or_default())
                    .collect();
                let _ = wtr.write_record(&row);
            }
        }
    } else {
        for item in arr {
            let _ = wtr.write_record([&format_value(item)]);
        }
    }
}
