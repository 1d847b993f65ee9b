use serde_json::Value;

use super::result_of;

/// JSON pointers into the result, most significant first.
const PRIORITY_FIELDS: [&str; 5] = [
    "/class",
    "/net_profit/row/totals/actual",
    "/cash_balance/closing_balance",
    "/closing_balance",
    "/default",
];

/// Print just the key answer value from the output.
///
/// Statement views answer with the last row's actual (net profit, or the
/// last total when the view has no net line). Lists print one line per entry.
pub fn print_minimal(value: &Value) {
    for line in minimal_lines(result_of(value)) {
        println!("{}", line);
    }
}

fn minimal_lines(result: &Value) -> Vec<String> {
    if let Some(Value::Array(rows)) = result.get("rows") {
        return rows
            .last()
            .map(|row| vec![format_minimal(&row["actual"])])
            .unwrap_or_default();
    }

    for pointer in PRIORITY_FIELDS {
        if let Some(val) = result.pointer(pointer) {
            if !val.is_null() {
                return vec![format_minimal(val)];
            }
        }
    }

    match result {
        Value::Array(entries) => entries.iter().map(entry_line).collect(),
        Value::Object(map) => map
            .iter()
            .next()
            .map(|(key, val)| vec![format!("{}: {}", key, format_minimal(val))])
            .unwrap_or_default(),
        other => vec![format_minimal(other)],
    }
}

/// `name value` for mix and trend entries.
fn entry_line(entry: &Value) -> String {
    let label = entry
        .get("name")
        .or_else(|| entry.get("season"))
        .map(format_minimal)
        .unwrap_or_default();
    match entry.get("value") {
        Some(v) => format!("{} {}", label, format_minimal(v)),
        None => format_minimal(entry),
    }
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
