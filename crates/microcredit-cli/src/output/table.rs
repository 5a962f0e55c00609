use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::find_schedule_rows;

/// Columns for the amortization table, in display order.
const ROW_COLUMNS: [&str; 7] = [
    "period",
    "payment_date",
    "interest",
    "capital",
    "insurance",
    "total_payment",
    "remaining_balance",
];

/// Format output as tables: a summary of the scalar fields, then the
/// amortization rows when the command produced a schedule.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            let result = map.get("result").unwrap_or(value);
            print_summary_table(result);

            if let Some(rows) = find_schedule_rows(value) {
                if !rows.is_empty() {
                    println!();
                    print_schedule_table(rows);
                }
            }

            print_envelope_notes(map);
        }
        Value::Array(arr) => print_array_table(arr),
        _ => println!("{}", value),
    }
}

/// Scalar fields of the result, with nested schedule totals lifted up and
/// the row array left to its own table.
fn print_summary_table(result: &Value) {
    let Value::Object(map) = result else {
        println!("{}", result);
        return;
    };

    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);

    for (key, val) in map {
        match val {
            Value::Object(nested) if key == "schedule" => {
                for (nested_key, nested_val) in nested {
                    if nested_key == "rows" {
                        continue;
                    }
                    builder.push_record([nested_key.as_str(), &format_value(nested_val)]);
                }
            }
            Value::Array(_) if key == "rows" => continue,
            _ => builder.push_record([key.as_str(), &format_value(val)]),
        }
    }

    println!("{}", Table::from(builder));
}

fn print_schedule_table(rows: &[Value]) {
    // Hide the date column when no row carries one
    let has_dates = rows
        .iter()
        .any(|r| r.get("payment_date").map(|d| !d.is_null()).unwrap_or(false));
    let columns: Vec<&str> = ROW_COLUMNS
        .iter()
        .copied()
        .filter(|c| *c != "payment_date" || has_dates)
        .collect();

    let mut builder = Builder::default();
    builder.push_record(columns.clone());

    for row in rows {
        if let Value::Object(map) = row {
            let record: Vec<String> = columns
                .iter()
                .map(|c| map.get(*c).map(format_value).unwrap_or_default())
                .collect();
            builder.push_record(record);
        }
    }

    println!("{}", Table::from(builder));
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(format_value).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }

        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", format_value(item));
        }
    }
}

fn print_envelope_notes(envelope: &serde_json::Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
