use serde_json::Value;

/// Print just the headline figures from the output.
///
/// For a simulation that is the payment, the total, and the compliance
/// status; for other commands, the first well-known field that is present.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    // A simulation result: payment / total / status on one line each
    if let Some(schedule) = result_obj.get("schedule") {
        if let Some(payment) = schedule.get("periodic_payment") {
            println!("periodic_payment: {}", format_minimal(payment));
        }
        if let Some(total) = schedule.get("total_paid") {
            println!("total_paid: {}", format_minimal(total));
        }
        if let Some(status) = result_obj.get("compliance") {
            println!("compliance: {}", format_minimal(status));
        }
        if let Some(reduced) = result_obj.get("reduced_term_periods") {
            if !reduced.is_null() {
                println!("reduced_term_periods: {}", format_minimal(reduced));
            }
        }
        return;
    }

    // Priority list of key output fields for the other commands
    let priority_keys = [
        "periodic_payment",
        "total_paid",
        "periodic_rate",
        "annual_rate",
        "status",
    ];

    if let Value::Object(map) = result_obj {
        for key in &priority_keys {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    println!("{}", format_minimal(val));
                    return;
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    println!("{}", format_minimal(result_obj));
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
