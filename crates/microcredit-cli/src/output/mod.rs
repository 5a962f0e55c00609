pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Locate the amortization rows in an output value, wherever the command
/// nested them: a bare schedule (`rows`), or a simulation result
/// (`result.schedule.rows`).
pub fn find_schedule_rows(value: &Value) -> Option<&Vec<Value>> {
    let candidates = [
        value.pointer("/rows"),
        value.pointer("/schedule/rows"),
        value.pointer("/result/schedule/rows"),
    ];
    candidates
        .into_iter()
        .flatten()
        .find_map(|v| v.as_array())
}
