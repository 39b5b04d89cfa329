//! Output formatting helpers for CLI commands

use crate::chart::{ChartRow, ChartTable};
use crate::model::{LogEntry, SummaryData};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use serde_json::json;

/// Colorize a status code the way the dashboard does: 2xx green,
/// 3xx blue, 4xx yellow, 5xx red.
fn status_cell(status: u16) -> String {
    let text = status.to_string();
    match status {
        200..=299 => text.green().to_string(),
        300..=399 => text.blue().to_string(),
        400..=499 => text.yellow().to_string(),
        500..=599 => text.red().to_string(),
        _ => text,
    }
}

fn method_cell(method: &str) -> String {
    match method.to_uppercase().as_str() {
        "GET" => method.blue().to_string(),
        "POST" => method.green().to_string(),
        "PUT" => method.yellow().to_string(),
        "DELETE" => method.red().to_string(),
        _ => method.to_string(),
    }
}

/// Format a page of log entries as a table
pub fn format_logs_table(logs: &[LogEntry], page: u64) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "Timestamp", "Host", "Method", "Request", "Status", "Bytes", "User",
    ]);

    for entry in logs {
        table.add_row(vec![
            Cell::new(&entry.timestamp),
            Cell::new(&entry.host),
            Cell::new(method_cell(&entry.method)),
            Cell::new(&entry.request),
            Cell::new(status_cell(entry.status)),
            Cell::new(entry.bytes),
            Cell::new(&entry.user_identifier),
        ]);
    }

    format!("{}\nPage {} ({} entries)", table, page, logs.len())
}

/// Format log entries as JSON
pub fn format_logs_json(logs: &[LogEntry]) -> String {
    serde_json::to_string_pretty(&json!({ "logs": logs })).unwrap_or_default()
}

/// Format chart rows as a table, one row per bucket
pub fn format_chart_table(table: &ChartTable) -> String {
    let rows = match table {
        ChartTable::NoData => return "No data available".to_string(),
        ChartTable::Rows(rows) => rows,
    };

    let mut out = Table::new();
    out.load_preset(UTF8_FULL);
    out.set_content_arrangement(ContentArrangement::Dynamic);

    let mut header = vec!["Bucket".to_string()];
    if let Some(first) = rows.first() {
        header.extend(first.cells.iter().map(|(label, _)| label.clone()));
    }
    out.set_header(header);

    for row in rows {
        let mut cells = vec![Cell::new(&row.bucket)];
        cells.extend(row.cells.iter().map(|(_, value)| Cell::new(value)));
        out.add_row(cells);
    }

    out.to_string()
}

/// Format chart rows as JSON
pub fn format_chart_json(table: &ChartTable) -> String {
    let value = match table {
        ChartTable::NoData => json!({ "rows": serde_json::Value::Null }),
        ChartTable::Rows(rows) => json!({
            "rows": rows.iter().map(row_json).collect::<Vec<_>>()
        }),
    };
    serde_json::to_string_pretty(&value).unwrap_or_default()
}

fn row_json(row: &ChartRow) -> serde_json::Value {
    let mut obj = serde_json::Map::new();
    obj.insert("bucket".to_string(), json!(row.bucket));
    for (label, value) in &row.cells {
        obj.insert(label.clone(), json!(value));
    }
    serde_json::Value::Object(obj)
}

/// Format summary statistics, top five status codes first
pub fn format_summary(summary: &SummaryData) -> String {
    let mut out = String::new();
    out.push_str(&format!("Total requests:        {}\n", summary.total_requests));
    out.push_str(&format!(
        "Average response size: {:.2} bytes\n",
        summary.average_response_size
    ));

    out.push_str("\nTop status codes:\n");
    for (status, count) in summary.top_statuses(5) {
        let colored_status = status
            .parse::<u16>()
            .map(status_cell)
            .unwrap_or_else(|_| status.to_string());
        out.push_str(&format!(
            "  {:>8}  {:>8}  ({:.1}%)\n",
            colored_status,
            count,
            summary.percentage(count)
        ));
    }

    out.push_str("\nMethods:\n");
    for (method, count) in summary.top_methods(usize::MAX) {
        out.push_str(&format!(
            "  {:>8}  {:>8}  ({:.1}%)\n",
            method_cell(method),
            count,
            summary.percentage(count)
        ));
    }

    out
}

/// Format summary statistics as JSON
pub fn format_summary_json(summary: &SummaryData) -> String {
    serde_json::to_string_pretty(summary).unwrap_or_default()
}
