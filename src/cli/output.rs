//! Table output formatting for CLI commands

use comfy_table::{presets, Attribute, Cell, ContentArrangement, Table};
use serde_json::Value;
use std::collections::HashMap;

use crate::domain::models::CacheStats;

const VALUE_PREVIEW_LEN: usize = 60;

fn base_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Truncate a string to a maximum length, appending "..." if truncated.
fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len.saturating_sub(3)])
    }
}

/// Format a batched lookup result as a table, one row per requested key.
///
/// Keys absent from the result map never matched a row; keys mapped to
/// `None` matched a row that had expired.
pub fn format_entries(results: &HashMap<String, Option<Value>>, requested: &[String]) -> String {
    let mut table = base_table();
    table.set_header(vec![
        Cell::new("Key").add_attribute(Attribute::Bold),
        Cell::new("Status").add_attribute(Attribute::Bold),
        Cell::new("Value").add_attribute(Attribute::Bold),
    ]);

    for key in requested {
        match results.get(key) {
            Some(Some(value)) => {
                let rendered = serde_json::to_string(value).unwrap_or_default();
                table.add_row(vec![
                    key.clone(),
                    "hit".to_string(),
                    truncate(&rendered, VALUE_PREVIEW_LEN),
                ]);
            }
            Some(None) => {
                table.add_row(vec![key.clone(), "expired".to_string(), String::new()]);
            }
            None => {
                table.add_row(vec![key.clone(), "miss".to_string(), String::new()]);
            }
        }
    }

    table.to_string()
}

/// Format the stats descriptor; unsupported fields render as "n/a".
pub fn format_stats(stats: &CacheStats) -> String {
    let render = |v: Option<u64>| v.map_or_else(|| "n/a".to_string(), |n| n.to_string());

    let mut table = base_table();
    table.set_header(vec![
        Cell::new("Metric").add_attribute(Attribute::Bold),
        Cell::new("Value").add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec!["Hits".to_string(), render(stats.hits)]);
    table.add_row(vec!["Misses".to_string(), render(stats.misses)]);
    table.add_row(vec!["Uptime (s)".to_string(), render(stats.uptime)]);
    table.add_row(vec!["Memory usage".to_string(), render(stats.memory_usage)]);
    table.add_row(vec![
        "Memory available".to_string(),
        render(stats.memory_available),
    ]);

    table.to_string()
}
