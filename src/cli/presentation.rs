//! CLI presentation: page tables, id lists and JSON renderings of list snapshots.

use crate::config::Customization;
use crate::error::ListError;
use crate::types::{Item, ItemId};
use crate::views::ListSnapshot;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde_json::{json, Value};

/// Format a section heading with bold/underline.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

/// Column names for a page: `id` first, then the keys of the first record in order.
fn columns(elements: &[Item]) -> Vec<String> {
    let mut columns = vec!["id".to_string()];
    if let Some(Value::Object(record)) = elements.first().map(|item| &item.record) {
        columns.extend(record.keys().filter(|key| *key != "id").cloned());
    }
    columns
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "-".to_string(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

/// Render one loaded page as a table with count summary and page report.
pub fn format_page_text(snapshot: &ListSnapshot, customization: &Customization) -> String {
    let mut out = String::new();
    let heading = match snapshot.page_report(customization) {
        Some(report) => report.to_string(),
        None => "Items".to_string(),
    };
    out.push_str(&format!("{}\n\n", format_section_heading(&heading)));

    if let Some(notice) = &snapshot.last_error {
        out.push_str(&format!(
            "  {} {}\n\n",
            "error:".red().bold(),
            notice.message_or("Request failed")
        ));
    }

    if snapshot.elements.is_empty() {
        out.push_str("  No items found.\n");
    } else {
        let columns = columns(&snapshot.elements);
        let mut table = Table::new();
        table.load_preset(UTF8_BORDERS_ONLY);
        table.set_header(columns.clone());
        for item in &snapshot.elements {
            let row: Vec<String> = columns
                .iter()
                .map(|column| {
                    if column == "id" {
                        item.id.to_string()
                    } else {
                        cell(item.record.get(column))
                    }
                })
                .collect();
            table.add_row(row);
        }
        out.push_str(&format!("{}\n", table));
    }

    if let Some(summary) = snapshot.count_summary(customization) {
        out.push_str(&format!("\n{}\n", summary.dimmed()));
    }
    out
}

pub fn format_page_json(snapshot: &ListSnapshot) -> Result<String, ListError> {
    let out = json!({
        "elements": snapshot.elements.iter().map(|item| &item.record).collect::<Vec<_>>(),
        "total": snapshot.total_count,
        "page": snapshot.cursor.as_ref().map(|cursor| &cursor.current_page_marker),
        "next": snapshot.cursor.as_ref().and_then(|cursor| cursor.next_token.as_ref()),
        "prev": snapshot.cursor.as_ref().and_then(|cursor| cursor.prev_token.as_ref()),
        "error": snapshot.last_error.as_ref().and_then(|notice| notice.message.as_ref()),
    });
    serde_json::to_string_pretty(&out).map_err(|e| ListError::Decode(e.to_string()))
}

pub fn format_ids(ids: &[ItemId]) -> String {
    if ids.is_empty() {
        return "No matching items.".to_string();
    }
    let mut lines: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
    lines.push(format!("{} ids", ids.len()).dimmed().to_string());
    lines.join("\n")
}
