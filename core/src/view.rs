//! Text rendering of the collection mirror.
//!
//! Pure functions: they take state and return a string, nothing else.

use serde_json::Value;

use crate::types::Item;

const EMPTY: &str = "(no items)";

/// Render items as an aligned table. Columns are `id` followed by every
/// field name in first-seen order; missing cells stay blank.
pub fn render_table(items: &[Item]) -> String {
    if items.is_empty() {
        return EMPTY.to_string();
    }

    let mut columns: Vec<&str> = vec!["id"];
    for item in items {
        for key in item.fields.keys() {
            if !columns.contains(&key.as_str()) {
                columns.push(key);
            }
        }
    }

    let rows: Vec<Vec<String>> = items
        .iter()
        .map(|item| {
            columns
                .iter()
                .map(|&column| match column {
                    "id" => item.id.to_string(),
                    name => item.field(name).map(render_value).unwrap_or_default(),
                })
                .collect()
        })
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            rows.iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(column.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let header: Vec<String> = columns.iter().map(|c| c.to_string()).collect();
    std::iter::once(&header)
        .chain(rows.iter())
        .map(|row| format_row(row, &widths))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render a single item as `key: value` lines, `id` first.
pub fn render_item(item: &Item) -> String {
    std::iter::once(format!("id: {}", item.id))
        .chain(
            item.fields
                .iter()
                .map(|(key, value)| format!("{key}: {}", render_value(value))),
        )
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_row(cells: &[String], widths: &[usize]) -> String {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| {
            let pad = width - cell.chars().count();
            format!("{cell}{}", " ".repeat(pad))
        })
        .collect::<Vec<_>>()
        .join("  ");
    line.trim_end().to_string()
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
