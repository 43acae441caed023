//! Output rendering
//!
//! Tables use the column definitions from the resource registry; JSON and
//! YAML print the objects as the API returned them.

use anyhow::Result;
use clap::ValueEnum;
use scm_sdk::resource::model::attribute_values;
use scm_sdk::resource::ColumnDef;
use serde_json::Value;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}

/// Columns of `job` and `jobs` output
pub fn job_columns() -> Vec<ColumnDef> {
    [
        ("ID", "id", 8),
        ("TYPE", "type_str", 16),
        ("STATUS", "status_str", 8),
        ("RESULT", "result_str", 8),
        ("PERCENT", "percent", 8),
        ("STARTED", "start_ts", 20),
        ("DESCRIPTION", "description", 40),
    ]
    .into_iter()
    .map(|(header, path, width)| ColumnDef {
        header: header.to_string(),
        json_path: path.to_string(),
        width,
    })
    .collect()
}

/// Render a list of items
pub fn render_list(items: &[Value], columns: &[ColumnDef], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(render_table(items, columns)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(items)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(items)?),
    }
}

/// Render a single item; tables show one field per line
pub fn render_item(item: &Value, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(render_fields(item)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(item)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(item)?),
    }
}

/// Fixed-width table with a header row
pub fn render_table(items: &[Value], columns: &[ColumnDef]) -> String {
    let mut lines = Vec::with_capacity(items.len() + 1);

    let header: Vec<String> = columns
        .iter()
        .map(|col| pad(&col.header, col.width as usize))
        .collect();
    lines.push(header.join(" ").trim_end().to_string());

    for item in items {
        let row: Vec<String> = columns
            .iter()
            .map(|col| {
                let width = col.width as usize;
                pad(&truncate_string(&cell_value(item, &col.json_path), width), width)
            })
            .collect();
        lines.push(row.join(" ").trim_end().to_string());
    }

    lines.join("\n")
}

fn render_fields(item: &Value) -> String {
    let Value::Object(map) = item else {
        return cell_value(item, "");
    };

    let key_width = map.keys().map(|k| k.len()).max().unwrap_or(0);
    map.iter()
        .map(|(key, value)| format!("{:width$}  {}", key, display_value(value), width = key_width))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Display text of the value at a dot-separated path
pub fn cell_value(item: &Value, path: &str) -> String {
    if path.is_empty() {
        return display_value(item);
    }
    match attribute_values(item, path) {
        Some(values) if !values.is_empty() => values.join(","),
        _ => "-".to_string(),
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "-".to_string(),
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(_) => "[object]".to_string(),
    }
}

fn pad(s: &str, width: usize) -> String {
    format!("{:width$}", s, width = width)
}

fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    } else {
        s.to_string()
    }
}
