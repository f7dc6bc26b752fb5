//! File renderers behind `GET /api/{collection}/export`

mod csv_export;
mod pdf;

use contracts::shared::table::ExportFormat;
use serde_json::{Map, Value};

pub use csv_export::render_csv;
pub use pdf::render_pdf;

/// Rows to export, already filtered and sorted, with the columns to print
pub struct ExportTable<'a> {
    pub title: &'a str,
    pub columns: &'a [String],
    pub rows: &'a [Map<String, Value>],
}

impl ExportTable<'_> {
    /// Cell texts of one row in column order
    pub fn cells(&self, row: &Map<String, Value>) -> Vec<String> {
        self.columns
            .iter()
            .map(|key| cell_text(row.get(key)))
            .collect()
    }
}

/// Plain-text form of a stored value; empty for null
pub fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => other.to_string(),
    }
}

pub fn render(format: ExportFormat, table: &ExportTable) -> anyhow::Result<Vec<u8>> {
    match format {
        ExportFormat::Csv => render_csv(table),
        ExportFormat::Pdf => Ok(render_pdf(table)),
    }
}
