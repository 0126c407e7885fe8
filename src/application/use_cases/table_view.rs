use serde::Serialize;

use crate::domain::record::{field_value, Record};

/// Display-ready table: every cell is a string, empty values replaced by the
/// placeholder. Export does not go through this type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableView {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableView {
    pub fn build(headers: &[String], records: &[Record], placeholder: &str) -> Self {
        let rows = records
            .iter()
            .map(|record| {
                headers
                    .iter()
                    .map(|h| display_cell(field_value(record, h), placeholder))
                    .collect()
            })
            .collect();

        Self {
            headers: headers.to_vec(),
            rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Tab-separated rendering with a leading row number column.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push('#');
        for header in &self.headers {
            out.push('\t');
            out.push_str(header);
        }
        for (idx, row) in self.rows.iter().enumerate() {
            out.push('\n');
            out.push_str(&idx.to_string());
            for cell in row {
                out.push('\t');
                out.push_str(cell);
            }
        }
        out
    }
}

pub fn display_cell(value: &str, placeholder: &str) -> String {
    if value.is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    }
}
