use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};

use crate::domain::error::{AppError, Result};

/// Decode the first worksheet into rows of display strings.
pub fn decode_workbook(bytes: Vec<u8>) -> Result<Vec<Vec<String>>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| AppError::ImportDecodeFailure(format!("Failed to open workbook: {}", e)))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AppError::ImportDecodeFailure("No worksheet found".to_string()))?
        .map_err(|e| AppError::ImportDecodeFailure(format!("Failed to read sheet: {}", e)))?;

    let rows: Vec<Vec<String>> = range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect();

    tracing::debug!(rows = rows.len(), "decoded worksheet");
    Ok(rows)
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        // f64 Display drops a trailing ".0" for integral values.
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        other => other.to_string(),
    }
}
