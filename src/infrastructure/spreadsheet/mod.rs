// ============================================================
// SPREADSHEET INFRASTRUCTURE LAYER
// ============================================================
// Decode spreadsheet files into records and encode records back out.

mod xlsx_reader;
mod xlsx_writer;

use std::path::Path;

use crate::domain::error::{AppError, Result};
use crate::domain::record::Record;
use crate::infrastructure::csv::CsvCodec;

pub use xlsx_reader::decode_workbook;
pub use xlsx_writer::XlsxExporter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpreadsheetFormat {
    Xlsx,
    Csv,
}

impl SpreadsheetFormat {
    /// Chosen by extension; anything that is not `.csv` goes to calamine,
    /// which sniffs xlsx/xls/ods itself.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("csv") => SpreadsheetFormat::Csv,
            _ => SpreadsheetFormat::Xlsx,
        }
    }
}

/// Read a file and decode its first sheet. Nothing is retried; the caller
/// decides what to do with a failure.
pub async fn import_file(path: &Path) -> Result<Vec<Record>> {
    let bytes = tokio::fs::read(path).await.map_err(|e| {
        AppError::FileReadFailure(format!("{}: {}", path.display(), e))
    })?;

    let format = SpreadsheetFormat::from_path(path);
    tokio::task::spawn_blocking(move || decode_bytes(bytes, format))
        .await
        .map_err(|e| AppError::ImportDecodeFailure(format!("decode task failed: {}", e)))?
}

pub fn decode_bytes(bytes: Vec<u8>, format: SpreadsheetFormat) -> Result<Vec<Record>> {
    let rows = match format {
        SpreadsheetFormat::Xlsx => decode_workbook(bytes)?,
        SpreadsheetFormat::Csv => CsvCodec::new().decode_rows(&bytes)?,
    };
    Ok(rows_to_records(rows))
}

/// First row is the header row; each following row becomes one record keyed
/// by header text. Blank header cells drop their column, repeated header
/// names get `_1`, `_2`, ... suffixes, empty cells add no key, and rows with
/// no values are skipped.
pub fn rows_to_records(rows: Vec<Vec<String>>) -> Vec<Record> {
    let mut rows = rows.into_iter();
    let Some(header_row) = rows.next() else {
        return Vec::new();
    };
    let headers = dedupe_headers(&header_row);

    rows.filter_map(|row| {
        let mut record = Record::new();
        for (idx, cell) in row.into_iter().enumerate() {
            let Some(Some(header)) = headers.get(idx) else {
                continue;
            };
            if cell.is_empty() {
                continue;
            }
            record.insert(header.clone(), cell);
        }
        (!record.is_empty()).then_some(record)
    })
    .collect()
}

fn dedupe_headers(header_row: &[String]) -> Vec<Option<String>> {
    let mut seen: Vec<String> = Vec::new();
    header_row
        .iter()
        .map(|cell| {
            let base = cell.trim();
            if base.is_empty() {
                return None;
            }
            let mut name = base.to_string();
            let mut n = 0;
            while seen.contains(&name) {
                n += 1;
                name = format!("{}_{}", base, n);
            }
            seen.push(name.clone());
            Some(name)
        })
        .collect()
}
