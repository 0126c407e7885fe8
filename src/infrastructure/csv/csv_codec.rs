// ============================================================
// CSV CODEC
// ============================================================
// Read CSV bytes into raw rows (UTF-8 or GBK) and write records back out.

use std::path::Path;

use csv::{ReaderBuilder, Trim, WriterBuilder};

use crate::domain::error::{AppError, Result};
use crate::domain::record::{row_values, Record};

const UTF8_BOM: &str = "\u{FEFF}";

/// CSV reader/writer. Reading detects the delimiter, writing uses commas.
pub struct CsvCodec {
    /// Prefix exports with a UTF-8 BOM so spreadsheet software picks the
    /// right encoding
    write_bom: bool,
}

impl Default for CsvCodec {
    fn default() -> Self {
        Self { write_bom: true }
    }
}

impl CsvCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bom(mut self, write_bom: bool) -> Self {
        self.write_bom = write_bom;
        self
    }

    /// Every row including the header row, cells trimmed.
    pub fn decode_rows(&self, bytes: &[u8]) -> Result<Vec<Vec<String>>> {
        let content = decode_text(bytes);
        let delimiter = Self::detect_delimiter(&content);

        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .trim(Trim::All)
            .flexible(true)
            .from_reader(content.as_bytes());

        let mut rows = Vec::new();
        for (index, result) in reader.records().enumerate() {
            let record = result.map_err(|e| {
                AppError::ImportDecodeFailure(format!(
                    "Failed to parse CSV row {}: {}",
                    index + 1,
                    e
                ))
            })?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        Ok(rows)
    }

    pub fn encode(&self, headers: &[String], records: &[Record]) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        if self.write_bom {
            buffer.extend_from_slice(UTF8_BOM.as_bytes());
        }

        let mut writer = WriterBuilder::new().from_writer(buffer);

        let to_export_err = |e: csv::Error| AppError::ExportFailure(e.to_string());
        writer.write_record(headers).map_err(to_export_err)?;
        for record in records {
            writer
                .write_record(row_values(headers, record))
                .map_err(to_export_err)?;
        }

        writer
            .into_inner()
            .map_err(|e| AppError::ExportFailure(e.to_string()))
    }

    pub fn write_to_file(&self, path: &Path, headers: &[String], records: &[Record]) -> Result<()> {
        let bytes = self.encode(headers, records)?;
        std::fs::write(path, bytes)
            .map_err(|e| AppError::ExportFailure(format!("{}: {}", path.display(), e)))
    }

    /// Detect delimiter from content (comma, semicolon, tab, pipe)
    pub fn detect_delimiter(content: &str) -> u8 {
        let candidates = [b',', b';', b'\t', b'|'];
        let sample_lines: Vec<_> = content.lines().take(10).collect();

        let mut best_delimiter = b',';
        let mut best_score = 0.0f32;

        if sample_lines.is_empty() {
            return best_delimiter;
        }

        for &delimiter in &candidates {
            let field_counts: Vec<usize> = sample_lines
                .iter()
                .map(|line| line.bytes().filter(|&b| b == delimiter).count())
                .collect();

            // Score by consistency (low standard deviation) and frequency
            let avg = field_counts.iter().sum::<usize>() as f32 / field_counts.len() as f32;
            let variance = field_counts
                .iter()
                .map(|&x| (x as f32 - avg).powi(2))
                .sum::<f32>()
                / field_counts.len() as f32;

            let score = avg / (1.0 + variance.sqrt());
            if score > best_score {
                best_score = score;
                best_delimiter = delimiter;
            }
        }

        best_delimiter
    }
}

/// UTF-8 first (BOM stripped), then GBK, then lossy UTF-8.
fn decode_text(bytes: &[u8]) -> String {
    if let Ok(content) = std::str::from_utf8(bytes) {
        return content.trim_start_matches(UTF8_BOM).to_string();
    }

    let (decoded, _, had_errors) = encoding_rs::GBK.decode(bytes);
    if !had_errors {
        tracing::debug!("decoded CSV as GBK");
        return decoded.into_owned();
    }

    String::from_utf8_lossy(bytes).into_owned()
}
