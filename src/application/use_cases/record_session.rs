// ============================================================
// RECORD SESSION USE CASE
// ============================================================
// Owns the in-memory record list and drives parse / add / delete /
// import / export. Every mutation is all-or-nothing: on error the record
// list is left exactly as it was.

use std::path::{Path, PathBuf};

use crate::application::use_cases::record_parser::RecordParser;
use crate::application::use_cases::schema_policy::{policy_for, SchemaPolicy};
use crate::application::use_cases::table_view::TableView;
use crate::domain::app_config::{AppConfig, SchemaMode};
use crate::domain::error::{AppError, Result};
use crate::domain::record::{record_from_pairs, HeaderList, Record};
use crate::infrastructure::csv::CsvCodec;
use crate::infrastructure::spreadsheet::{self, SpreadsheetFormat, XlsxExporter};
use crate::interfaces::logs::{add_log, new_log_buffer, SharedLogs};

pub struct RecordSession {
    config: AppConfig,
    parser: RecordParser,
    policy: Box<dyn SchemaPolicy>,
    records: Vec<Record>,
    input_text: String,
    last_error: Option<String>,
    logs: SharedLogs,
}

impl RecordSession {
    pub fn new(config: AppConfig) -> Result<Self> {
        config.validate()?;
        let parser = RecordParser::new(&config.identifier_marker)?;
        let policy = policy_for(&config);
        Ok(Self::with_policy(config, parser, policy))
    }

    /// Use a specific policy instead of the one named by `config.schema_mode`.
    pub fn with_policy(
        config: AppConfig,
        parser: RecordParser,
        policy: Box<dyn SchemaPolicy>,
    ) -> Self {
        Self {
            config,
            parser,
            policy,
            records: Vec::new(),
            input_text: String::new(),
            last_error: None,
            logs: new_log_buffer(),
        }
    }

    pub fn mode(&self) -> SchemaMode {
        self.policy.mode()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn logs(&self) -> SharedLogs {
        self.logs.clone()
    }

    pub fn input_text(&self) -> &str {
        &self.input_text
    }

    pub fn set_input_text(&mut self, text: impl Into<String>) {
        self.input_text = text.into();
    }

    /// Message of the most recent failed operation, cleared when the next
    /// operation starts.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Recomputed from the current records on every call.
    pub fn headers(&self) -> HeaderList {
        self.policy.headers(&self.records)
    }

    pub fn table(&self) -> TableView {
        TableView::build(&self.headers(), &self.records, &self.config.placeholder)
    }

    /// Fields a manual-entry form should offer. Empty means free-form
    /// key/value entry.
    pub fn form_fields(&self) -> HeaderList {
        self.headers()
    }

    fn fail<T>(&mut self, source: &str, err: AppError) -> Result<T> {
        add_log(&self.logs, "ERROR", source, &err.to_string());
        self.last_error = Some(err.to_string());
        Err(err)
    }

    /// Parse the held input text and append the records. On success the
    /// input is cleared; on failure it is kept, except for
    /// `NoRecordsFound`, which clears it as well.
    pub fn submit_input(&mut self) -> Result<usize> {
        self.last_error = None;

        let parsed = match self.parser.parse(&self.input_text) {
            Ok(parsed) => parsed,
            Err(err) => {
                if err == AppError::NoRecordsFound {
                    self.input_text.clear();
                }
                return self.fail("PARSE", err);
            }
        };

        let count = parsed.len();
        let canonical: Vec<Record> = parsed
            .into_iter()
            .map(|raw| self.policy.canonicalize(raw))
            .collect();
        self.records.extend(canonical);
        self.input_text.clear();

        add_log(
            &self.logs,
            "INFO",
            "PARSE",
            &format!("Added {} record(s), {} total", count, self.records.len()),
        );
        Ok(count)
    }

    pub fn parse_and_add(&mut self, text: &str) -> Result<usize> {
        self.set_input_text(text);
        self.submit_input()
    }

    /// Manual form submission. Keys and values are trimmed and blank keys
    /// skipped; a submission with nothing left is rejected.
    pub fn add_record<I, K, V>(&mut self, fields: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.last_error = None;

        let raw = record_from_pairs(fields);
        if !self.policy.accepts_any(&raw) {
            return self.fail(
                "RECORD",
                AppError::ValidationError("record needs at least one named field".to_string()),
            );
        }

        let record = self.policy.canonicalize(raw);
        self.records.push(record);
        add_log(
            &self.logs,
            "INFO",
            "RECORD",
            &format!("Added record, {} total", self.records.len()),
        );
        Ok(())
    }

    pub fn delete_record(&mut self, index: usize) -> Result<Record> {
        self.last_error = None;

        if index >= self.records.len() {
            return self.fail(
                "RECORD",
                AppError::NotFound(format!(
                    "record {} (have {})",
                    index,
                    self.records.len()
                )),
            );
        }

        let removed = self.records.remove(index);
        add_log(
            &self.logs,
            "INFO",
            "RECORD",
            &format!("Deleted record {}, {} left", index, self.records.len()),
        );
        Ok(removed)
    }

    /// Replace the record at `index` wholesale. The replacement goes through
    /// the same key mapping as a manual entry.
    pub fn replace_record(&mut self, index: usize, record: Record) -> Result<()> {
        self.last_error = None;

        if index >= self.records.len() {
            return self.fail("RECORD", AppError::NotFound(format!("record {}", index)));
        }
        self.records[index] = self.policy.canonicalize(record);
        add_log(
            &self.logs,
            "INFO",
            "RECORD",
            &format!("Replaced record {}", index),
        );
        Ok(())
    }

    pub fn clear(&mut self) {
        self.last_error = None;
        let removed = self.records.len();
        self.records.clear();
        add_log(
            &self.logs,
            "INFO",
            "RECORD",
            &format!("Cleared {} record(s)", removed),
        );
    }

    /// Append imported rows as-is. Imported header names are used as keys
    /// directly; the synonym table is not applied on this path.
    pub fn append_imported(&mut self, records: Vec<Record>) -> usize {
        let count = records.len();
        self.records.extend(records);
        add_log(
            &self.logs,
            "INFO",
            "IMPORT",
            &format!("Imported {} record(s), {} total", count, self.records.len()),
        );
        count
    }

    pub async fn import_file(&mut self, path: &Path) -> Result<usize> {
        self.last_error = None;
        add_log(
            &self.logs,
            "INFO",
            "IMPORT",
            &format!("Importing {}", path.display()),
        );

        match spreadsheet::import_file(path).await {
            Ok(records) => Ok(self.append_imported(records)),
            Err(err) => self.fail("IMPORT", err),
        }
    }

    pub fn import_bytes(&mut self, bytes: Vec<u8>, format: SpreadsheetFormat) -> Result<usize> {
        self.last_error = None;
        match spreadsheet::decode_bytes(bytes, format) {
            Ok(records) => Ok(self.append_imported(records)),
            Err(err) => self.fail("IMPORT", err),
        }
    }

    fn ensure_exportable(&mut self) -> Result<()> {
        if self.records.is_empty() {
            return self.fail(
                "EXPORT",
                AppError::ExportFailure("there are no records to export".to_string()),
            );
        }
        Ok(())
    }

    fn exporter(&self) -> XlsxExporter<'_> {
        XlsxExporter::new(&self.config.export.sheet_name).with_profile(self.policy.profile())
    }

    pub fn export_bytes(&mut self) -> Result<Vec<u8>> {
        self.last_error = None;
        self.ensure_exportable()?;

        let headers = self.headers();
        let written = self.exporter().write_to_buffer(&headers, &self.records);
        match written {
            Ok(bytes) => Ok(bytes),
            Err(err) => self.fail("EXPORT", err),
        }
    }

    /// Write to `path`, or to the configured file name. The format follows
    /// the file extension.
    pub fn export_to_file(&mut self, path: Option<&Path>) -> Result<PathBuf> {
        self.last_error = None;
        self.ensure_exportable()?;

        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(&self.config.export.file_name));
        let headers = self.headers();

        let written = match SpreadsheetFormat::from_path(&path) {
            SpreadsheetFormat::Csv => {
                CsvCodec::new().write_to_file(&path, &headers, &self.records)
            }
            SpreadsheetFormat::Xlsx => self
                .exporter()
                .write_to_file(&path, &headers, &self.records),
        };

        match written {
            Ok(()) => {
                add_log(
                    &self.logs,
                    "INFO",
                    "EXPORT",
                    &format!(
                        "Exported {} record(s) to {}",
                        self.records.len(),
                        path.display()
                    ),
                );
                Ok(path)
            }
            Err(err) => self.fail("EXPORT", err),
        }
    }
}
