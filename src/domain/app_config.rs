use serde::{Deserialize, Serialize};

use super::error::{AppError, Result};

/// Which header policy a deployment uses. Picked once at start-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaMode {
    /// Columns are the union of every key seen, identifier pinned first.
    Dynamic,
    /// Columns are the fixed listing layout; raw keys go through the synonym table.
    Fixed,
}

impl Default for SchemaMode {
    fn default() -> Self {
        SchemaMode::Dynamic
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Name of the single worksheet written on export
    pub sheet_name: String,

    /// Default output file when no path is given
    pub file_name: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            sheet_name: "Parsed Data".to_string(),
            file_name: "parsed_data_export.xlsx".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub schema_mode: SchemaMode,

    /// Record boundary marker, also the pinned column in dynamic mode
    #[serde(default = "default_identifier_marker")]
    pub identifier_marker: String,

    /// Shown in the table view for missing or empty cells
    #[serde(default = "default_placeholder")]
    pub placeholder: String,

    #[serde(default)]
    pub export: ExportConfig,

    /// tracing-subscriber EnvFilter directive
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_identifier_marker() -> String {
    "编号".to_string()
}

fn default_placeholder() -> String {
    "-".to_string()
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            schema_mode: SchemaMode::default(),
            identifier_marker: default_identifier_marker(),
            placeholder: default_placeholder(),
            export: ExportConfig::default(),
            log_filter: default_log_filter(),
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        if self.identifier_marker.trim().is_empty() {
            return Err(AppError::ConfigError(
                "identifier_marker must not be empty".to_string(),
            ));
        }
        if self
            .identifier_marker
            .contains(|c: char| matches!(c, ':' | '：' | '\n'))
        {
            return Err(AppError::ConfigError(
                "identifier_marker must not contain a colon or newline".to_string(),
            ));
        }
        if self.export.sheet_name.trim().is_empty() {
            return Err(AppError::ConfigError(
                "export.sheet_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
