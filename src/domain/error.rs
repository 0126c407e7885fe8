use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppError {
    EmptyInput,
    NoRecordsFound,
    LeadingText(String),
    ImportDecodeFailure(String),
    FileReadFailure(String),
    ExportFailure(String),
    NotFound(String),
    ValidationError(String),
    ConfigError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::EmptyInput => write!(f, "Input text cannot be empty."),
            AppError::NoRecordsFound => write!(
                f,
                "No valid records found. Each record must begin with the identifier marker."
            ),
            AppError::LeadingText(preview) => write!(
                f,
                "Text before the first record is not allowed: \"{}\"",
                preview
            ),
            AppError::ImportDecodeFailure(msg) => write!(
                f,
                "Failed to parse the spreadsheet file. Please ensure it is a valid format: {}",
                msg
            ),
            AppError::FileReadFailure(msg) => write!(f, "Failed to read the file: {}", msg),
            AppError::ExportFailure(msg) => write!(f, "Failed to export data: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AppError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::FileReadFailure(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
