pub mod app;
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;

pub use application::{parse, RecordParser, RecordSession, SchemaPolicy, TableView};
pub use domain::app_config::{AppConfig, SchemaMode};
pub use domain::error::{AppError, Result};
pub use domain::record::{HeaderList, RawRecord, Record};
pub use infrastructure::spreadsheet::SpreadsheetFormat;

pub use app::run;
