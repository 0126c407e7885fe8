pub mod use_cases;

pub use use_cases::record_parser::{parse, RecordParser};
pub use use_cases::record_session::RecordSession;
pub use use_cases::schema_policy::{DynamicSchema, FixedSchema, SchemaPolicy};
pub use use_cases::table_view::TableView;
