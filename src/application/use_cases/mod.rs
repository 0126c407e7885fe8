pub mod record_parser;
pub mod record_session;
pub mod schema_policy;
pub mod table_view;
