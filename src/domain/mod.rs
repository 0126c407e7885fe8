pub mod app_config;
pub mod error;
pub mod fixed_profile;
pub mod record;
