pub mod cli;
pub mod logs;
