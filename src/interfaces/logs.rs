use std::sync::{Arc, Mutex};

use chrono::Local;
use serde::{Deserialize, Serialize};

const MAX_ENTRIES: usize = 100;

pub type SharedLogs = Arc<Mutex<Vec<LogEntry>>>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub time: String,
    pub level: String,
    pub source: String,
    pub message: String,
}

pub fn new_log_buffer() -> SharedLogs {
    Arc::new(Mutex::new(Vec::new()))
}

/// Append to the bounded activity log and mirror the message to tracing.
pub fn add_log_entry(
    logs: &Mutex<Vec<LogEntry>>,
    level: &str,
    source: &str,
    message: &str,
) -> LogEntry {
    match level {
        "ERROR" => tracing::error!(source = %source, "{}", message),
        "WARN" => tracing::warn!(source = %source, "{}", message),
        "DEBUG" => tracing::debug!(source = %source, "{}", message),
        _ => tracing::info!(source = %source, "{}", message),
    }

    let entry = LogEntry {
        time: Local::now().format("%H:%M:%S").to_string(),
        level: level.to_string(),
        source: source.to_string(),
        message: message.to_string(),
    };
    let mut logs = logs.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    logs.push(entry.clone());
    if logs.len() > MAX_ENTRIES {
        logs.remove(0);
    }
    entry
}

pub fn add_log(logs: &Mutex<Vec<LogEntry>>, level: &str, source: &str, message: &str) {
    add_log_entry(logs, level, source, message);
}

pub fn snapshot(logs: &Mutex<Vec<LogEntry>>) -> Vec<LogEntry> {
    logs.lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .clone()
}
