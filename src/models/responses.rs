//! JSON bodies returned by the HTTP endpoints.

use super::LogEntry;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct HealthFailure {
    pub status: &'static str,
    pub database: &'static str,
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct LogsPage {
    pub logs: Vec<LogEntry>,
    pub total: i64,
    pub returned: usize,
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, Serialize)]
pub struct CreatedLog {
    pub success: bool,
    pub log: LogEntry,
}

/// Aggregate counts over the whole table. Map keys are sorted.
#[derive(Debug, Default, Serialize)]
pub struct StatsResponse {
    pub total_logs: i64,
    pub levels: BTreeMap<String, i64>,
    pub services: BTreeMap<String, i64>,
    pub last_log: Option<LogEntry>,
}

#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub success: bool,
    pub message: String,
}

impl ClearResponse {
    pub fn new(deleted: u64) -> Self {
        Self {
            success: true,
            message: format!("{} logs cleared", deleted),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_stats_shape() {
        let value = serde_json::to_value(StatsResponse::default()).unwrap();
        assert_eq!(
            value,
            json!({"total_logs": 0, "levels": {}, "services": {}, "last_log": null})
        );
    }

    #[test]
    fn clear_message_reports_count() {
        assert_eq!(ClearResponse::new(0).message, "0 logs cleared");
        assert_eq!(ClearResponse::new(42).message, "42 logs cleared");
    }
}
