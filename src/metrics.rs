//! Metrics collection
//!
//! Thin wrapper over the `metrics` facade. No exporter is installed by the
//! library; embedding applications decide where the numbers go.

use metrics::{counter, histogram};
use std::time::Duration;

/// Metric names emitted by the crate
#[derive(Debug, Clone, Copy)]
pub struct MetricsCollector {
    /// Counter of database operations by operation and status
    pub db_operations_total: &'static str,
    /// Histogram of database operation durations in seconds
    pub db_operation_duration: &'static str,
    /// Counter of bookmarks returned by lookups
    pub bookmarks_selected_total: &'static str,
    /// Counter of bookmark rows deleted
    pub bookmarks_deleted_total: &'static str,
    /// Counter of rejected recording URLs
    pub recording_parse_failures_total: &'static str,
    /// Counter of backend requests by status
    pub backend_requests_total: &'static str,
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self {
            db_operations_total: "kodi_cutter_db_operations_total",
            db_operation_duration: "kodi_cutter_db_operation_duration_seconds",
            bookmarks_selected_total: "kodi_cutter_bookmarks_selected_total",
            bookmarks_deleted_total: "kodi_cutter_bookmarks_deleted_total",
            recording_parse_failures_total: "kodi_cutter_recording_parse_failures_total",
            backend_requests_total: "kodi_cutter_backend_requests_total",
        }
    }
}

impl MetricsCollector {
    /// Record database operation metrics
    pub fn record_db_operation(&self, operation: &'static str, duration: Duration, success: bool) {
        let status = if success { "success" } else { "error" };
        counter!(self.db_operations_total, "operation" => operation, "status" => status).increment(1);
        histogram!(self.db_operation_duration, "operation" => operation).record(duration.as_secs_f64());
    }

    /// Record how many bookmarks a lookup returned
    pub fn record_bookmarks_selected(&self, count: usize) {
        counter!(self.bookmarks_selected_total).increment(count as u64);
    }

    /// Record how many bookmark rows were committed as deleted
    pub fn record_bookmarks_deleted(&self, count: usize) {
        counter!(self.bookmarks_deleted_total).increment(count as u64);
    }

    /// Record a rejected recording URL
    pub fn record_parse_failure(&self) {
        counter!(self.recording_parse_failures_total).increment(1);
    }

    /// Record a backend request outcome
    pub fn record_backend_request(&self, success: bool) {
        let status = if success { "success" } else { "error" };
        counter!(self.backend_requests_total, "status" => status).increment(1);
    }
}
