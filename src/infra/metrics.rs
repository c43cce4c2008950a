//! Lock-free request counters and periodic reporting
//!
//! Uses atomics for hot-path operations to avoid mutex contention.
//!
//! NOTE: All atomics use Relaxed ordering intentionally—these are statistical
//! counters only. Do NOT use these atomics for coordination or logic decisions.

use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

/// Lock-free metrics collector for the backend API
pub struct Metrics {
    /// Total /users requests served (monotonic)
    users_requests: AtomicU64,
    /// Total /items requests served (monotonic)
    items_requests: AtomicU64,
    /// Total collection points accepted (monotonic)
    points_created: AtomicU64,
    /// Total submissions rejected with an unparsable body (monotonic)
    points_rejected: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            users_requests: AtomicU64::new(0),
            items_requests: AtomicU64::new(0),
            points_created: AtomicU64::new(0),
            points_rejected: AtomicU64::new(0),
        }
    }

    pub fn record_users_request(&self) {
        self.users_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_items_request(&self) {
        self.items_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_point_created(&self) {
        self.points_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_point_rejected(&self) {
        self.points_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Snapshot the counters for reporting
    pub fn report(&self) -> MetricsSummary {
        MetricsSummary {
            users_requests: self.users_requests.load(Ordering::Relaxed),
            items_requests: self.items_requests.load(Ordering::Relaxed),
            points_created: self.points_created.load(Ordering::Relaxed),
            points_rejected: self.points_rejected.load(Ordering::Relaxed),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time snapshot of the service counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSummary {
    pub users_requests: u64,
    pub items_requests: u64,
    pub points_created: u64,
    pub points_rejected: u64,
}

impl MetricsSummary {
    /// Emit the snapshot as a structured log line
    pub fn log(&self) {
        info!(
            users_requests = self.users_requests,
            items_requests = self.items_requests,
            points_created = self.points_created,
            points_rejected = self.points_rejected,
            "metrics_summary"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_accumulate() {
        let metrics = Metrics::new();
        metrics.record_users_request();
        metrics.record_users_request();
        metrics.record_items_request();
        metrics.record_point_created();

        let summary = metrics.report();
        assert_eq!(summary.users_requests, 2);
        assert_eq!(summary.items_requests, 1);
        assert_eq!(summary.points_created, 1);
        assert_eq!(summary.points_rejected, 0);
    }

    #[test]
    fn test_report_does_not_reset() {
        let metrics = Metrics::new();
        metrics.record_point_rejected();

        assert_eq!(metrics.report().points_rejected, 1);
        assert_eq!(metrics.report().points_rejected, 1);
    }
}
