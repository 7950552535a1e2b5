//! Request metrics, labeled by RPC method.
//!
//! The registry is an explicit object handed to whoever records into it.
//! Cloning shares the same series.

pub mod counters;
pub mod histogram;
pub mod http;

use std::sync::Arc;

use counters::CounterVec;
use histogram::{HistogramTimer, HistogramVec};

#[derive(Clone)]
pub struct Metrics {
    pub requests_total: Arc<CounterVec>,
    pub request_errors_total: Arc<CounterVec>,
    pub request_duration_seconds: Arc<HistogramVec>,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            requests_total: Arc::new(CounterVec::new(
                "requests_total",
                "Total number of requests",
            )),
            request_errors_total: Arc::new(CounterVec::new(
                "request_errors_total",
                "Total number of request errors",
            )),
            request_duration_seconds: Arc::new(HistogramVec::new(
                "request_duration_seconds",
                "Request duration in seconds",
            )),
        }
    }

    pub fn inc_requests(&self, method: &str) {
        self.requests_total.inc(method);
    }

    pub fn inc_errors(&self, method: &str) {
        self.request_errors_total.inc(method);
    }

    pub fn start_timer(&self, method: &str) -> HistogramTimer {
        self.request_duration_seconds.start_timer(method)
    }

    /// Prometheus text exposition (format 0.0.4).
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.requests_total.render(&mut out);
        self.request_duration_seconds.render(&mut out);
        self.request_errors_total.render(&mut out);
        out
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn escape_label(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_series() {
        let metrics = Metrics::new();
        let other = metrics.clone();

        other.inc_requests("GetRates");
        other.inc_errors("SaveRate");

        assert_eq!(metrics.requests_total.get("GetRates"), 1);
        assert_eq!(metrics.request_errors_total.get("SaveRate"), 1);
    }

    #[test]
    fn render_includes_every_family() {
        let metrics = Metrics::new();
        metrics.inc_requests("HealthCheck");
        drop(metrics.start_timer("GetRates"));

        let text = metrics.render();

        assert!(text.contains("# TYPE requests_total counter"));
        assert!(text.contains("requests_total{method=\"HealthCheck\"} 1"));
        assert!(text.contains("# TYPE request_duration_seconds histogram"));
        assert!(text.contains("request_duration_seconds_count{method=\"GetRates\"} 1"));
        assert!(text.contains("# TYPE request_errors_total counter"));
    }

    #[test]
    fn label_values_are_escaped() {
        assert_eq!(escape_label("a\"b\\c\nd"), "a\\\"b\\\\c\\nd");
    }
}
