use std::collections::BTreeMap;
use std::fmt::Write;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::{Mutex, RwLock};

use super::escape_label;

/// Prometheus client default buckets, in seconds.
pub const DEFAULT_BUCKETS: [f64; 11] = [
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

#[derive(Debug, Default)]
struct Series {
    // non-cumulative; `+Inf` is `count`
    buckets: [u64; DEFAULT_BUCKETS.len()],
    count: u64,
    sum: f64,
}

impl Series {
    fn observe(&mut self, secs: f64) {
        if let Some(i) = DEFAULT_BUCKETS.iter().position(|le| secs <= *le) {
            self.buckets[i] += 1;
        }
        self.count += 1;
        self.sum += secs;
    }
}

/// Latency histogram partitioned by the `method` label.
pub struct HistogramVec {
    name: &'static str,
    help: &'static str,
    series: RwLock<BTreeMap<String, Arc<Mutex<Series>>>>,
}

impl HistogramVec {
    pub fn new(name: &'static str, help: &'static str) -> Self {
        Self {
            name,
            help,
            series: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn observe(&self, method: &str, secs: f64) {
        self.series_for(method).lock().observe(secs);
    }

    /// Starts a timer that records into `method` when dropped.
    pub fn start_timer(&self, method: &str) -> HistogramTimer {
        HistogramTimer {
            series: self.series_for(method),
            start: Instant::now(),
        }
    }

    /// Number of observations recorded for `method`.
    pub fn count(&self, method: &str) -> u64 {
        self.series
            .read()
            .get(method)
            .map(|s| s.lock().count)
            .unwrap_or(0)
    }

    fn series_for(&self, method: &str) -> Arc<Mutex<Series>> {
        if let Some(s) = self.series.read().get(method) {
            return Arc::clone(s);
        }
        Arc::clone(self.series.write().entry(method.to_string()).or_default())
    }

    pub(crate) fn render(&self, out: &mut String) {
        let _ = writeln!(out, "# HELP {} {}", self.name, self.help);
        let _ = writeln!(out, "# TYPE {} histogram", self.name);

        for (method, series) in self.series.read().iter() {
            let s = series.lock();
            let method = escape_label(method);

            let mut cumulative = 0;
            for (le, n) in DEFAULT_BUCKETS.iter().zip(s.buckets.iter()) {
                cumulative += n;
                let _ = writeln!(
                    out,
                    "{}_bucket{{method=\"{}\",le=\"{}\"}} {}",
                    self.name, method, le, cumulative
                );
            }
            let _ = writeln!(
                out,
                "{}_bucket{{method=\"{}\",le=\"+Inf\"}} {}",
                self.name, method, s.count
            );
            let _ = writeln!(out, "{}_sum{{method=\"{}\"}} {}", self.name, method, s.sum);
            let _ = writeln!(out, "{}_count{{method=\"{}\"}} {}", self.name, method, s.count);
        }
    }
}

/// Observes the elapsed time on drop, so every exit path is measured.
#[must_use = "the duration is recorded when the timer is dropped"]
pub struct HistogramTimer {
    series: Arc<Mutex<Series>>,
    start: Instant,
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        let secs = self.start.elapsed().as_secs_f64();
        self.series.lock().observe(secs);
    }
}
