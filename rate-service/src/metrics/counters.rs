use std::collections::BTreeMap;
use std::fmt::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use super::escape_label;

/// Monotonic counter partitioned by the `method` label.
pub struct CounterVec {
    name: &'static str,
    help: &'static str,
    values: RwLock<BTreeMap<String, Arc<AtomicU64>>>,
}

impl CounterVec {
    pub fn new(name: &'static str, help: &'static str) -> Self {
        Self {
            name,
            help,
            values: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn inc(&self, method: &str) {
        self.cell(method).fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(&self, method: &str) -> u64 {
        self.values
            .read()
            .get(method)
            .map(|v| v.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    fn cell(&self, method: &str) -> Arc<AtomicU64> {
        if let Some(cell) = self.values.read().get(method) {
            return Arc::clone(cell);
        }
        Arc::clone(self.values.write().entry(method.to_string()).or_default())
    }

    pub(crate) fn render(&self, out: &mut String) {
        let _ = writeln!(out, "# HELP {} {}", self.name, self.help);
        let _ = writeln!(out, "# TYPE {} counter", self.name);
        for (method, value) in self.values.read().iter() {
            let _ = writeln!(
                out,
                "{}{{method=\"{}\"}} {}",
                self.name,
                escape_label(method),
                value.load(Ordering::Relaxed)
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_per_label() {
        let c = CounterVec::new("requests_total", "Total number of requests");
        c.inc("GetRates");
        c.inc("GetRates");
        c.inc("HealthCheck");

        assert_eq!(c.get("GetRates"), 2);
        assert_eq!(c.get("HealthCheck"), 1);
        assert_eq!(c.get("SaveRate"), 0);
    }

    #[test]
    fn concurrent_increments_are_not_lost() {
        let c = Arc::new(CounterVec::new("requests_total", "help"));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let c = Arc::clone(&c);
                std::thread::spawn(move || {
                    for _ in 0..1_000 {
                        c.inc("GetRates");
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(c.get("GetRates"), 8_000);
    }
}
