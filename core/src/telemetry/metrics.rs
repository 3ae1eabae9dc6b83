use serde::{Deserialize, Serialize};
use std::sync::Mutex;

pub struct MetricsRecorder {
    inner: Mutex<Metrics>,
}

/// Counters kept across pipeline ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metrics {
    pub ticks: usize,
    pub sentence_failures: usize,
    pub scan_failures: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Metrics::default()),
        }
    }

    pub fn record_tick(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.ticks += 1;
        }
    }

    pub fn record_sentence_failure(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.sentence_failures += 1;
        }
    }

    pub fn record_scan_failure(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.scan_failures += 1;
        }
    }

    pub fn snapshot(&self) -> Metrics {
        if let Ok(metrics) = self.inner.lock() {
            *metrics
        } else {
            Metrics::default()
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
