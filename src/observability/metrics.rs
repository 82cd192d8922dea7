//! In-process counters, gauges and timers

use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::time::Duration;

/// Monotonic event counter
#[derive(Debug, Default)]
pub struct Counter(AtomicI64);

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc(&self) {
        self.add(1);
    }

    pub fn add(&self, n: i64) {
        self.0.fetch_add(n, Ordering::Relaxed);
    }

    pub fn value(&self) -> i64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Last-written floating point value
#[derive(Debug, Default)]
pub struct Gauge(AtomicU64);

impl Gauge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, value: f64) {
        self.0.store(value.to_bits(), Ordering::Relaxed);
    }

    pub fn get(&self) -> f64 {
        f64::from_bits(self.0.load(Ordering::Relaxed))
    }
}

/// Records every observed duration for percentile queries
#[derive(Debug, Default)]
pub struct Timer {
    samples: Mutex<Vec<Duration>>,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&self, sample: Duration) {
        self.lock().push(sample);
    }

    pub fn count(&self) -> usize {
        self.lock().len()
    }

    /// Nearest-rank percentile, `p` clamped to `[0.0, 1.0]`.
    ///
    /// Returns `Duration::ZERO` when nothing has been observed.
    pub fn percentile(&self, p: f64) -> Duration {
        let p = if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) };

        let mut samples = self.lock().clone();
        if samples.is_empty() {
            return Duration::ZERO;
        }

        samples.sort_unstable();
        let idx = ((samples.len() - 1) as f64 * p) as usize;
        samples[idx]
    }

    // A panic while pushing cannot leave the Vec inconsistent
    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Duration>> {
        self.samples
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Metrics recorded by [`crate::service::Service`]
#[derive(Debug, Default)]
pub struct ServiceMetrics {
    tasks_submitted: Counter,
    tasks_processed: Counter,
    task_duration: Timer,
}

impl ServiceMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn task_submitted(&self) {
        self.tasks_submitted.inc();
        tracing::debug!(counter = "tasks_submitted", "Metric incremented");
    }

    pub fn task_processed(&self, elapsed: Duration) {
        self.tasks_processed.inc();
        self.task_duration.observe(elapsed);
        tracing::debug!(
            counter = "tasks_processed",
            elapsed_us = elapsed.as_micros() as u64,
            "Metric incremented"
        );
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            tasks_submitted: self.tasks_submitted.value(),
            tasks_processed: self.tasks_processed.value(),
            task_p50: self.task_duration.percentile(0.5),
            task_p99: self.task_duration.percentile(0.99),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub tasks_submitted: i64,
    pub tasks_processed: i64,
    pub task_p50: Duration,
    pub task_p99: Duration,
}
