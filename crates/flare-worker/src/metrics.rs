//! Worker loop metrics.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use serde::Serialize;

/// Lock-free counters shared by every loop of one worker.
#[derive(Debug, Default)]
pub struct WorkerMetrics {
    /// Pull iterations started.
    pub iterations: AtomicU64,
    /// Tasks processed successfully.
    pub processed: AtomicU64,
    /// Tasks whose processor returned an error.
    pub failed: AtomicU64,
    /// Tasks whose processor panicked.
    pub panicked: AtomicU64,
    /// Tasks cut off by the process timeout.
    pub timed_out: AtomicU64,
    /// Pull calls that failed or panicked outside a task.
    pub pull_failures: AtomicU64,
    active_loops: AtomicUsize,
}

/// Point-in-time copy of [`WorkerMetrics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub iterations: u64,
    pub processed: u64,
    pub failed: u64,
    pub panicked: u64,
    pub timed_out: u64,
    pub pull_failures: u64,
    pub active_loops: usize,
}

impl WorkerMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_iteration(&self) {
        self.iterations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_processed(&self) {
        self.processed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_panic(&self) {
        self.panicked.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_timeout(&self) {
        self.timed_out.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_pull_failure(&self) {
        self.pull_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn loop_started(&self) {
        self.active_loops.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn loop_stopped(&self) {
        self.active_loops.fetch_sub(1, Ordering::SeqCst);
    }

    /// Loops currently inside their run function.
    pub fn active_loops(&self) -> usize {
        self.active_loops.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            iterations: self.iterations.load(Ordering::Relaxed),
            processed: self.processed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            panicked: self.panicked.load(Ordering::Relaxed),
            timed_out: self.timed_out.load(Ordering::Relaxed),
            pull_failures: self.pull_failures.load(Ordering::Relaxed),
            active_loops: self.active_loops(),
        }
    }
}
