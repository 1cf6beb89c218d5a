use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Worker pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Number of independent pull loops.
    pub concurrency: usize,
    /// Upper bound for one pull-and-process iteration (milliseconds).
    pub process_timeout_ms: u64,
    /// Upper bound for one enqueue call (milliseconds).
    pub push_timeout_ms: u64,
    /// Capacity of the in-memory queue.
    pub queue_capacity: usize,
    /// Delivery attempts before a retryable task is dropped.
    pub max_attempts: u32,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            concurrency: defaults::DEFAULT_CONCURRENCY,
            process_timeout_ms: defaults::DEFAULT_PROCESS_TIMEOUT_MS,
            push_timeout_ms: defaults::DEFAULT_PUSH_TIMEOUT_MS,
            queue_capacity: defaults::DEFAULT_QUEUE_CAPACITY,
            max_attempts: defaults::DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl WorkerConfig {
    pub fn process_timeout(&self) -> Duration {
        Duration::from_millis(self.process_timeout_ms)
    }

    pub fn push_timeout(&self) -> Duration {
        Duration::from_millis(self.push_timeout_ms)
    }
}
