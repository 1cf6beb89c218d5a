//! # flare-worker
//!
//! Generic asynchronous task pipeline: a [`Pusher`] enqueues opaque
//! payloads, a fixed number of loops drive a [`Puller`] which hands each
//! task to a [`Processor`]. Per-task failures, timeouts, and panics are
//! logged and counted in [`WorkerMetrics`] without stopping the loop.

pub mod metrics;
pub mod queue;
pub mod traits;
pub mod worker;

pub use metrics::{MetricsSnapshot, WorkerMetrics};
pub use queue::{MemoryQueue, QueuedTask};
pub use traits::{Processor, Puller, Pusher};
pub use worker::{Worker, WorkerOptions, WorkerState};
