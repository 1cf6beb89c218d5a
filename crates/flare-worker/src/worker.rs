//! The worker engine: `Created → Running → Stopped`.

use std::any::Any;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use flare_core::config::WorkerConfig;
use flare_core::errors::{PipelineError, WorkerError};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::metrics::WorkerMetrics;
use crate::traits::{Processor, Puller, Pusher};

/// How long a puller gets to return after its iteration deadline.
const CANCEL_GRACE: Duration = Duration::from_millis(250);

/// Pause after a failed pull before the loop tries again.
const PULL_ERROR_BACKOFF: Duration = Duration::from_millis(100);

/// Everything a [`Worker`] is built from.
#[derive(Clone)]
pub struct WorkerOptions {
    pub pusher: Option<Arc<dyn Pusher>>,
    pub puller: Option<Arc<dyn Puller>>,
    pub processor: Option<Arc<dyn Processor>>,
    /// Upper bound of one pull-and-process iteration.
    pub process_timeout: Duration,
    /// Upper bound of one push.
    pub push_timeout: Duration,
    /// Number of independent pull loops.
    pub concurrency: usize,
}

impl Default for WorkerOptions {
    fn default() -> Self {
        Self::from(&WorkerConfig::default())
    }
}

impl From<&WorkerConfig> for WorkerOptions {
    fn from(config: &WorkerConfig) -> Self {
        Self {
            pusher: None,
            puller: None,
            processor: None,
            process_timeout: config.process_timeout(),
            push_timeout: config.push_timeout(),
            concurrency: config.concurrency,
        }
    }
}

impl WorkerOptions {
    /// Use one queue as both pusher and puller.
    pub fn with_queue<Q>(mut self, queue: Arc<Q>) -> Self
    where
        Q: Pusher + Puller + 'static,
    {
        self.pusher = Some(Arc::clone(&queue) as Arc<dyn Pusher>);
        self.puller = Some(queue as Arc<dyn Puller>);
        self
    }

    pub fn with_processor(mut self, processor: Arc<dyn Processor>) -> Self {
        self.processor = Some(processor);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Created,
    Running,
    Stopped,
}

/// State shared by every loop.
struct LoopContext {
    puller: Arc<dyn Puller>,
    processor: Arc<dyn Processor>,
    process_timeout: Duration,
    metrics: Arc<WorkerMetrics>,
}

pub struct Worker {
    pusher: Arc<dyn Pusher>,
    context: Arc<LoopContext>,
    push_timeout: Duration,
    concurrency: usize,
    lifetime: CancellationToken,
    state: Mutex<WorkerState>,
    loops: Mutex<Vec<JoinHandle<()>>>,
}

impl Worker {
    pub fn new(options: WorkerOptions) -> Result<Self, WorkerError> {
        let pusher = options.pusher.ok_or(WorkerError::MissingPusher)?;
        let puller = options.puller.ok_or(WorkerError::MissingPuller)?;
        let processor = options.processor.ok_or(WorkerError::MissingProcessor)?;
        if options.process_timeout.is_zero() {
            return Err(WorkerError::InvalidTimeout {
                field: "process_timeout",
            });
        }
        if options.push_timeout.is_zero() {
            return Err(WorkerError::InvalidTimeout {
                field: "push_timeout",
            });
        }
        if options.concurrency == 0 {
            return Err(WorkerError::InvalidConcurrency {
                count: options.concurrency,
            });
        }

        Ok(Self {
            pusher,
            context: Arc::new(LoopContext {
                puller,
                processor,
                process_timeout: options.process_timeout,
                metrics: Arc::new(WorkerMetrics::new()),
            }),
            push_timeout: options.push_timeout,
            concurrency: options.concurrency,
            lifetime: CancellationToken::new(),
            state: Mutex::new(WorkerState::Created),
            loops: Mutex::new(Vec::new()),
        })
    }

    /// Enqueue one task under the push timeout. Valid in every state.
    pub async fn push(&self, payload: Vec<u8>) -> Result<(), PipelineError> {
        match tokio::time::timeout(self.push_timeout, self.pusher.push(payload)).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e @ PipelineError::Push { .. })) => Err(e),
            Ok(Err(e)) => Err(PipelineError::Push {
                reason: e.to_string(),
            }),
            Err(_) => Err(PipelineError::PushTimeout {
                timeout: self.push_timeout,
            }),
        }
    }

    /// Launch the pull loops. Must be called inside a tokio runtime.
    pub fn start(&self) -> Result<(), WorkerError> {
        let mut state = self.state.lock().map_err(|_| WorkerError::Stopped)?;
        match *state {
            WorkerState::Created => {}
            WorkerState::Running => return Err(WorkerError::AlreadyStarted),
            WorkerState::Stopped => return Err(WorkerError::Stopped),
        }
        let mut loops = self.loops.lock().map_err(|_| WorkerError::Stopped)?;
        for index in 0..self.concurrency {
            let context = Arc::clone(&self.context);
            let lifetime = self.lifetime.clone();
            loops.push(tokio::spawn(run_loop(context, lifetime, index)));
        }
        *state = WorkerState::Running;
        tracing::info!(concurrency = self.concurrency, "worker started");
        Ok(())
    }

    /// Cancel the shared lifetime. No new pulls are issued afterwards.
    pub fn stop(&self) {
        self.lifetime.cancel();
        if let Ok(mut state) = self.state.lock() {
            if *state != WorkerState::Stopped {
                *state = WorkerState::Stopped;
                tracing::info!("worker stopping");
            }
        }
    }

    /// Stop and wait for every loop to exit.
    pub async fn shutdown(&self) {
        self.stop();
        let loops: Vec<JoinHandle<()>> = match self.loops.lock() {
            Ok(mut loops) => loops.drain(..).collect(),
            Err(_) => Vec::new(),
        };
        for handle in loops {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "worker loop ended abnormally");
            }
        }
        tracing::info!("worker stopped");
    }

    pub fn state(&self) -> WorkerState {
        self.state
            .lock()
            .map(|s| *s)
            .unwrap_or(WorkerState::Stopped)
    }

    /// Number of loops launched by `start` and not yet joined.
    pub fn loop_count(&self) -> usize {
        self.loops.lock().map(|l| l.len()).unwrap_or(0)
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn metrics(&self) -> Arc<WorkerMetrics> {
        Arc::clone(&self.context.metrics)
    }

    /// The shared lifetime; cancelling it is equivalent to [`Worker::stop`]
    /// for the loops.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.lifetime.clone()
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        self.lifetime.cancel();
    }
}

async fn run_loop(context: Arc<LoopContext>, lifetime: CancellationToken, index: usize) {
    context.metrics.loop_started();
    tracing::debug!(loop_index = index, "worker loop started");
    while !lifetime.is_cancelled() {
        if !context.run_iteration(&lifetime, index).await {
            tokio::select! {
                () = lifetime.cancelled() => {}
                () = tokio::time::sleep(PULL_ERROR_BACKOFF) => {}
            }
        }
    }
    context.metrics.loop_stopped();
    tracing::debug!(loop_index = index, "worker loop stopped");
}

impl LoopContext {
    /// One pull bounded by the process timeout. Returns `false` when the
    /// pull itself failed.
    async fn run_iteration(&self, lifetime: &CancellationToken, index: usize) -> bool {
        self.metrics.record_iteration();
        let deadline = Instant::now() + self.process_timeout;
        let token = lifetime.child_token();
        let observer = ObservedProcessor {
            processor: Arc::clone(&self.processor),
            metrics: Arc::clone(&self.metrics),
            deadline,
            timeout: self.process_timeout,
            loop_index: index,
        };
        let puller = Arc::clone(&self.puller);
        let pull_token = token.clone();
        let mut pull = AbortOnDrop(tokio::spawn(async move {
            puller.pull(&pull_token, &observer).await
        }));

        let joined = match tokio::time::timeout_at(deadline, &mut pull.0).await {
            Ok(joined) => joined,
            Err(_) => {
                token.cancel();
                match tokio::time::timeout(CANCEL_GRACE, &mut pull.0).await {
                    Ok(joined) => joined,
                    Err(_) => {
                        self.metrics.record_timeout();
                        tracing::warn!(
                            loop_index = index,
                            timeout_ms = self.process_timeout.as_millis() as u64,
                            "pull did not return after its deadline, aborted"
                        );
                        return true;
                    }
                }
            }
        };
        token.cancel();

        match joined {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                self.metrics.record_pull_failure();
                tracing::warn!(loop_index = index, error = %e, "pull failed");
                false
            }
            Err(e) if e.is_panic() => {
                self.metrics.record_pull_failure();
                tracing::error!(
                    loop_index = index,
                    panic = %panic_message(e.into_panic()),
                    "pull panicked, loop continues"
                );
                false
            }
            Err(e) => {
                tracing::debug!(loop_index = index, error = %e, "pull task cancelled");
                true
            }
        }
    }
}

/// Wraps the real processor: enforces the iteration deadline, converts
/// panics into errors, and records every outcome.
struct ObservedProcessor {
    processor: Arc<dyn Processor>,
    metrics: Arc<WorkerMetrics>,
    deadline: Instant,
    timeout: Duration,
    loop_index: usize,
}

#[async_trait]
impl Processor for ObservedProcessor {
    async fn process(&self, payload: &[u8]) -> Result<(), PipelineError> {
        let processor = Arc::clone(&self.processor);
        let payload = payload.to_vec();
        let mut task = AbortOnDrop(tokio::spawn(async move {
            processor.process(&payload).await
        }));

        let result = match tokio::time::timeout_at(self.deadline, &mut task.0).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) if e.is_panic() => {
                let reason = panic_message(e.into_panic());
                self.metrics.record_panic();
                tracing::error!(
                    loop_index = self.loop_index,
                    panic = %reason,
                    "processor panicked, loop continues"
                );
                return Err(PipelineError::Panicked { reason });
            }
            Ok(Err(e)) => Err(PipelineError::Process {
                reason: e.to_string(),
                retryable: true,
            }),
            Err(_) => {
                self.metrics.record_timeout();
                tracing::warn!(
                    loop_index = self.loop_index,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "task processing timed out"
                );
                return Err(PipelineError::ProcessTimeout {
                    timeout: self.timeout,
                });
            }
        };

        match &result {
            Ok(()) => self.metrics.record_processed(),
            Err(e) => {
                self.metrics.record_failure();
                tracing::warn!(
                    loop_index = self.loop_index,
                    retryable = e.is_retryable(),
                    error = %e,
                    "task processing failed"
                );
            }
        }
        result
    }
}

/// Aborts the task when the handle goes out of scope.
struct AbortOnDrop<T>(JoinHandle<T>);

impl<T> Drop for AbortOnDrop<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
