//! Capability roles of the pipeline.

use async_trait::async_trait;
use flare_core::errors::PipelineError;
use tokio_util::sync::CancellationToken;

/// Hands one opaque task to a queue.
#[async_trait]
pub trait Pusher: Send + Sync {
    async fn push(&self, payload: Vec<u8>) -> Result<(), PipelineError>;
}

/// Executes one task.
#[async_trait]
pub trait Processor: Send + Sync {
    async fn process(&self, payload: &[u8]) -> Result<(), PipelineError>;
}

/// Dequeues tasks and dispatches them.
///
/// `pull` waits until at least one task is available or `cancel` fires,
/// then calls `processor` once per delivered task. Acknowledgement and
/// requeue of the underlying queue are the puller's responsibility.
#[async_trait]
pub trait Puller: Send + Sync {
    async fn pull(
        &self,
        cancel: &CancellationToken,
        processor: &dyn Processor,
    ) -> Result<(), PipelineError>;
}
