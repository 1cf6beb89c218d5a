//! Bounded in-memory MPMC queue implementing both [`Pusher`] and [`Puller`].

use std::sync::atomic::{AtomicU64, Ordering};

use async_channel::{Receiver, Sender, TrySendError};
use async_trait::async_trait;
use flare_core::errors::PipelineError;
use tokio_util::sync::CancellationToken;

use crate::traits::{Processor, Puller, Pusher};

/// One queued payload and the number of failed attempts so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedTask {
    pub payload: Vec<u8>,
    pub attempt: u32,
}

/// Tasks that fail with a retryable error are requeued until
/// `max_attempts` processing attempts were made, then dropped.
#[derive(Debug)]
pub struct MemoryQueue {
    sender: Sender<QueuedTask>,
    receiver: Receiver<QueuedTask>,
    max_attempts: u32,
    requeued: AtomicU64,
    dropped: AtomicU64,
}

impl MemoryQueue {
    pub fn new(capacity: usize, max_attempts: u32) -> Self {
        let (sender, receiver) = async_channel::bounded(capacity.max(1));
        Self {
            sender,
            receiver,
            max_attempts: max_attempts.max(1),
            requeued: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
        }
    }

    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }

    /// Reject further pushes. Queued tasks can still be pulled.
    pub fn close(&self) -> bool {
        self.sender.close()
    }

    /// Tasks put back after a retryable failure.
    pub fn requeued(&self) -> u64 {
        self.requeued.load(Ordering::Relaxed)
    }

    /// Tasks abandoned after exhausting their attempts or a full queue.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    async fn dispatch(&self, task: QueuedTask, processor: &dyn Processor) {
        let err = match processor.process(&task.payload).await {
            Ok(()) => return,
            Err(e) => e,
        };
        let attempt = task.attempt + 1;
        if !err.is_retryable() {
            tracing::debug!(attempt, error = %err, "task failed permanently, acknowledged");
            return;
        }
        if attempt >= self.max_attempts {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            tracing::error!(
                attempt,
                max_attempts = self.max_attempts,
                error = %err,
                "task dropped after exhausting attempts"
            );
            return;
        }
        let retry = QueuedTask {
            payload: task.payload,
            attempt,
        };
        match self.sender.try_send(retry) {
            Ok(()) => {
                self.requeued.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(attempt, error = %err, "task requeued");
            }
            Err(TrySendError::Full(_)) | Err(TrySendError::Closed(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                tracing::error!(attempt, error = %err, "task dropped, queue cannot take the retry");
            }
        }
    }
}

#[async_trait]
impl Pusher for MemoryQueue {
    async fn push(&self, payload: Vec<u8>) -> Result<(), PipelineError> {
        self.sender
            .send(QueuedTask {
                payload,
                attempt: 0,
            })
            .await
            .map_err(|_| PipelineError::Closed)
    }
}

#[async_trait]
impl Puller for MemoryQueue {
    async fn pull(
        &self,
        cancel: &CancellationToken,
        processor: &dyn Processor,
    ) -> Result<(), PipelineError> {
        let task = tokio::select! {
            biased;
            () = cancel.cancelled() => return Ok(()),
            task = self.receiver.recv() => task.map_err(|_| PipelineError::Closed)?,
        };
        self.dispatch(task, processor).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    /// Fails with the configured error and records every attempt.
    struct FailingProcessor {
        error: PipelineError,
        seen: Mutex<Vec<Vec<u8>>>,
    }

    #[async_trait]
    impl Processor for FailingProcessor {
        async fn process(&self, payload: &[u8]) -> Result<(), PipelineError> {
            self.seen.lock().unwrap().push(payload.to_vec());
            Err(self.error.clone())
        }
    }

    fn failing(retryable: bool) -> FailingProcessor {
        FailingProcessor {
            error: PipelineError::Process {
                reason: "boom".to_string(),
                retryable,
            },
            seen: Mutex::new(Vec::new()),
        }
    }

    #[tokio::test]
    async fn test_retryable_failures_requeue_until_max_attempts() {
        let queue = MemoryQueue::new(8, 3);
        queue.push(b"task".to_vec()).await.unwrap();
        let processor = failing(true);
        let cancel = CancellationToken::new();

        for _ in 0..3 {
            queue.pull(&cancel, &processor).await.unwrap();
        }
        assert_eq!(processor.seen.lock().unwrap().len(), 3);
        assert_eq!(queue.requeued(), 2);
        assert_eq!(queue.dropped(), 1);
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn test_permanent_failures_are_acknowledged() {
        let queue = MemoryQueue::new(8, 3);
        queue.push(b"task".to_vec()).await.unwrap();
        let processor = failing(false);
        queue
            .pull(&CancellationToken::new(), &processor)
            .await
            .unwrap();
        assert!(queue.is_empty());
        assert_eq!(queue.requeued(), 0);
        assert_eq!(queue.dropped(), 0);
    }

    #[tokio::test]
    async fn test_cancelled_pull_returns_without_task() {
        let queue = MemoryQueue::new(8, 3);
        let cancel = CancellationToken::new();
        cancel.cancel();
        let processor = failing(true);
        queue.pull(&cancel, &processor).await.unwrap();
        assert!(processor.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_closed_queue_rejects_push() {
        let queue = MemoryQueue::new(1, 1);
        assert!(queue.close());
        assert_eq!(
            queue.push(b"late".to_vec()).await,
            Err(PipelineError::Closed)
        );
    }
}
