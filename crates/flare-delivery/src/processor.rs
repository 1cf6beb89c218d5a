//! HTTP delivery of [`DeliveryTask`]s.

use std::time::Instant;

use async_trait::async_trait;
use flare_core::config::DeliveryConfig;
use flare_core::errors::{DeliveryError, PipelineError};
use flare_core::models::DeliveryOutcome;
use flare_worker::Processor;

use crate::task::DeliveryTask;

/// Performs the webhook call and classifies the status code with the
/// subscription's success and discard sets.
#[derive(Debug, Clone)]
pub struct HttpProcessor {
    client: reqwest::Client,
}

impl HttpProcessor {
    pub fn new(config: &DeliveryConfig) -> Result<Self, DeliveryError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .user_agent(config.user_agent.clone())
            .gzip(true)
            .build()
            .map_err(|e| DeliveryError::Transport {
                reason: e.to_string(),
            })?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Send one task. `Ok` carries the success status.
    pub async fn deliver(&self, task: &DeliveryTask) -> Result<u16, DeliveryError> {
        let method = reqwest::Method::from_bytes(task.method.as_bytes()).map_err(|_| {
            DeliveryError::InvalidRequest {
                reason: format!("unsupported method '{}'", task.method),
            }
        })?;

        let mut request = self.client.request(method, &task.url).json(&task.body);
        for (name, values) in &task.headers {
            for value in values {
                request = request.header(name.as_str(), value.as_str());
            }
        }

        let response = request.send().await.map_err(|e| {
            if e.is_builder() {
                DeliveryError::InvalidRequest {
                    reason: e.to_string(),
                }
            } else {
                DeliveryError::Transport {
                    reason: e.to_string(),
                }
            }
        })?;

        let status = response.status().as_u16();
        match task.delivery.classify(status) {
            DeliveryOutcome::Success => Ok(status),
            DeliveryOutcome::Discard => Err(DeliveryError::Discarded { status }),
            DeliveryOutcome::Retry => Err(DeliveryError::Transient { status }),
        }
    }
}

#[async_trait]
impl Processor for HttpProcessor {
    async fn process(&self, payload: &[u8]) -> Result<(), PipelineError> {
        let task = DeliveryTask::decode(payload)?;
        let started = Instant::now();
        let result = self.deliver(&task).await;
        let delivery_time_ms = started.elapsed().as_millis() as u64;

        match result {
            Ok(status) => {
                tracing::info!(
                    subscription_id = %task.subscription_id,
                    document_id = %task.document_id,
                    action = %task.action,
                    status,
                    delivery_time_ms,
                    "notification delivered"
                );
                Ok(())
            }
            Err(e) => {
                let retryable = e.is_retryable();
                tracing::warn!(
                    subscription_id = %task.subscription_id,
                    document_id = %task.document_id,
                    action = %task.action,
                    retryable,
                    delivery_time_ms,
                    error = %e,
                    "notification not delivered"
                );
                Err(PipelineError::Process {
                    reason: e.to_string(),
                    retryable,
                })
            }
        }
    }
}
