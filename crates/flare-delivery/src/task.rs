//! Delivery task envelope carried through the worker as opaque bytes.

use std::collections::BTreeMap;

use flare_core::errors::PipelineError;
use flare_core::models::WildcardReplacer;
use flare_core::{Document, Subscription, SubscriptionAction, SubscriptionDelivery};
use serde::{Deserialize, Serialize};

use crate::body::render_body;

/// One resolved webhook call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryTask {
    pub subscription_id: String,
    pub resource_id: String,
    pub action: SubscriptionAction,
    pub document_id: String,
    #[serde(default)]
    pub revision: Option<String>,
    pub url: String,
    pub method: String,
    #[serde(default)]
    pub headers: BTreeMap<String, Vec<String>>,
    pub body: serde_json::Value,
    pub delivery: SubscriptionDelivery,
}

impl DeliveryTask {
    /// Resolve `subscription`'s endpoint and body for `document`. The same
    /// `replacer` stamps url, header values, and payload.
    pub fn build(
        subscription: &Subscription,
        action: SubscriptionAction,
        document: &Document,
        replacer: &WildcardReplacer,
    ) -> Self {
        let endpoint = &subscription.endpoint;
        let headers: BTreeMap<String, Vec<String>> = endpoint
            .headers
            .iter()
            .map(|(name, values)| {
                (
                    name.clone(),
                    values.iter().map(|v| replacer.replace(v)).collect(),
                )
            })
            .collect();

        Self {
            subscription_id: subscription.id.clone(),
            resource_id: subscription.resource.id.clone(),
            action,
            document_id: document.id.clone(),
            revision: replacer.revision().map(str::to_string),
            url: replacer.replace(&endpoint.url),
            method: endpoint.method.to_ascii_uppercase(),
            headers,
            body: render_body(action, document, replacer, &subscription.data),
            delivery: subscription.delivery.clone(),
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>, PipelineError> {
        serde_json::to_vec(self).map_err(|e| PipelineError::Encode {
            reason: e.to_string(),
        })
    }

    pub fn decode(payload: &[u8]) -> Result<Self, PipelineError> {
        serde_json::from_slice(payload).map_err(|e| PipelineError::Decode {
            reason: e.to_string(),
        })
    }
}
