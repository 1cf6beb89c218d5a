use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;
use crate::constants::FLARE_VERSION;
use crate::models::SubscriptionDelivery;

/// Outbound webhook delivery configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeliveryConfig {
    /// Timeout of one HTTP call (milliseconds).
    pub request_timeout_ms: u64,
    /// `User-Agent` header sent with every notification.
    pub user_agent: String,
    /// Success codes applied to subscriptions created without any.
    pub default_success: Vec<u16>,
    /// Discard codes applied to subscriptions created without any.
    pub default_discard: Vec<u16>,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: defaults::DEFAULT_REQUEST_TIMEOUT_MS,
            user_agent: format!("flare/{FLARE_VERSION}"),
            default_success: defaults::DEFAULT_SUCCESS_STATUSES.to_vec(),
            default_discard: Vec::new(),
        }
    }
}

impl DeliveryConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Fill empty status sets of `delivery` with the configured defaults.
    pub fn apply_defaults(&self, delivery: &mut SubscriptionDelivery) {
        if delivery.success.is_empty() {
            delivery.success = self.default_success.clone();
        }
        if delivery.discard.is_empty() {
            delivery.discard = self.default_discard.clone();
        }
    }
}
