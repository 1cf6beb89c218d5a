//! Webhook registrations and their delivery policy.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use super::resource::Resource;
use crate::constants::ALLOWED_METHODS;
use crate::errors::ValidationError;

/// Kinds of actions a subscription trigger supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionAction {
    Create,
    Update,
    Delete,
}

impl SubscriptionAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for SubscriptionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Address information used to notify the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionEndpoint {
    pub url: String,
    #[serde(default = "default_method")]
    pub method: String,
    #[serde(default)]
    pub headers: BTreeMap<String, Vec<String>>,
}

fn default_method() -> String {
    "POST".to_string()
}

impl SubscriptionEndpoint {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: default_method(),
            headers: BTreeMap::new(),
        }
    }
}

/// How a delivery attempt's status code is classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryOutcome {
    /// Terminal success.
    Success,
    /// Terminal failure, the task is abandoned.
    Discard,
    /// Transient failure, eligible for retry.
    Retry,
}

/// Status codes deciding whether a notification counts as delivered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionDelivery {
    #[serde(default)]
    pub success: Vec<u16>,
    #[serde(default)]
    pub discard: Vec<u16>,
}

impl SubscriptionDelivery {
    pub fn new(success: impl Into<Vec<u16>>, discard: impl Into<Vec<u16>>) -> Self {
        Self {
            success: success.into(),
            discard: discard.into(),
        }
    }

    pub fn classify(&self, status: u16) -> DeliveryOutcome {
        if self.success.contains(&status) {
            DeliveryOutcome::Success
        } else if self.discard.contains(&status) {
            DeliveryOutcome::Discard
        } else {
            DeliveryOutcome::Retry
        }
    }

    pub fn valid(&self) -> Result<(), ValidationError> {
        if self.success.is_empty() {
            return Err(invalid("delivery.success", "at least one status code is required"));
        }
        if let Some(code) = self
            .success
            .iter()
            .chain(&self.discard)
            .find(|c| !(100..=599).contains(*c))
        {
            return Err(invalid("delivery", format!("{code} is not an http status code")));
        }
        if let Some(code) = self.success.iter().find(|c| self.discard.contains(*c)) {
            return Err(invalid(
                "delivery",
                format!("{code} is both a success and a discard status"),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    #[serde(default)]
    pub id: String,
    pub endpoint: SubscriptionEndpoint,
    #[serde(default)]
    pub delivery: SubscriptionDelivery,
    #[serde(default)]
    pub resource: Resource,
    #[serde(default)]
    pub data: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Default for SubscriptionEndpoint {
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl Subscription {
    pub fn valid(&self) -> Result<(), ValidationError> {
        let raw = &self.endpoint.url;
        let url = Url::parse(raw)
            .map_err(|e| invalid("endpoint.url", format!("'{raw}' is not a url: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid("endpoint.url", format!("'{raw}' is not an http(s) url")));
        }
        if url.host_str().map_or(true, str::is_empty) {
            return Err(invalid("endpoint.url", format!("'{raw}' has no host")));
        }
        let method = self.endpoint.method.to_ascii_uppercase();
        if !ALLOWED_METHODS.contains(&method.as_str()) {
            return Err(invalid(
                "endpoint.method",
                format!("'{}' is not supported", self.endpoint.method),
            ));
        }
        if self.resource.id.is_empty() {
            return Err(invalid("resource", "a resource id is required"));
        }
        self.delivery.valid()
    }
}

fn invalid(field: &str, message: impl Into<String>) -> ValidationError {
    ValidationError::InvalidField {
        field: field.to_string(),
        message: message.into(),
    }
}
