//! Structured field names used in spans and log events.
//!
//! Keeping them in one place lets log queries and dashboards rely on
//! consistent keys across crates.

pub const DOCUMENT_ID: &str = "document_id";
pub const RESOURCE_ID: &str = "resource_id";
pub const SUBSCRIPTION_ID: &str = "subscription_id";
pub const ACTION: &str = "action";

/// Delivery: HTTP status code returned by the endpoint.
pub const STATUS: &str = "status";

/// Delivery: wall time of one HTTP call in milliseconds.
pub const DELIVERY_TIME_MS: &str = "delivery_time_ms";

/// Worker: index of the pull loop emitting the event.
pub const LOOP_INDEX: &str = "loop_index";

/// Queue: delivery attempt of a task, starting at 1.
pub const ATTEMPT: &str = "attempt";
