//! Domain model: revisions, resources, documents, subscriptions, pagination.

pub mod document;
pub mod pagination;
pub mod resource;
pub mod revision;
pub mod subscription;
pub mod wildcard;

pub use document::Document;
pub use pagination::Pagination;
pub use resource::{Resource, ResourceChange};
pub use revision::{parse_date, RevisionKind, RevisionValue};
pub use subscription::{
    DeliveryOutcome, Subscription, SubscriptionAction, SubscriptionDelivery, SubscriptionEndpoint,
};
pub use wildcard::WildcardReplacer;
