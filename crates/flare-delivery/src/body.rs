//! Webhook request body.

use flare_core::models::WildcardReplacer;
use flare_core::{Document, SubscriptionAction};
use serde_json::{json, Map, Value};

/// Render the notification body for `document`.
///
/// ```json
/// { "action": "update",
///   "document": { "id": "...", "revision": 2, "changeField": "revision", "updatedAt": "..." },
///   "data": { ... } }
/// ```
///
/// `data` is the subscription's template with placeholders substituted.
pub fn render_body(
    action: SubscriptionAction,
    document: &Document,
    replacer: &WildcardReplacer,
    data: &Map<String, Value>,
) -> Value {
    json!({
        "action": action.as_str(),
        "document": {
            "id": document.id,
            "revision": document
                .change_field_value
                .as_ref()
                .map(|r| r.to_json())
                .unwrap_or(Value::Null),
            "changeField": document.resource.change.field,
            "updatedAt": document.updated_at.map(|t| t.to_rfc3339()),
        },
        "data": replacer.replace_json(&Value::Object(data.clone())),
    })
}
