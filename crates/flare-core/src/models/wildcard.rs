//! `{id}` / `{revision}` substitution.

use std::collections::BTreeMap;

use chrono::SecondsFormat;
use percent_encoding::percent_decode_str;

use super::revision::{parse_date, RevisionValue};
use crate::constants::{WILDCARD_ID, WILDCARD_ID_NAME, WILDCARD_REVISION, WILDCARD_REVISION_NAME};
use crate::errors::AddressingError;

/// Substitution bound to one resolved id/revision pair. Apply it to every
/// templated string (path, endpoint url, header values, payload) so they are
/// stamped consistently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WildcardReplacer {
    id: String,
    revision: Option<String>,
    /// Other wildcards captured from the resource path, keyed by name.
    captured: BTreeMap<String, String>,
}

impl WildcardReplacer {
    /// `captured` holds the path wildcard values of the document. Its `id`
    /// entry, when present, replaces the raw id.
    pub(crate) fn new(
        id: &str,
        revision: Option<String>,
        mut captured: BTreeMap<String, String>,
    ) -> Self {
        captured.remove(WILDCARD_REVISION_NAME);
        let id = captured
            .remove(WILDCARD_ID_NAME)
            .unwrap_or_else(|| id.to_string());
        Self {
            id,
            revision,
            captured,
        }
    }

    /// Replace every placeholder in `content`. `{revision}` is left untouched
    /// when no revision was bound.
    pub fn replace(&self, content: &str) -> String {
        let mut replaced = content.replace(WILDCARD_ID, &self.id);
        if let Some(revision) = &self.revision {
            replaced = replaced.replace(WILDCARD_REVISION, revision);
        }
        for (name, value) in &self.captured {
            replaced = replaced.replace(&format!("{{{name}}}"), value);
        }
        replaced
    }

    /// Replace placeholders inside every string of a JSON tree, keys included.
    pub fn replace_json(&self, value: &serde_json::Value) -> serde_json::Value {
        use serde_json::Value;
        match value {
            Value::String(s) => Value::String(self.replace(s)),
            Value::Array(items) => Value::Array(items.iter().map(|v| self.replace_json(v)).collect()),
            Value::Object(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (self.replace(k), self.replace_json(v)))
                    .collect(),
            ),
            other => other.clone(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn revision(&self) -> Option<&str> {
        self.revision.as_deref()
    }

    /// A captured path wildcard other than `id` and `revision`.
    pub fn captured(&self, name: &str) -> Option<&str> {
        self.captured.get(name).map(String::as_str)
    }

    pub(crate) fn render_revision(
        revision: &RevisionValue,
        date_format: &str,
    ) -> Result<String, AddressingError> {
        match revision {
            RevisionValue::Integer(n) => render_number(*n),
            RevisionValue::String(s) => Ok(s.clone()),
            RevisionValue::Date(raw) => parse_date(raw, date_format)
                .map(|d| d.to_rfc3339_opts(SecondsFormat::AutoSi, true))
                .ok_or_else(|| AddressingError::InvalidRevision {
                    reason: format!("'{raw}' does not match date format '{date_format}'"),
                }),
        }
    }
}

fn render_number(n: f64) -> Result<String, AddressingError> {
    if !n.is_finite() {
        return Err(AddressingError::InvalidRevision {
            reason: format!("{n} is not a finite number"),
        });
    }
    if n.fract() == 0.0 && n.abs() < 9.007_199_254_740_992e15 {
        Ok(format!("{}", n as i64))
    } else {
        Ok(n.to_string())
    }
}

/// Check that `id` is safe to place in a URL path: every `%` starts a valid
/// escape, the decoded bytes are UTF-8, and there are no control characters.
pub(crate) fn validate_id(id: &str) -> Result<(), AddressingError> {
    let malformed = |reason: &str| AddressingError::MalformedId {
        id: id.to_string(),
        reason: reason.to_string(),
    };
    let bytes = id.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                let escape = bytes.get(i + 1..i + 3).ok_or_else(|| malformed("truncated percent escape"))?;
                if !escape.iter().all(u8::is_ascii_hexdigit) {
                    return Err(malformed("invalid percent escape"));
                }
                i += 3;
            }
            b if b.is_ascii_control() || b == b' ' => {
                return Err(malformed("contains whitespace or control characters"));
            }
            _ => i += 1,
        }
    }
    percent_decode_str(id)
        .decode_utf8()
        .map_err(|_| malformed("escapes do not decode to utf-8"))?;
    Ok(())
}
