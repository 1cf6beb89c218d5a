//! Resources: a set of addresses plus a path template sharing one change descriptor.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::{Origin, Url};

use super::revision::{RevisionKind, RevisionValue};
use super::wildcard::{validate_id, WildcardReplacer};
use crate::errors::{AddressingError, ValidationError};

/// Which document field carries the revision and how to read it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceChange {
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub kind: Option<RevisionKind>,
    #[serde(default)]
    pub date_format: String,
}

impl ResourceChange {
    pub fn new(field: impl Into<String>, kind: RevisionKind) -> Self {
        Self {
            field: field.into(),
            kind: Some(kind),
            date_format: String::new(),
        }
    }

    pub fn date(field: impl Into<String>, date_format: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind: Some(RevisionKind::Date),
            date_format: date_format.into(),
        }
    }

    pub fn valid(&self) -> Result<(), ValidationError> {
        if self.field.is_empty() {
            return Err(ValidationError::MissingChangeField);
        }
        match self.kind {
            None => Err(ValidationError::MissingKind),
            Some(RevisionKind::Date) if self.date_format.is_empty() => {
                Err(ValidationError::MissingDateFormat)
            }
            Some(_) => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub addresses: Vec<String>,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub change: ResourceChange,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Resource {
    /// Validate the resource as submitted for creation.
    pub fn valid(&self) -> Result<(), ValidationError> {
        if self.addresses.is_empty() {
            return Err(invalid("addresses", "at least one address is required"));
        }
        for address in &self.addresses {
            let url = Url::parse(address)
                .map_err(|e| invalid("addresses", format!("'{address}' is not a url: {e}")))?;
            if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
                return Err(invalid(
                    "addresses",
                    format!("'{address}' is not an http(s) address"),
                ));
            }
            if url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
                return Err(invalid(
                    "addresses",
                    format!("'{address}' must be a scheme and host without a path"),
                ));
            }
        }
        if !self.path.starts_with('/') {
            return Err(invalid("path", "must start with '/'"));
        }
        let mut seen = Vec::new();
        for segment in self.path.split('/') {
            if let Some(name) = segment_wildcard(segment).map_err(|m| invalid("path", m))? {
                if seen.contains(&name.name) {
                    return Err(invalid("path", format!("wildcard '{{{}}}' repeated", name.name)));
                }
                seen.push(name.name);
            }
        }
        self.change.valid()
    }

    /// Build the substitution bound to one id/revision pair.
    ///
    /// `id` is a document URI or a bare path. When it matches this resource,
    /// `{id}` and the other path wildcards take the captured values; otherwise
    /// `{id}` is the raw id. Date revisions are parsed with this resource's
    /// date format so they can be rendered as RFC 3339.
    pub fn wildcard_replace(
        &self,
        id: &str,
        revision: Option<&RevisionValue>,
    ) -> Result<WildcardReplacer, AddressingError> {
        validate_id(id)?;
        let revision = revision
            .map(|r| WildcardReplacer::render_revision(r, &self.change.date_format))
            .transpose()?;
        let captured: BTreeMap<String, String> =
            self.capture(id).unwrap_or_default().into_iter().collect();
        Ok(WildcardReplacer::new(id, revision, captured))
    }

    /// Match a concrete document URI against the addresses and path template.
    ///
    /// The URI origin (scheme, host, effective port) must equal one of the
    /// addresses; its path must fit the template. Returns the captured
    /// wildcard values, or `None` when the URI does not belong to this
    /// resource. Query and fragment are ignored.
    pub fn matches(&self, uri: &str) -> Option<HashMap<String, String>> {
        let uri = Url::parse(uri).ok()?;
        let origin = uri.origin();
        if !self.origins().contains(&origin) {
            return None;
        }
        match_template(&self.path, uri.path())
    }

    /// Whether two resources would claim the same URIs.
    pub fn path_conflicts(&self, other: &Resource) -> bool {
        let theirs = other.origins();
        let shares_address = self.origins().iter().any(|o| theirs.contains(o));
        shares_address && normalize_template(&self.path) == normalize_template(&other.path)
    }

    fn origins(&self) -> Vec<Origin> {
        self.addresses
            .iter()
            .filter_map(|address| Url::parse(address).ok())
            .map(|url| url.origin())
            .collect()
    }

    fn capture(&self, id: &str) -> Option<HashMap<String, String>> {
        if id.starts_with('/') {
            let path = id.split(['?', '#']).next().unwrap_or(id);
            return match_template(&self.path, path);
        }
        self.matches(id)
    }
}

struct SegmentWildcard<'a> {
    prefix: &'a str,
    name: &'a str,
    suffix: &'a str,
}

fn segment_wildcard(segment: &str) -> Result<Option<SegmentWildcard<'_>>, String> {
    let (Some(open), Some(close)) = (segment.find('{'), segment.find('}')) else {
        if segment.contains('{') || segment.contains('}') {
            return Err(format!("unbalanced braces in segment '{segment}'"));
        }
        return Ok(None);
    };
    let name = &segment[open + 1..close.max(open + 1)];
    if close < open || name.is_empty() || segment[close + 1..].contains(['{', '}']) {
        return Err(format!("malformed wildcard in segment '{segment}'"));
    }
    Ok(Some(SegmentWildcard {
        prefix: &segment[..open],
        name,
        suffix: &segment[close + 1..],
    }))
}

fn match_template(template: &str, path: &str) -> Option<HashMap<String, String>> {
    let template_segments: Vec<&str> = template.split('/').collect();
    let path_segments: Vec<&str> = path.split('/').collect();
    if template_segments.len() != path_segments.len() {
        return None;
    }
    let mut values = HashMap::new();
    for (expected, actual) in template_segments.iter().zip(&path_segments) {
        match segment_wildcard(expected).ok()? {
            None if expected == actual => {}
            None => return None,
            Some(w) => {
                let value = actual.strip_prefix(w.prefix)?.strip_suffix(w.suffix)?;
                if value.is_empty() {
                    return None;
                }
                values.insert(w.name.to_string(), value.to_string());
            }
        }
    }
    Some(values)
}

fn normalize_template(template: &str) -> String {
    template
        .trim_end_matches('/')
        .split('/')
        .map(|segment| match segment_wildcard(segment) {
            Ok(Some(w)) => format!("{}{{}}{}", w.prefix, w.suffix),
            _ => segment.to_string(),
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn invalid(field: &str, message: impl Into<String>) -> ValidationError {
    ValidationError::InvalidField {
        field: field.to_string(),
        message: message.into(),
    }
}
