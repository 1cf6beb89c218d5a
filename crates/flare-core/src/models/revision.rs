//! Tagged revision values and the per-kind ordering rules.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{ComparisonError, ValidationError};

/// Date format keyword selecting RFC 3339 parsing instead of a strftime pattern.
pub const RFC3339_FORMAT: &str = "rfc3339";

/// Representation a resource declares for its change field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RevisionKind {
    Integer,
    String,
    Date,
}

impl RevisionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::String => "string",
            Self::Date => "date",
        }
    }
}

impl fmt::Display for RevisionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RevisionKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "integer" => Ok(Self::Integer),
            "string" => Ok(Self::String),
            "date" => Ok(Self::Date),
            "" => Err(ValidationError::MissingKind),
            other => Err(ValidationError::UnknownKind {
                kind: other.to_string(),
            }),
        }
    }
}

/// One observed revision. Integers are kept as `f64` to match the JSON
/// numeric domain; dates keep their raw text and are parsed with the
/// resource's format when compared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum RevisionValue {
    Integer(f64),
    String(String),
    Date(String),
}

impl RevisionValue {
    pub fn kind(&self) -> RevisionKind {
        match self {
            Self::Integer(_) => RevisionKind::Integer,
            Self::String(_) => RevisionKind::String,
            Self::Date(_) => RevisionKind::Date,
        }
    }

    /// Build a value of `kind` from the raw JSON field of an incoming document.
    pub fn from_json(kind: RevisionKind, value: &serde_json::Value) -> Result<Self, ValidationError> {
        match (kind, value) {
            (RevisionKind::Integer, serde_json::Value::Number(n)) => n
                .as_f64()
                .map(Self::Integer)
                .ok_or(ValidationError::RevisionKindMismatch {
                    expected: "integer",
                    actual: "number",
                }),
            (RevisionKind::String, serde_json::Value::String(s)) => Ok(Self::String(s.clone())),
            (RevisionKind::Date, serde_json::Value::String(s)) => Ok(Self::Date(s.clone())),
            (kind, other) => Err(ValidationError::RevisionKindMismatch {
                expected: kind.as_str(),
                actual: json_type_name(other),
            }),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Integer(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Self::String(s) | Self::Date(s) => serde_json::Value::String(s.clone()),
        }
    }

    /// `self > reference` for integers.
    pub(crate) fn newer_integer(&self, reference: &RevisionValue) -> Result<bool, ComparisonError> {
        match (self, reference) {
            (Self::Integer(candidate), Self::Integer(reference)) => Ok(candidate > reference),
            (Self::Integer(_), other) | (other, _) => Err(ComparisonError::TypeMismatch {
                expected: "integer",
                found: other.kind().as_str(),
            }),
        }
    }

    /// Byte-wise `self > reference` for strings.
    pub(crate) fn newer_string(&self, reference: &RevisionValue) -> Result<bool, ComparisonError> {
        match (self, reference) {
            (Self::String(candidate), Self::String(reference)) => {
                Ok(candidate.as_bytes() > reference.as_bytes())
            }
            (Self::String(_), other) | (other, _) => Err(ComparisonError::TypeMismatch {
                expected: "string",
                found: other.kind().as_str(),
            }),
        }
    }

    /// Chronological `self > reference` after parsing both with `format`.
    pub(crate) fn newer_date(
        &self,
        reference: &RevisionValue,
        format: &str,
    ) -> Result<bool, ComparisonError> {
        let (candidate, reference) = match (self, reference) {
            (Self::Date(candidate), Self::Date(reference)) => (candidate, reference),
            (Self::Date(_), other) | (other, _) => {
                return Err(ComparisonError::TypeMismatch {
                    expected: "date",
                    found: other.kind().as_str(),
                })
            }
        };
        let parse = |value: &str| {
            parse_date(value, format).ok_or_else(|| ComparisonError::Format {
                value: value.to_string(),
                format: format.to_string(),
            })
        };
        Ok(parse(candidate)? > parse(reference)?)
    }
}

/// Parse `value` with a strftime `format` (or [`RFC3339_FORMAT`]).
///
/// Formats without an offset are read as UTC; date-only formats as midnight UTC.
pub fn parse_date(value: &str, format: &str) -> Option<DateTime<Utc>> {
    if format.is_empty() || value.is_empty() {
        return None;
    }
    if format.eq_ignore_ascii_case(RFC3339_FORMAT) {
        return DateTime::parse_from_rfc3339(value)
            .ok()
            .map(|d| d.with_timezone(&Utc));
    }
    if let Ok(d) = DateTime::parse_from_str(value, format) {
        return Some(d.with_timezone(&Utc));
    }
    if let Ok(d) = NaiveDateTime::parse_from_str(value, format) {
        return Some(d.and_utc());
    }
    NaiveDate::parse_from_str(value, format)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|d| d.and_utc())
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
