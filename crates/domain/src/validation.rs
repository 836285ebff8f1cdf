//! Required-field presence checks.
//!
//! Listings accept loosely-typed JSON, so presence is judged on the raw
//! object before any typed deserialization happens. A field counts as missing
//! when it is absent or carries an empty value: `null`, `false`, `0`, `""`,
//! `[]` or `{}`.

use serde_json::{Map, Value};

/// Fields every listing must carry at creation.
pub const REQUIRED_FIELDS: [&str; 7] = [
    "title",
    "description",
    "price",
    "address",
    "city",
    "state",
    "zip_code",
];

/// Whether a JSON value counts as "not provided".
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
    }
}

/// Required fields absent or blank in a creation payload, in declaration order.
pub fn missing_required_fields(payload: &Map<String, Value>) -> Vec<String> {
    REQUIRED_FIELDS
        .iter()
        .filter(|field| payload.get(**field).is_none_or(is_blank))
        .map(|field| field.to_string())
        .collect()
}

/// Required fields that an update payload would blank out.
///
/// Keys absent from an update mean "leave unchanged", so only keys that are
/// present with a blank value are reported.
pub fn cleared_required_fields(payload: &Map<String, Value>) -> Vec<String> {
    REQUIRED_FIELDS
        .iter()
        .filter(|field| payload.get(**field).is_some_and(is_blank))
        .map(|field| field.to_string())
        .collect()
}
