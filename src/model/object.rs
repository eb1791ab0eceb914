//! Config objects as returned by the Datadog API.
//!
//! Objects are kept opaque: Doghouse never validates their shape beyond
//! "a JSON object", so anything the API returns round-trips to disk unchanged.

use serde_json::{Map, Value};

/// One remote entity (monitor or dashboard) as a field mapping.
pub type ConfigObject = Map<String, Value>;

/// Ordered sequence of objects of a single kind, as persisted in one file.
pub type ConfigCollection = Vec<ConfigObject>;

/// Name of the identity field on every remote object.
pub const ID_FIELD: &str = "id";

/// Canonical text form of an id value.
///
/// Dashboards use string ids and monitors numeric ones; strings render
/// as-is and everything else as JSON text, so `7` and `"7"` compare equal.
#[must_use]
pub fn id_key(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// The canonical id of an object, if it has one.
#[must_use]
pub fn object_id(object: &ConfigObject) -> Option<String> {
    object.get(ID_FIELD).filter(|v| !v.is_null()).map(id_key)
}

/// Parse a JSON value into a collection, rejecting anything that isn't an
/// array of objects.
///
/// # Errors
///
/// Returns a description of the first offending element.
pub fn collection_from_value(value: Value) -> std::result::Result<ConfigCollection, String> {
    let Value::Array(items) = value else {
        return Err(format!("expected a JSON array, found {}", type_name(&value)));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(map) => Ok(map),
            other => Err(format!(
                "element {index} is {}, expected an object",
                type_name(&other)
            )),
        })
        .collect()
}

/// Short JSON type name for error messages.
#[must_use]
pub const fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
