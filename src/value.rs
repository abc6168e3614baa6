//! Document value model.
//!
//! Documents are plain `serde_json` trees. The crate builds `serde_json` with
//! `preserve_order`, so a [`Mapping`] iterates in insertion order and every
//! codec writes keys back out in that order.

/// Any value a field can hold: null, bool, number, string, array or object.
pub type Value = serde_json::Value;

/// Ordered string-keyed mapping. Used for the store's field table and for
/// nested objects alike.
pub type Mapping = serde_json::Map<String, Value>;

/// Short name of a value's variant, as reported by
/// [`Error::TypeMismatch`](crate::Error::TypeMismatch).
#[must_use]
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
