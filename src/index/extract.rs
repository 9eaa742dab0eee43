//! Value extractors
//!
//! Pure functions projecting a record's value text onto a sort key.
//! The store treats values as opaque strings; JSON interpretation lives
//! entirely here, behind the extractor boundary.

use std::sync::Arc;

use serde_json::Value;

use super::Projection;

/// Projection function passed to `Store::create_index`
///
/// Must be pure and total: extraction failures project to
/// [`Projection::None`] rather than erroring.
pub type Extractor = Arc<dyn Fn(&str) -> Projection + Send + Sync>;

/// Extractor ordering records by a JSON field of the value
///
/// `path` is a dotted path (`"size"`, `"meta.owner"`). Numeric fields
/// project to [`Projection::Number`] and string fields to
/// [`Projection::Text`]. Anything else (a parse failure, an absent
/// field, or a non-scalar field) projects to [`Projection::None`].
pub fn json_field(path: &str) -> Extractor {
    let path = path.to_string();
    Arc::new(move |value| match json_lookup(value, &path) {
        Some(Value::Number(n)) => match n.as_f64() {
            Some(f) => Projection::Number(f),
            None => Projection::None,
        },
        Some(Value::String(s)) => Projection::Text(s),
        _ => Projection::None,
    })
}

/// Extractor ordering records by the entire value text
pub fn whole_value() -> Extractor {
    Arc::new(|value| Projection::Text(value.to_string()))
}

/// Render a JSON field of `value` as text, if present
///
/// Scalar fields only: strings are returned as-is, numbers and booleans
/// in their JSON rendering. Used by callers that filter on field
/// contents rather than order by them.
pub fn json_text(value: &str, path: &str) -> Option<String> {
    match json_lookup(value, path)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Walk a dotted path through the parsed value, taking ownership of the leaf
fn json_lookup(value: &str, path: &str) -> Option<Value> {
    let mut node: Value = serde_json::from_str(value).ok()?;
    for segment in path.split('.') {
        node = match node {
            Value::Object(mut map) => map.remove(segment)?,
            _ => return None,
        };
    }
    Some(node)
}
