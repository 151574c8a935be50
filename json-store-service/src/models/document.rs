//! The single stored JSON document and the shallow merge applied by PUT.

use serde_json::{Map, Value};

/// A stored document: a JSON object with arbitrary nested values.
pub type Document = Map<String, Value>;

/// Top-level keys the namespaced envelope exposes.
pub const NAMESPACES: [&str; 2] = ["intergramX", "ScraJang"];

/// Shallow merge: every top-level key of `update` replaces the one in `base`,
/// keys missing from `update` survive untouched. Nested objects are not
/// merged recursively.
pub fn merge(base: Document, update: Document) -> Document {
    let mut merged = base;
    merged.extend(update);
    merged
}

/// The value stored under a namespace key, or `{}` when it is absent or null.
pub fn namespace(document: &Document, key: &str) -> Value {
    match document.get(key) {
        Some(Value::Null) | None => Value::Object(Map::new()),
        Some(value) => value.clone(),
    }
}
