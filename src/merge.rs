//! Overlay merging for JSON mappings.

use serde_json::{Map, Value};

/// Merge `overlay` on top of `base`, recursing into nested objects.
///
/// Keys only in `base` survive, keys only in `overlay` are added, and where
/// both sides hold an object the two are merged at the next depth. Any other
/// collision takes the overlay value. Neither input is modified.
pub fn recursive_merge(base: &Map<String, Value>, overlay: &Map<String, Value>) -> Map<String, Value> {
    let mut merged = base.clone();
    merge_into(&mut merged, overlay);
    merged
}

/// In-place form of [`recursive_merge`].
pub fn merge_into(target: &mut Map<String, Value>, overlay: &Map<String, Value>) {
    for (key, value) in overlay {
        if let Value::Object(incoming) = value {
            if let Some(Value::Object(existing)) = target.get_mut(key) {
                merge_into(existing, incoming);
                continue;
            }
        }
        target.insert(key.clone(), value.clone());
    }
}

/// Merge `overlay` on top of `base` at the top level only.
///
/// Nested objects from `overlay` replace those in `base` wholesale.
pub fn shallow_merge(base: &Map<String, Value>, overlay: &Map<String, Value>) -> Map<String, Value> {
    let mut merged = base.clone();
    for (key, value) in overlay {
        merged.insert(key.clone(), value.clone());
    }
    merged
}
