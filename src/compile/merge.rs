use serde_json::Value;

/// Right-biased deep merge of `source` into `target`.
///
/// Only mapping-into-mapping recurses (per key). Any other pairing, including a mapping
/// replaced by a scalar or a scalar replaced by a mapping, takes `source` wholesale. Sequences
/// are replaced, never concatenated.
pub fn deep_merge(target: &mut Value, source: Value) {
    match (target, source) {
        (Value::Object(into), Value::Object(from)) => {
            for (k, v) in from {
                match into.get_mut(&k) {
                    Some(existing) => deep_merge(existing, v),
                    None => {
                        into.insert(k, v);
                    }
                }
            }
        }
        (target, source) => *target = source,
    }
}

/// Fold `layers` left to right into an empty mapping.
pub fn merge_all(layers: impl IntoIterator<Item = Value>) -> Value {
    let mut acc = Value::Object(serde_json::Map::new());
    for layer in layers {
        deep_merge(&mut acc, layer);
    }
    acc
}

#[cfg(test)]
#[path = "../../tests/unit/compile/merge.rs"]
mod tests;
