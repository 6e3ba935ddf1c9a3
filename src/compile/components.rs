use crate::compile::merge::deep_merge;
use crate::foundation::diagnostics::{DiagnosticKind, Diagnostics, NodePath};
use crate::scene::component::ComponentTable;
use crate::scene::document::{AigenDocument, COMPOSITIONS_KEY, value_kind};
use serde_json::{Map, Value};

pub const USE_COMPONENTS_KEY: &str = "useComponents";
pub const PROPERTIES_KEY: &str = "properties";
pub const LAYERS_KEY: &str = "layers";

/// Expand `useComponents` on every layer of every composition.
#[tracing::instrument(skip_all, fields(components = table.len()))]
pub fn compose_components(
    doc: &mut AigenDocument,
    table: &ComponentTable,
    diags: &mut Diagnostics,
) {
    let Some(Value::Array(comps)) = doc.compositions_mut() else {
        return;
    };

    let base = NodePath::root().key(COMPOSITIONS_KEY);
    for (ci, comp) in comps.iter_mut().enumerate() {
        let Some(Value::Array(layers)) = comp.get_mut(LAYERS_KEY) else {
            continue;
        };
        for (li, layer) in layers.iter_mut().enumerate() {
            let Value::Object(layer) = layer else {
                continue;
            };
            let path = base.index(ci).key(LAYERS_KEY).index(li);
            compose_layer(layer, table, &path, diags);
        }
    }
}

/// Replace a layer's `useComponents` list with merged `properties`.
///
/// Merge order: empty mapping, then each referenced component in declared order, then the
/// layer's own `properties`. Unknown ids contribute nothing. Layers without `useComponents`
/// are left alone.
pub fn compose_layer(
    layer: &mut Map<String, Value>,
    table: &ComponentTable,
    path: &NodePath,
    diags: &mut Diagnostics,
) {
    let Some(refs) = layer.shift_remove(USE_COMPONENTS_KEY) else {
        return;
    };
    let refs_path = path.key(USE_COMPONENTS_KEY);

    let mut merged = Value::Object(Map::new());
    match refs {
        Value::Array(ids) => {
            for (i, id) in ids.iter().enumerate() {
                let Some(id) = id.as_str() else {
                    diags.push(
                        DiagnosticKind::MalformedComponentRefs,
                        refs_path.index(i),
                        format!(
                            "component reference must be a string, found {}",
                            value_kind(id)
                        ),
                    );
                    continue;
                };
                match table.properties(id) {
                    // Clone so layers never alias the shared definition.
                    Some(props) => deep_merge(&mut merged, props.clone()),
                    None => diags.push(
                        DiagnosticKind::UnknownComponent,
                        refs_path.index(i),
                        format!("component '{id}' is not defined; skipped"),
                    ),
                }
            }
        }
        Value::Null => {}
        other => diags.push(
            DiagnosticKind::MalformedComponentRefs,
            refs_path,
            format!("useComponents must be a sequence, found {}", value_kind(&other)),
        ),
    }

    match layer.get_mut(PROPERTIES_KEY) {
        Some(slot) => {
            let own = std::mem::take(slot);
            if !own.is_null() {
                deep_merge(&mut merged, own);
            }
            *slot = merged;
        }
        None => {
            layer.insert(PROPERTIES_KEY.to_string(), merged);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compile/components.rs"]
mod tests;
