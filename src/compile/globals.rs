use crate::foundation::diagnostics::{DiagnosticKind, Diagnostics, NodePath};
use crate::scene::document::AigenDocument;
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

/// `$globals.<dotted.path>` at the start of a scalar. Anything after the path is ignored.
static GLOBAL_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\$globals\.([\w.]+)").expect("invalid global reference regex")
});

/// Replace every `$globals.*` token in the document with the referenced global value.
///
/// This is a single top-down pass against the `globals` block as it was before the pass
/// started: a global whose value is itself a `$globals.*` token is substituted verbatim and is
/// not expanded again. Unresolvable tokens stay in place and are reported.
#[tracing::instrument(skip_all)]
pub fn resolve_globals(doc: &mut AigenDocument, diags: &mut Diagnostics) {
    let globals = doc
        .globals()
        .cloned()
        .unwrap_or_else(|| Value::Object(Map::new()));

    let root = doc.take_root();
    let mut path = NodePath::root();
    doc.replace_root(resolve_map(root, &globals, &mut path, diags));
}

/// Resolve one subtree against `globals`.
pub fn resolve_value(
    node: Value,
    globals: &Value,
    path: &mut NodePath,
    diags: &mut Diagnostics,
) -> Value {
    match node {
        Value::Object(map) => Value::Object(resolve_map(map, globals, path, diags)),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .enumerate()
                .map(|(i, v)| {
                    path.push_index(i);
                    let v = resolve_value(v, globals, path, diags);
                    path.pop();
                    v
                })
                .collect(),
        ),
        Value::String(s) => {
            let resolved = GLOBAL_REF
                .captures(&s)
                .map(|caps| lookup_global(globals, &caps[1]).cloned());
            match resolved {
                None => Value::String(s),
                Some(Some(v)) => v,
                Some(None) => {
                    diags.push(
                        DiagnosticKind::UnresolvedGlobal,
                        path.clone(),
                        format!("global variable '{s}' not found"),
                    );
                    Value::String(s)
                }
            }
        }
        scalar => scalar,
    }
}

fn resolve_map(
    map: Map<String, Value>,
    globals: &Value,
    path: &mut NodePath,
    diags: &mut Diagnostics,
) -> Map<String, Value> {
    let mut out = Map::with_capacity(map.len());
    for (k, v) in map {
        path.push_key(&k);
        let v = resolve_value(v, globals, path, diags);
        path.pop();
        out.insert(k, v);
    }
    out
}

/// Follow a dotted path (`brand.colors.primary`) through nested mappings.
///
/// Fails when a segment is missing or when an intermediate value is not a mapping.
pub fn lookup_global<'a>(globals: &'a Value, dotted: &str) -> Option<&'a Value> {
    dotted
        .split('.')
        .try_fold(globals, |node, segment| node.as_object()?.get(segment))
}

#[cfg(test)]
#[path = "../../tests/unit/compile/globals.rs"]
mod tests;
