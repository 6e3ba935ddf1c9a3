use crate::effects::manifest::EffectManifest;
use crate::foundation::diagnostics::{DiagnosticKind, Diagnostics, NodePath};
use crate::scene::document::value_kind;
use serde_json::{Map, Value, json};

/// One effect property addressed by its engine index.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslatedProperty {
    pub index: u32,
    pub value_data: Value,
}

/// An effect in engine terms.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslatedEffect {
    pub match_name: String,
    pub name: String,
    pub properties: Vec<TranslatedProperty>,
}

impl TranslatedEffect {
    /// Blueprint form: `{matchName, name, properties: [{index, value_data}]}`.
    pub fn into_value(self) -> Value {
        let properties: Vec<Value> = self
            .properties
            .into_iter()
            .map(|p| json!({"index": p.index, "value_data": p.value_data}))
            .collect();
        let mut out = Map::new();
        out.insert("matchName".to_string(), Value::String(self.match_name));
        out.insert("name".to_string(), Value::String(self.name));
        out.insert("properties".to_string(), Value::Array(properties));
        Value::Object(out)
    }
}

/// Translate one authored effect declaration (`{type, name?, properties?}`).
///
/// Returns `None` when `type` is missing, null, empty or not a scalar. Numeric and boolean types
/// are looked up by their text form. Types the manifest does not know
/// are passed through as canonical match names with no properties. Property names the manifest
/// entry does not know are dropped.
pub fn translate_effect(
    decl: Value,
    manifest: &EffectManifest,
    path: &NodePath,
    diags: &mut Diagnostics,
) -> Option<TranslatedEffect> {
    let mut decl = match decl {
        Value::Object(decl) => decl,
        other => {
            diags.push(
                DiagnosticKind::UntypedEffect,
                path.clone(),
                format!("effect must be a mapping, found {}; dropped", value_kind(&other)),
            );
            return None;
        }
    };

    let effect_type = match decl.get("type") {
        Some(Value::String(t)) if !t.is_empty() => t.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        None | Some(Value::Null) | Some(Value::String(_)) => {
            diags.push(
                DiagnosticKind::UntypedEffect,
                path.clone(),
                "effect has no 'type'; dropped",
            );
            return None;
        }
        Some(other) => {
            diags.push(
                DiagnosticKind::UntypedEffect,
                path.key("type"),
                format!("effect type must be a scalar, found {}; dropped", value_kind(other)),
            );
            return None;
        }
    };
    let name = decl
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or(&effect_type)
        .to_string();
    let user_props = decl.shift_remove("properties");

    let Some(entry) = manifest.get(&effect_type) else {
        let has_props = user_props
            .as_ref()
            .and_then(Value::as_object)
            .is_some_and(|p| !p.is_empty());
        if has_props {
            diags.push(
                DiagnosticKind::UnmappedEffectProperty,
                path.key("properties"),
                format!("effect type '{effect_type}' is not in the manifest; properties dropped"),
            );
        }
        return Some(TranslatedEffect {
            match_name: effect_type,
            name,
            properties: Vec::new(),
        });
    };

    let mut properties = Vec::new();
    match user_props {
        None | Some(Value::Null) => {}
        Some(Value::Object(props)) => {
            for (prop_name, value) in props {
                match entry.property_index(&prop_name) {
                    Some(index) => properties.push(TranslatedProperty {
                        index,
                        value_data: value,
                    }),
                    None => diags.push(
                        DiagnosticKind::UnmappedEffectProperty,
                        path.key("properties").key(prop_name.as_str()),
                        format!("'{effect_type}' has no property '{prop_name}'; dropped"),
                    ),
                }
            }
        }
        Some(other) => diags.push(
            DiagnosticKind::MalformedContainer,
            path.key("properties"),
            format!("effect properties must be a mapping, found {}", value_kind(&other)),
        ),
    }

    Some(TranslatedEffect {
        match_name: entry.match_name.clone(),
        name,
        properties,
    })
}

/// Translate a layer's effect list, keeping the order of the effects that survive.
pub fn translate_effects(
    decls: Vec<Value>,
    manifest: &EffectManifest,
    path: &NodePath,
    diags: &mut Diagnostics,
) -> Vec<TranslatedEffect> {
    decls
        .into_iter()
        .enumerate()
        .filter_map(|(i, decl)| translate_effect(decl, manifest, &path.index(i), diags))
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/effects/translate.rs"]
mod tests;
