use crate::assets::image_fix::{ImageNormalizer, is_image_path};
use crate::compile::components::LAYERS_KEY;
use crate::effects::manifest::EffectManifest;
use crate::effects::translate::{TranslatedEffect, translate_effects};
use crate::foundation::diagnostics::{DiagnosticKind, Diagnostics, NodePath};
use crate::foundation::error::{AigenError, AigenResult};
use crate::scene::document::{
    ASSETS_KEY, AigenDocument, COMPOSITIONS_KEY, PROJECT_SETTINGS_KEY, value_kind,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

pub const EFFECTS_KEY: &str = "effects";
pub const ASSET_PATH_KEY: &str = "path";

/// Engine-ready output of a compilation.
///
/// Field order on the wire is fixed: `projectSettings`, `assets`, `compositions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blueprint {
    pub project_settings: Value,
    pub assets: Vec<Value>,
    pub compositions: Vec<Value>,
}

impl Blueprint {
    /// Pretty JSON with two-space indentation.
    pub fn to_json_pretty(&self) -> AigenResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| AigenError::serde(format!("serialize blueprint: {e}")))
    }

    /// Write the blueprint to `path`, creating parent directories as needed.
    pub fn write_to(&self, path: impl AsRef<Path>) -> AigenResult<()> {
        let path = path.as_ref();
        let json = self.to_json_pretty()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                AigenError::io(format!("create output dir '{}': {e}", parent.display()))
            })?;
        }
        std::fs::write(path, json)
            .map_err(|e| AigenError::io(format!("write blueprint '{}': {e}", path.display())))
    }
}

/// Build the blueprint from a document whose globals and components are already resolved.
#[tracing::instrument(skip_all)]
pub fn assemble(
    doc: AigenDocument,
    manifest: &EffectManifest,
    images: &dyn ImageNormalizer,
    diags: &mut Diagnostics,
) -> Blueprint {
    let mut root = doc.into_map();
    let base = NodePath::root();

    let project_settings = root
        .shift_remove(PROJECT_SETTINGS_KEY)
        .unwrap_or_else(|| Value::Object(Map::new()));

    let assets = take_sequence(&mut root, ASSETS_KEY, diags)
        .into_iter()
        .enumerate()
        .map(|(i, asset)| assemble_asset(asset, images, &base.key(ASSETS_KEY).index(i), diags))
        .collect();

    let compositions = take_sequence(&mut root, COMPOSITIONS_KEY, diags)
        .into_iter()
        .enumerate()
        .map(|(i, comp)| {
            assemble_composition(comp, manifest, &base.key(COMPOSITIONS_KEY).index(i), diags)
        })
        .collect();

    Blueprint {
        project_settings,
        assets,
        compositions,
    }
}

fn take_sequence(
    root: &mut Map<String, Value>,
    key: &str,
    diags: &mut Diagnostics,
) -> Vec<Value> {
    match root.shift_remove(key) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items,
        Some(other) => {
            diags.push(
                DiagnosticKind::MalformedContainer,
                NodePath::root().key(key),
                format!("{key} must be a sequence, found {}; ignored", value_kind(&other)),
            );
            Vec::new()
        }
    }
}

/// Copy one asset record, routing image paths through the normalizer.
fn assemble_asset(
    mut asset: Value,
    images: &dyn ImageNormalizer,
    path: &NodePath,
    diags: &mut Diagnostics,
) -> Value {
    let Some(slot) = asset.get_mut(ASSET_PATH_KEY) else {
        return asset;
    };
    if let Value::String(source) = slot
        && is_image_path(source)
    {
        let rewritten = images.normalize(source, &path.key(ASSET_PATH_KEY), diags);
        *source = rewritten;
    }
    asset
}

/// Copy one composition, keeping only mapping layers and translating their effects.
fn assemble_composition(
    mut comp: Value,
    manifest: &EffectManifest,
    path: &NodePath,
    diags: &mut Diagnostics,
) -> Value {
    let Some(slot) = comp.get_mut(LAYERS_KEY) else {
        return comp;
    };
    let layers_path = path.key(LAYERS_KEY);

    let layers = match std::mem::take(slot) {
        Value::Array(layers) => layers,
        other => {
            diags.push(
                DiagnosticKind::MalformedContainer,
                layers_path,
                format!("layers must be a sequence, found {}; kept as is", value_kind(&other)),
            );
            *slot = other;
            return comp;
        }
    };

    let mut kept = Vec::with_capacity(layers.len());
    for (i, layer) in layers.into_iter().enumerate() {
        let layer_path = layers_path.index(i);
        let Value::Object(mut layer) = layer else {
            diags.push(
                DiagnosticKind::DroppedLayer,
                layer_path,
                "layer is not a mapping; dropped",
            );
            continue;
        };
        if let Some(effects) = layer.get_mut(EFFECTS_KEY) {
            let effects_path = layer_path.key(EFFECTS_KEY);
            let decls = match std::mem::take(effects) {
                Value::Array(decls) => decls,
                other => {
                    diags.push(
                        DiagnosticKind::MalformedContainer,
                        effects_path.clone(),
                        format!(
                            "effects must be a sequence, found {}; replaced by an empty list",
                            value_kind(&other)
                        ),
                    );
                    Vec::new()
                }
            };
            *effects = Value::Array(
                translate_effects(decls, manifest, &effects_path, diags)
                    .into_iter()
                    .map(TranslatedEffect::into_value)
                    .collect(),
            );
        }
        kept.push(Value::Object(layer));
    }
    *slot = Value::Array(kept);
    comp
}

#[cfg(test)]
#[path = "../../tests/unit/compile/blueprint.rs"]
mod tests;
