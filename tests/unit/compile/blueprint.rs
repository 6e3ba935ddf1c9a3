use super::*;
use crate::assets::image_fix::KeepPaths;
use crate::effects::manifest::{EffectManifestEntry, ManifestProperty, PropertyGroup};
use serde_json::json;

/// Rewrites every image path to `fixed/<path>` and records what it saw.
struct Prefixer {
    seen: std::cell::RefCell<Vec<String>>,
}

impl ImageNormalizer for Prefixer {
    fn normalize(&self, source: &str, _path: &NodePath, _diags: &mut Diagnostics) -> String {
        self.seen.borrow_mut().push(source.to_string());
        format!("fixed/{source}")
    }
}

fn manifest() -> EffectManifest {
    let mut m = EffectManifest::empty();
    m.insert(
        "Transform",
        EffectManifestEntry {
            match_name: "ADBE Geometry2".to_string(),
            groups: vec![PropertyGroup {
                name: None,
                properties: vec![ManifestProperty {
                    name: "Opacity".to_string(),
                    index: 2,
                }],
            }],
        },
    );
    m
}

fn doc(v: Value) -> AigenDocument {
    AigenDocument::from_value(v).unwrap()
}

#[test]
fn top_level_field_order_is_fixed() {
    let d = doc(json!({
        "compositions": [],
        "assets": [],
        "projectSettings": {"bitsPerChannel": 8}
    }));
    let mut diags = Diagnostics::new();
    let bp = assemble(d, &manifest(), &KeepPaths, &mut diags);
    let json = bp.to_json_pretty().unwrap();

    let ps = json.find("\"projectSettings\"").unwrap();
    let assets = json.find("\"assets\"").unwrap();
    let comps = json.find("\"compositions\"").unwrap();
    assert!(ps < assets && assets < comps);
    assert!(json.contains("\n  \"assets\""));
}

#[test]
fn missing_sections_get_empty_defaults() {
    let mut diags = Diagnostics::new();
    let bp = assemble(doc(json!({"globals": {"x": 1}})), &manifest(), &KeepPaths, &mut diags);
    assert_eq!(
        serde_json::to_value(&bp).unwrap(),
        json!({"projectSettings": {}, "assets": [], "compositions": []})
    );
    assert!(diags.is_empty());
}

#[test]
fn only_image_assets_are_normalized_in_order() {
    let d = doc(json!({
        "assets": [
            {"id": "bg", "path": "images/TechBG.PNG"},
            {"id": "music", "path": "audio/track.wav"},
            {"id": "logo", "path": "Logo.webp", "width": 200},
            {"id": "nopath"},
            "raw entry"
        ]
    }));
    let images = Prefixer {
        seen: Default::default(),
    };
    let mut diags = Diagnostics::new();
    let bp = assemble(d, &manifest(), &images, &mut diags);

    assert_eq!(
        bp.assets,
        vec![
            json!({"id": "bg", "path": "fixed/images/TechBG.PNG"}),
            json!({"id": "music", "path": "audio/track.wav"}),
            json!({"id": "logo", "path": "fixed/Logo.webp", "width": 200}),
            json!({"id": "nopath"}),
            json!("raw entry"),
        ]
    );
    assert_eq!(
        images.seen.into_inner(),
        vec!["images/TechBG.PNG", "Logo.webp"]
    );
}

#[test]
fn layers_are_filtered_and_effects_translated() {
    let d = doc(json!({
        "compositions": [{
            "name": "Main",
            "duration": 10,
            "layers": [
                {"name": "A", "effects": [
                    {"type": "Transform", "properties": {"Opacity": 50, "Nope": 1}},
                    {"name": "untyped"},
                    {"type": "ADBE Glo2", "name": "Glow"}
                ]},
                42,
                {"name": "B"}
            ]
        }]
    }));
    let mut diags = Diagnostics::new();
    let bp = assemble(d, &manifest(), &KeepPaths, &mut diags);

    assert_eq!(
        bp.compositions[0],
        json!({
            "name": "Main",
            "duration": 10,
            "layers": [
                {"name": "A", "effects": [
                    {"matchName": "ADBE Geometry2", "name": "Transform",
                     "properties": [{"index": 2, "value_data": 50}]},
                    {"matchName": "ADBE Glo2", "name": "Glow", "properties": []}
                ]},
                {"name": "B"}
            ]
        })
    );
    assert_eq!(diags.count(DiagnosticKind::DroppedLayer), 1);
    assert_eq!(diags.count(DiagnosticKind::UntypedEffect), 1);
    assert_eq!(diags.count(DiagnosticKind::UnmappedEffectProperty), 1);
    assert_eq!(diags.warnings().count(), 0);
}

#[test]
fn composition_without_layers_is_verbatim() {
    let d = doc(json!({"compositions": [{"name": "Empty", "markers": [{"time": 1}]}, "odd"]}));
    let mut diags = Diagnostics::new();
    let bp = assemble(d, &manifest(), &KeepPaths, &mut diags);
    assert_eq!(
        bp.compositions,
        vec![json!({"name": "Empty", "markers": [{"time": 1}]}), json!("odd")]
    );
}

#[test]
fn malformed_containers_warn() {
    let d = doc(json!({
        "assets": {"id": "x"},
        "compositions": [
            {"layers": "nope"},
            {"layers": [{"effects": {"type": "Transform"}}]}
        ]
    }));
    let mut diags = Diagnostics::new();
    let bp = assemble(d, &manifest(), &KeepPaths, &mut diags);

    assert!(bp.assets.is_empty());
    assert_eq!(bp.compositions[0], json!({"layers": "nope"}));
    assert_eq!(bp.compositions[1], json!({"layers": [{"effects": []}]}));
    let paths: Vec<String> = diags.warnings().map(|d| d.path.to_string()).collect();
    assert_eq!(
        paths,
        vec![
            "$.assets",
            "$.compositions[0].layers",
            "$.compositions[1].layers[0].effects"
        ]
    );
}

#[test]
fn write_to_creates_parent_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("nested/out/blueprint.json");
    let bp = Blueprint {
        project_settings: json!({}),
        assets: vec![],
        compositions: vec![json!({"name": "C"})],
    };
    bp.write_to(&out).unwrap();

    let back: Blueprint = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(back, bp);
}
