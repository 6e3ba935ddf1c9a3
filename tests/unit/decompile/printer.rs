use super::*;
use serde_json::json;

fn reparse(text: &str) -> Value {
    serde_yaml::from_str(text).unwrap()
}

#[test]
fn output_is_valid_yaml_with_same_structure() {
    let bp = json!({
        "projectSettings": {"bitsPerChannel": 16, "colorSpace": "sRGB"},
        "assets": [{"id": "bg", "path": "C:\\media\\bg.png", "width": 1920, "height": 1080}],
        "compositions": [{
            "name": "Intro",
            "width": 1280,
            "height": 720,
            "frameRate": 30,
            "duration": 5,
            "markers": [{"name": "beat", "time": 1.5}],
            "layers": [{
                "name": "Title: main",
                "type": "Text",
                "sourceText": "Hello \"world\"",
                "inPoint": 0,
                "outPoint": 5,
                "attributes": {"3D": true, "blendingMode": "ADD"}
            }]
        }]
    });
    let v = reparse(&render_aigen(&bp));

    assert_eq!(v["projectSettings"], bp["projectSettings"]);
    assert_eq!(v["assets"], bp["assets"]);
    let layer = &v["compositions"][0]["layers"][0];
    assert_eq!(layer["name"], json!("Title: main"));
    assert_eq!(layer["sourceText"], json!("Hello \"world\""));
    assert_eq!(layer["attributes"], json!({"3D": true, "blendingMode": "ADD"}));
    assert_eq!(layer["startTime"], json!(0));
    assert_eq!(
        v["compositions"][0]["markers"],
        json!([{"name": "beat", "time": 1.5}])
    );
}

#[test]
fn composition_and_layer_defaults_are_filled() {
    let v = reparse(&render_aigen(&json!({"compositions": [{"layers": [{}]}]})));
    let comp = &v["compositions"][0];
    assert_eq!(comp["name"], json!("Comp"));
    assert_eq!(comp["width"], json!(1920));
    assert_eq!(comp["height"], json!(1080));
    assert_eq!(comp["frameRate"], json!(24));
    assert_eq!(comp["duration"], json!(10));
    assert_eq!(
        comp["layers"][0],
        json!({"name": "Layer", "type": "Null", "inPoint": 0, "outPoint": 1, "startTime": 0})
    );
}

#[test]
fn transform_group_is_flattened() {
    let bp = json!({"compositions": [{"layers": [{
        "properties": {
            "Transform": {
                "Opacity": {"value": 80, "animated": false},
                "Position": {"animated": true, "keyframes": [
                    {"time": 0, "value": [0, 0]},
                    {"time": 1, "value": [100, 50]}
                ]}
            }
        }
    }]}]});
    let text = render_aigen(&bp);
    assert!(text.contains("\"Transform.Opacity\": { value: 80 }"));

    let props = &reparse(&text)["compositions"][0]["layers"][0]["properties"];
    assert_eq!(props["Transform.Opacity"], json!({"value": 80}));
    assert_eq!(
        props["Transform.Position"],
        json!({"animated": true, "keyframes": [
            {"time": 0, "value": [0, 0]},
            {"time": 1, "value": [100, 50]}
        ]})
    );
}

#[test]
fn nested_groups_and_text_documents() {
    let bp = json!({"compositions": [{"layers": [{
        "properties": {
            "Text": {
                "Source Text": {"animated": false, "value": {"text": "Hi", "fontSize": 72}},
                "Path Options": {"properties": {"Reverse Path": {"value": 0, "animated": false}}},
                "": {"value": 1, "animated": false}
            },
            "Fill": [0.2, 0.4, 1]
        }
    }]}]});
    let props = &reparse(&render_aigen(&bp))["compositions"][0]["layers"][0]["properties"];

    assert_eq!(
        props["Text"],
        json!({
            "Source Text": {"value": {"text": "Hi", "fontSize": 72}},
            "Path Options": {"Reverse Path": {"value": 0}}
        })
    );
    assert_eq!(props["Fill"], json!([0.2, 0.4, 1]));
}

#[test]
fn compiled_effects_keep_match_name_as_type() {
    let bp = json!({"compositions": [{"layers": [{
        "effects": [
            {"matchName": "ADBE Glo2", "name": "Glow", "properties": [{"index": 2, "value_data": 1}]},
            {"type": "Transform", "properties": {"Opacity": 50}}
        ]
    }]}]});
    let effects = &reparse(&render_aigen(&bp))["compositions"][0]["layers"][0]["effects"];
    assert_eq!(
        effects,
        &json!([
            {"type": "ADBE Glo2", "name": "Glow", "matchName": "ADBE Glo2"},
            {"type": "Transform", "properties": {"Opacity": 50}}
        ])
    );
}

#[test]
fn effects_in_mapping_form_use_keys_as_types() {
    let bp = json!({"compositions": [{"layers": [{
        "effects": {"Gaussian Blur": {"matchName": "ADBE Gaussian Blur 2",
                                      "properties": {"Blurriness": {"value": 10, "animated": false}}}}
    }]}]});
    let effects = &reparse(&render_aigen(&bp))["compositions"][0]["layers"][0]["effects"];
    assert_eq!(
        effects,
        &json!([{"type": "Gaussian Blur", "matchName": "ADBE Gaussian Blur 2",
                 "properties": {"Blurriness": {"value": 10}}}])
    );
}

#[test]
fn text_animators_render() {
    let bp = json!({"compositions": [{"layers": [{
        "textAnimators": [{
            "animatorProperties": [
                {"property": "Opacity", "value_data": {"value": 0, "animated": false}},
                {"property": "Scale", "value_data": {"animated": true,
                    "keyframes": [{"time": 0, "value": [0, 0]}]}}
            ],
            "selectors": [{"name": "Range", "properties": {"Start": {"value": 0, "animated": false}}}]
        }]
    }]}]});
    let anim = &reparse(&render_aigen(&bp))["compositions"][0]["layers"][0]["textAnimators"][0];
    assert_eq!(anim["name"], json!("Animator"));
    assert_eq!(
        anim["animatorProperties"],
        json!([
            {"property": "Opacity", "value_data": {"value": 0}},
            {"property": "Scale", "value_data": {"animated": true,
                "keyframes": [{"time": 0, "value": [0, 0]}]}}
        ])
    );
    assert_eq!(
        anim["selectors"],
        json!([{"name": "Range", "properties": {"Start": {"value": 0}}}])
    );
}

#[test]
fn keys_are_quoted_only_when_needed() {
    assert_eq!(format_key("Opacity"), "Opacity");
    assert_eq!(format_key("Source Text"), "Source Text");
    assert_eq!(format_key("3D"), "\"3D\"");
    assert_eq!(format_key("a: b"), "\"a: b\"");
    assert_eq!(format_key("yes"), "\"yes\"");
    assert_eq!(format_key(""), "\"\"");
}

#[test]
fn values_render_inline() {
    assert_eq!(format_value(&json!(null)), "null");
    assert_eq!(format_value(&json!([1, "a", true])), "[1, \"a\", true]");
    assert_eq!(format_value(&json!({})), "{}");
    assert_eq!(format_value(&json!({"x": [1.5]})), "{ x: [1.5] }");
}

#[test]
fn decompile_file_defaults_output_extension() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("scene.json");
    std::fs::write(&input, r#"{"projectSettings": {"fps": 24}}"#).unwrap();

    let out = decompile_file(&input, None).unwrap();
    assert_eq!(out, dir.path().join("scene.aigen"));
    let v = reparse(&std::fs::read_to_string(&out).unwrap());
    assert_eq!(v["projectSettings"]["fps"], json!(24));
}

#[test]
fn decompile_file_rejects_bad_json() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bad.json");
    std::fs::write(&input, "{nope").unwrap();
    let err = decompile_file(&input, Some(dir.path().join("x.aigen").as_path())).unwrap_err();
    assert!(err.to_string().starts_with("parse error:"));
}
