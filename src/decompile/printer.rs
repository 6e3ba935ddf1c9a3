use crate::foundation::error::{AigenError, AigenResult};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

// Absolute indentation levels (two spaces each) of the AIGEN layout.
const LAYER_PROPS: usize = 5;
const EFFECT_PROPS: usize = 7;
const SELECTOR_PROPS: usize = 9;

/// Render a blueprint (or an engine export with the same top-level shape) as AIGEN text.
///
/// The layout mirrors what authors write by hand: block style for structure, flow style for
/// vectors, keyframes, and attribute bags. The `Transform` property group is flattened into
/// `"Transform.<property>"` keys.
pub fn render_aigen(doc: &Value) -> String {
    let mut p = Printer::default();

    if let Some(settings) = doc.get("projectSettings").and_then(Value::as_object) {
        p.line(0, "projectSettings:");
        for (k, v) in settings {
            p.line(1, format!("{}: {}", format_key(k), format_value(v)));
        }
        p.blank();
    }

    if let Some(assets) = doc.get("assets").and_then(Value::as_array) {
        p.line(0, "assets:");
        for asset in assets {
            p.asset(asset);
        }
        p.blank();
    }

    if let Some(comps) = doc.get("compositions").and_then(Value::as_array) {
        p.line(0, "compositions:");
        for comp in comps {
            p.composition(comp);
            p.blank();
        }
    }

    p.out
}

/// Read a blueprint JSON file and write its AIGEN rendering.
///
/// Without an explicit `output`, the result goes next to the input with an `.aigen` extension.
pub fn decompile_file(input: &Path, output: Option<&Path>) -> AigenResult<PathBuf> {
    let text = std::fs::read_to_string(input)
        .map_err(|e| AigenError::parse(format!("read blueprint '{}': {e}", input.display())))?;
    let doc: Value = serde_json::from_str(&text)
        .map_err(|e| AigenError::parse(format!("parse blueprint '{}': {e}", input.display())))?;

    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| input.with_extension("aigen"));
    std::fs::write(&output, render_aigen(&doc))
        .map_err(|e| AigenError::io(format!("write AIGEN '{}': {e}", output.display())))?;
    tracing::info!(output = %output.display(), "decompiled blueprint");
    Ok(output)
}

#[derive(Default)]
struct Printer {
    out: String,
}

impl Printer {
    fn line(&mut self, level: usize, text: impl AsRef<str>) {
        for _ in 0..level {
            self.out.push_str("  ");
        }
        self.out.push_str(text.as_ref());
        self.out.push('\n');
    }

    fn blank(&mut self) {
        self.out.push('\n');
    }

    fn asset(&mut self, asset: &Value) {
        let field = |k: &str| format_value(asset.get(k).unwrap_or(&Value::Null));
        self.line(1, format!("- id: {}", field("id")));
        self.line(2, format!("path: {}", field("path")));
        for key in ["width", "height"] {
            if let Some(v) = asset.get(key) {
                self.line(2, format!("{key}: {}", format_value(v)));
            }
        }
    }

    fn composition(&mut self, comp: &Value) {
        let or = |k: &str, default: Value| format_value(comp.get(k).unwrap_or(&default));
        self.line(1, format!("- name: {}", or("name", Value::from("Comp"))));
        self.line(2, format!("width: {}", or("width", Value::from(1920))));
        self.line(2, format!("height: {}", or("height", Value::from(1080))));
        self.line(2, format!("frameRate: {}", or("frameRate", Value::from(24))));
        self.line(2, format!("duration: {}", or("duration", Value::from(10))));

        if let Some(markers) = comp.get("markers").and_then(Value::as_array) {
            self.line(2, "markers:");
            for m in markers {
                let name = format_value(m.get("name").unwrap_or(&Value::Null));
                let time = format_value(m.get("time").unwrap_or(&Value::Null));
                self.line(3, format!("- {{ name: {name}, time: {time} }}"));
            }
        }

        if let Some(layers) = comp.get("layers").and_then(Value::as_array) {
            self.line(2, "layers:");
            for layer in layers {
                self.layer(layer);
            }
        }
    }

    fn layer(&mut self, layer: &Value) {
        let or = |k: &str, default: Value| format_value(layer.get(k).unwrap_or(&default));
        self.line(3, format!("- name: {}", or("name", Value::from("Layer"))));
        self.line(4, format!("type: {}", or("type", Value::from("Null"))));
        for key in ["assetId", "refId", "sourceText"] {
            if let Some(v) = layer.get(key) {
                self.line(4, format!("{key}: {}", format_value(v)));
            }
        }
        self.line(4, format!("inPoint: {}", or("inPoint", Value::from(0))));
        self.line(4, format!("outPoint: {}", or("outPoint", Value::from(1))));
        self.line(4, format!("startTime: {}", or("startTime", Value::from(0))));

        if let Some(attrs) = layer.get("attributes").and_then(Value::as_object)
            && !attrs.is_empty()
        {
            self.line(4, format!("attributes: {}", format_map(attrs)));
        }

        if let Some(props) = layer.get("properties").and_then(Value::as_object) {
            self.line(4, "properties:");
            for (group, data) in props {
                match data {
                    Value::Object(inner) if group == "Transform" => {
                        for (k, v) in inner {
                            let flat = quote(&format!("{group}.{k}"));
                            self.property(&flat, v, LAYER_PROPS);
                        }
                    }
                    Value::Object(inner) => {
                        self.line(LAYER_PROPS, format!("{}:", format_key(group)));
                        for (k, v) in inner {
                            self.property(&format_key(k), v, LAYER_PROPS + 1);
                        }
                    }
                    other => self.property(&format_key(group), other, LAYER_PROPS),
                }
            }
        }

        match layer.get("effects") {
            Some(Value::Object(effects)) => {
                self.line(4, "effects:");
                for (name, data) in effects {
                    self.effect(&Value::from(name.as_str()), data);
                }
            }
            Some(Value::Array(effects)) => {
                self.line(4, "effects:");
                for data in effects {
                    let ty = data
                        .get("type")
                        .or_else(|| data.get("matchName"))
                        .cloned()
                        .unwrap_or_else(|| Value::from("Effect"));
                    self.effect(&ty, data);
                }
            }
            _ => {}
        }

        if let Some(animators) = layer.get("textAnimators").and_then(Value::as_array) {
            self.line(4, "textAnimators:");
            for anim in animators {
                self.text_animator(anim);
            }
        }
    }

    fn effect(&mut self, ty: &Value, data: &Value) {
        self.line(5, format!("- type: {}", format_value(ty)));
        for key in ["name", "matchName"] {
            if let Some(v) = data.get(key) {
                self.line(6, format!("{key}: {}", format_value(v)));
            }
        }
        // Index-addressed properties of a compiled effect have no authored form.
        if let Some(props) = data.get("properties").and_then(Value::as_object) {
            self.line(6, "properties:");
            for (k, v) in props {
                self.property(&format_key(k), v, EFFECT_PROPS);
            }
        }
    }

    fn text_animator(&mut self, anim: &Value) {
        let name = anim.get("name").cloned().unwrap_or_else(|| "Animator".into());
        self.line(5, format!("- name: {}", format_value(&name)));

        if let Some(props) = anim.get("animatorProperties").and_then(Value::as_array) {
            self.line(6, "animatorProperties:");
            for ap in props {
                let prop = ap.get("property").unwrap_or(&Value::Null);
                self.line(7, format!("- property: {}", format_value(prop)));
                self.line(8, "value_data:");
                let vd = ap.get("value_data").unwrap_or(&Value::Null);
                if is_animated(vd) {
                    self.animated(vd, 9);
                } else {
                    let v = vd.get("value").unwrap_or(&Value::Null);
                    self.line(9, format!("value: {}", format_value(v)));
                }
            }
        }

        if let Some(selectors) = anim.get("selectors").and_then(Value::as_array) {
            self.line(6, "selectors:");
            for sel in selectors {
                let name = sel.get("name").cloned().unwrap_or_else(|| "Selector".into());
                self.line(7, format!("- name: {}", format_value(&name)));
                if let Some(props) = sel.get("properties").and_then(Value::as_object) {
                    self.line(8, "properties:");
                    for (k, v) in props {
                        self.property(&format_key(k), v, SELECTOR_PROPS);
                    }
                }
            }
        }
    }

    /// One named property; `key` is already formatted.
    fn property(&mut self, key: &str, prop: &Value, level: usize) {
        if key.trim().is_empty() || key == "\"\"" {
            return;
        }

        let Value::Object(map) = prop else {
            self.line(level, format!("{key}: {}", format_value(prop)));
            return;
        };

        if map.contains_key("value") && map.get("animated") == Some(&Value::Bool(false)) {
            match &map["value"] {
                Value::Object(doc) if doc.contains_key("text") => {
                    self.line(level, format!("{key}:"));
                    self.line(level + 1, "value:");
                    for (k, v) in doc {
                        self.line(level + 2, format!("{}: {}", format_key(k), format_value(v)));
                    }
                }
                v => self.line(level, format!("{key}: {{ value: {} }}", format_value(v))),
            }
            return;
        }

        if is_animated(prop) {
            self.line(level, format!("{key}:"));
            self.animated(prop, level + 1);
            return;
        }

        if let Some(Value::Object(children)) = map.get("properties") {
            self.line(level, format!("{key}:"));
            for (k, v) in children {
                self.property(&format_key(k), v, level + 1);
            }
            return;
        }

        self.line(level, format!("{key}: {}", format_value(prop)));
    }

    fn animated(&mut self, prop: &Value, level: usize) {
        self.line(level, "animated: true");
        if let Some(keys) = prop.get("keyframes").and_then(Value::as_array) {
            self.line(level, "keyframes:");
            for kf in keys {
                match kf {
                    Value::Object(m) => self.line(level + 1, format!("- {}", format_map(m))),
                    other => self.line(level + 1, format!("- {}", format_value(other))),
                }
            }
        }
    }
}

fn is_animated(v: &Value) -> bool {
    match v.get("animated") {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        _ => false,
    }
}

/// Inline (flow-style) rendering of any value.
pub(crate) fn format_value(v: &Value) -> String {
    match v {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => quote(s),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().map(format_value).collect();
            format!("[{}]", parts.join(", "))
        }
        Value::Object(m) => format_map(m),
    }
}

fn format_map(m: &Map<String, Value>) -> String {
    if m.is_empty() {
        return "{}".to_string();
    }
    let parts: Vec<String> = m
        .iter()
        .map(|(k, v)| format!("{}: {}", format_key(k), format_value(v)))
        .collect();
    format!("{{ {} }}", parts.join(", "))
}

/// Mapping keys stay plain when they are simple identifiers (spaces and dots allowed).
pub(crate) fn format_key(k: &str) -> String {
    let plain = k
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && !k.ends_with(' ')
        && k
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | ' ' | '.' | '-'))
        && !matches!(
            k.to_ascii_lowercase().as_str(),
            "true" | "false" | "null" | "yes" | "no" | "on" | "off" | "y" | "n" | "~"
        );
    if plain { k.to_string() } else { quote(k) }
}

/// Double-quoted scalar; JSON string escaping is valid YAML.
fn quote(s: &str) -> String {
    Value::String(s.to_string()).to_string()
}

#[cfg(test)]
#[path = "../../tests/unit/decompile/printer.rs"]
mod tests;
