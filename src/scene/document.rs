use crate::foundation::error::{AigenError, AigenResult};
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::str::FromStr;

/// Top-level key holding the global constants.
pub const GLOBALS_KEY: &str = "globals";
/// Top-level key holding reusable component definitions.
pub const COMPONENTS_KEY: &str = "components";
/// Top-level key holding the asset records.
pub const ASSETS_KEY: &str = "assets";
/// Top-level key holding the timed compositions.
pub const COMPOSITIONS_KEY: &str = "compositions";
/// Top-level key holding project-wide settings.
pub const PROJECT_SETTINGS_KEY: &str = "projectSettings";

/// An authored AIGEN scene description.
///
/// The document is kept as an untyped tree because authors may put arbitrary engine properties
/// anywhere below the well-known top-level keys. Each compilation stage rewrites the tree in
/// place and hands it to the next stage.
#[derive(Debug, Clone, PartialEq)]
pub struct AigenDocument {
    root: Map<String, Value>,
}

impl AigenDocument {
    /// Wrap an already parsed tree. The root must be a mapping.
    pub fn from_value(value: Value) -> AigenResult<Self> {
        match value {
            Value::Object(root) => Ok(Self { root }),
            Value::Null => Err(AigenError::parse("AIGEN document is empty")),
            other => Err(AigenError::parse(format!(
                "AIGEN document root must be a mapping, found {}",
                value_kind(&other)
            ))),
        }
    }

    /// Parse an AIGEN document from a YAML reader.
    pub fn from_reader<R: Read>(r: R) -> AigenResult<Self> {
        let yaml: serde_yaml::Value = serde_yaml::from_reader(r)
            .map_err(|e| AigenError::parse(format!("parse AIGEN document: {e}")))?;
        Self::from_yaml(yaml)
    }

    /// Expand `<<` merge keys, then convert the YAML tree into the document tree.
    fn from_yaml(mut yaml: serde_yaml::Value) -> AigenResult<Self> {
        yaml.apply_merge()
            .map_err(|e| AigenError::parse(format!("apply YAML merge keys: {e}")))?;
        let value = serde_json::to_value(yaml)
            .map_err(|e| AigenError::parse(format!("convert AIGEN document: {e}")))?;
        Self::from_value(value)
    }

    /// Parse an AIGEN document from a file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> AigenResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            AigenError::parse(format!("open AIGEN document '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn globals(&self) -> Option<&Value> {
        self.root.get(GLOBALS_KEY)
    }

    pub fn components(&self) -> Option<&Value> {
        self.root.get(COMPONENTS_KEY)
    }

    pub fn assets(&self) -> Option<&Value> {
        self.root.get(ASSETS_KEY)
    }

    pub fn compositions(&self) -> Option<&Value> {
        self.root.get(COMPOSITIONS_KEY)
    }

    pub fn project_settings(&self) -> Option<&Value> {
        self.root.get(PROJECT_SETTINGS_KEY)
    }

    pub fn root(&self) -> &Map<String, Value> {
        &self.root
    }

    pub(crate) fn compositions_mut(&mut self) -> Option<&mut Value> {
        self.root.get_mut(COMPOSITIONS_KEY)
    }

    pub(crate) fn replace_root(&mut self, root: Map<String, Value>) {
        self.root = root;
    }

    pub(crate) fn take_root(&mut self) -> Map<String, Value> {
        std::mem::take(&mut self.root)
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.root
    }
}

impl FromStr for AigenDocument {
    type Err = AigenError;

    fn from_str(s: &str) -> AigenResult<Self> {
        let yaml: serde_yaml::Value = serde_yaml::from_str(s)
            .map_err(|e| AigenError::parse(format!("parse AIGEN document: {e}")))?;
        Self::from_yaml(yaml)
    }
}

/// Short human name of a node's variant, for diagnostics.
pub(crate) fn value_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/document.rs"]
mod tests;
