use crate::foundation::diagnostics::{DiagnosticKind, Diagnostics, NodePath};
use crate::foundation::error::AigenError;
use crate::scene::document::value_kind;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// File name of the capability table, looked up beside the running executable.
pub const MANIFEST_FILENAME: &str = "effects_manifest.json";

#[derive(thiserror::Error, Debug)]
pub enum ManifestError {
    #[error("effects manifest '{}' not found", .0.display())]
    NotFound(PathBuf),

    #[error("read effects manifest '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse effects manifest '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl From<ManifestError> for AigenError {
    fn from(e: ManifestError) -> Self {
        AigenError::manifest(e.to_string())
    }
}

/// One named, index-addressed property of an effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestProperty {
    pub name: String,
    pub index: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyGroup {
    pub name: Option<String>,
    pub properties: Vec<ManifestProperty>,
}

/// Capabilities of one effect type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectManifestEntry {
    /// Canonical engine identifier.
    pub match_name: String,
    pub groups: Vec<PropertyGroup>,
}

impl EffectManifestEntry {
    /// Index of a user-facing property name.
    ///
    /// Groups are scanned in listed order; the first group that has the name wins.
    pub fn property_index(&self, name: &str) -> Option<u32> {
        self.groups
            .iter()
            .find_map(|g| g.properties.iter().find(|p| p.name == name))
            .map(|p| p.index)
    }

    /// `(group name, property)` pairs in manifest order.
    pub fn property_names(&self) -> impl Iterator<Item = (Option<&str>, &ManifestProperty)> {
        self.groups
            .iter()
            .flat_map(|g| g.properties.iter().map(move |p| (g.name.as_deref(), p)))
    }
}

/// Table mapping user-facing effect types to engine capabilities.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EffectManifest {
    entries: BTreeMap<String, EffectManifestEntry>,
}

impl EffectManifest {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load and parse a manifest file.
    ///
    /// A missing, unreadable, or non-JSON file is an error. Individual malformed entries or
    /// properties are skipped and reported through `diags`.
    pub fn load(path: impl AsRef<Path>, diags: &mut Diagnostics) -> Result<Self, ManifestError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ManifestError::NotFound(path.to_path_buf())
            } else {
                ManifestError::Read {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        let raw: Map<String, Value> =
            serde_json::from_str(&text).map_err(|source| ManifestError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let manifest = Self::from_map(raw, diags);
        tracing::info!(
            path = %path.display(),
            effects = manifest.len(),
            "loaded effects manifest"
        );
        Ok(manifest)
    }

    /// Like [`EffectManifest::load`], but any failure yields an empty manifest plus a warning.
    ///
    /// Effect translation still works against an empty manifest: every effect type is passed
    /// through as an already-canonical match name.
    pub fn load_or_empty(path: impl AsRef<Path>, diags: &mut Diagnostics) -> Self {
        match Self::load(path, diags) {
            Ok(m) => m,
            Err(e) => {
                diags.push(
                    DiagnosticKind::ManifestUnavailable,
                    NodePath::root(),
                    format!("{e}; effects fall back to pass-through match names"),
                );
                Self::empty()
            }
        }
    }

    /// Build a manifest from an already parsed JSON value.
    pub fn from_value(value: Value, diags: &mut Diagnostics) -> Self {
        match value {
            Value::Object(map) => Self::from_map(map, diags),
            other => {
                diags.push(
                    DiagnosticKind::ManifestUnavailable,
                    NodePath::root(),
                    format!("effects manifest must be a mapping, found {}", value_kind(&other)),
                );
                Self::empty()
            }
        }
    }

    fn from_map(map: Map<String, Value>, diags: &mut Diagnostics) -> Self {
        let mut entries = BTreeMap::new();
        for (effect_type, raw) in map {
            let path = NodePath::root().key(effect_type.as_str());
            if let Some(entry) = parse_entry(&raw, &path, diags) {
                entries.insert(effect_type, entry);
            }
        }
        Self { entries }
    }

    pub fn insert(&mut self, effect_type: impl Into<String>, entry: EffectManifestEntry) {
        self.entries.insert(effect_type.into(), entry);
    }

    pub fn get(&self, effect_type: &str) -> Option<&EffectManifestEntry> {
        self.entries.get(effect_type)
    }

    /// Known effect types in sorted order.
    pub fn effect_types(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Manifest location used when none is configured: next to the running executable.
pub fn default_manifest_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(MANIFEST_FILENAME)))
        .unwrap_or_else(|| PathBuf::from(MANIFEST_FILENAME))
}

fn parse_entry(
    raw: &Value,
    path: &NodePath,
    diags: &mut Diagnostics,
) -> Option<EffectManifestEntry> {
    let Some(match_name) = raw.get("matchName").and_then(Value::as_str) else {
        diags.push(
            DiagnosticKind::MalformedManifestEntry,
            path.clone(),
            "manifest entry has no string 'matchName'; skipped",
        );
        return None;
    };

    let mut groups = Vec::new();
    if let Some(raw_groups) = raw.get("groups").and_then(Value::as_array) {
        for (gi, g) in raw_groups.iter().enumerate() {
            let gpath = path.key("groups").index(gi);
            let mut group = PropertyGroup {
                name: g.get("name").and_then(Value::as_str).map(str::to_string),
                properties: Vec::new(),
            };
            let Some(props) = g.get("properties").and_then(Value::as_object) else {
                groups.push(group);
                continue;
            };
            for (name, spec) in props {
                let index = spec
                    .get("index")
                    .and_then(Value::as_u64)
                    .and_then(|i| u32::try_from(i).ok());
                match index {
                    Some(index) => group.properties.push(ManifestProperty {
                        name: name.clone(),
                        index,
                    }),
                    None => diags.push(
                        DiagnosticKind::MalformedManifestEntry,
                        gpath.key("properties").key(name.as_str()),
                        "manifest property has no non-negative integer 'index'; skipped",
                    ),
                }
            }
            groups.push(group);
        }
    }

    Some(EffectManifestEntry {
        match_name: match_name.to_string(),
        groups,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/effects/manifest.rs"]
mod tests;
