use crate::foundation::diagnostics::{DiagnosticKind, Diagnostics, NodePath};
use crate::scene::document::{AigenDocument, COMPONENTS_KEY, value_kind};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Named, reusable fragments of layer properties, keyed by component id.
#[derive(Debug, Clone, Default)]
pub struct ComponentTable {
    by_id: HashMap<String, Value>,
}

impl ComponentTable {
    /// Collect the `components` sequence of a document.
    ///
    /// Entries without a string `id` are skipped. When an id is defined twice the later
    /// definition replaces the earlier one.
    pub fn from_document(doc: &AigenDocument, diags: &mut Diagnostics) -> Self {
        let mut table = Self::default();
        let base = NodePath::root().key(COMPONENTS_KEY);

        let entries = match doc.components() {
            None | Some(Value::Null) => return table,
            Some(Value::Array(entries)) => entries,
            Some(other) => {
                diags.push(
                    DiagnosticKind::MalformedContainer,
                    base,
                    format!("components must be a sequence, found {}", value_kind(other)),
                );
                return table;
            }
        };

        for (i, entry) in entries.iter().enumerate() {
            let path = base.index(i);
            let Some(id) = entry.get("id").and_then(Value::as_str) else {
                diags.push(
                    DiagnosticKind::MissingComponentId,
                    path,
                    "component has no string 'id'; skipped",
                );
                continue;
            };
            let properties = match entry.get("properties") {
                None | Some(Value::Null) => Value::Object(Map::new()),
                Some(p) => p.clone(),
            };
            if table.by_id.insert(id.to_string(), properties).is_some() {
                diags.push(
                    DiagnosticKind::DuplicateComponent,
                    path,
                    format!("component '{id}' is defined more than once; last definition wins"),
                );
            }
        }

        table
    }

    /// Insert or replace a component's properties.
    pub fn insert(&mut self, id: impl Into<String>, properties: Value) {
        self.by_id.insert(id.into(), properties);
    }

    /// The shared property fragment of component `id`.
    pub fn properties(&self, id: &str) -> Option<&Value> {
        self.by_id.get(id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/component.rs"]
mod tests;
