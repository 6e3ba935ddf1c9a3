use std::fmt;

/// One step into the document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathElem {
    /// Mapping key.
    Key(String),
    /// Sequence index.
    Index(usize),
}

/// Location of a node inside the document, rendered as `$.compositions[0].layers[1]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodePath(Vec<PathElem>);

impl NodePath {
    /// The document root (`$`).
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Child path under mapping key `key`.
    pub fn key(&self, key: impl Into<String>) -> Self {
        let mut out = self.clone();
        out.0.push(PathElem::Key(key.into()));
        out
    }

    /// Child path at sequence position `index`.
    pub fn index(&self, index: usize) -> Self {
        let mut out = self.clone();
        out.0.push(PathElem::Index(index));
        out
    }

    pub(crate) fn push_key(&mut self, key: &str) {
        self.0.push(PathElem::Key(key.to_string()));
    }

    pub(crate) fn push_index(&mut self, index: usize) {
        self.0.push(PathElem::Index(index));
    }

    pub(crate) fn pop(&mut self) {
        self.0.pop();
    }

    pub fn elems(&self) -> &[PathElem] {
        &self.0
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for elem in &self.0 {
            match elem {
                PathElem::Key(k) => write!(f, ".{k}")?,
                PathElem::Index(i) => write!(f, "[{i}]")?,
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Expected degradation; kept out of the default log output.
    Note,
    /// Something the author most likely wants to fix.
    Warning,
}

/// What kind of best-effort degradation happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    UnresolvedGlobal,
    ManifestUnavailable,
    MalformedManifestEntry,
    MissingComponentId,
    DuplicateComponent,
    MalformedComponentRefs,
    UnknownComponent,
    UntypedEffect,
    UnmappedEffectProperty,
    DroppedLayer,
    MalformedContainer,
    ImageNormalization,
}

impl DiagnosticKind {
    pub fn severity(self) -> Severity {
        match self {
            Self::UnknownComponent
            | Self::UntypedEffect
            | Self::UnmappedEffectProperty
            | Self::DroppedLayer => Severity::Note,
            Self::UnresolvedGlobal
            | Self::ManifestUnavailable
            | Self::MalformedManifestEntry
            | Self::MissingComponentId
            | Self::DuplicateComponent
            | Self::MalformedComponentRefs
            | Self::MalformedContainer
            | Self::ImageNormalization => Severity::Warning,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub path: NodePath,
    pub message: String,
}

impl Diagnostic {
    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.elems().is_empty() {
            return write!(f, "{}", self.message);
        }
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Accumulates every degradation the pipeline recovers from.
///
/// Each stage receives the collector by `&mut` so tests can assert on exactly what was skipped.
/// Pushing also emits a `tracing` event: warnings at `warn`, notes at `debug`.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: DiagnosticKind, path: NodePath, message: impl Into<String>) {
        let diag = Diagnostic {
            kind,
            path,
            message: message.into(),
        };
        match diag.severity() {
            Severity::Warning => tracing::warn!(kind = ?diag.kind, "{diag}"),
            Severity::Note => tracing::debug!(kind = ?diag.kind, "{diag}"),
        }
        self.items.push(diag);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items
            .iter()
            .filter(|d| d.severity() == Severity::Warning)
    }

    pub fn notes(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter().filter(|d| d.severity() == Severity::Note)
    }

    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.items.iter().filter(|d| d.kind == kind).count()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append everything collected by `other`, keeping order.
    pub fn extend(&mut self, other: Diagnostics) {
        self.items.extend(other.items);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/diagnostics.rs"]
mod tests;
